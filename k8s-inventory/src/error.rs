use thiserror::Error;

/// Startup configuration problems. These are fatal: the agent refuses to
/// start rather than run with a broken schedule or logger.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("scan interval must be greater than zero")]
    NonPositiveInterval,

    #[error("unrecognized duration {value:?}")]
    InvalidDuration { value: String },

    #[error("unknown scan kind {value:?}")]
    UnknownScanKind { value: String },

    #[error("no scan kinds enabled")]
    NoScanKinds,

    #[error("unknown log level {value:?}")]
    InvalidLogLevel { value: String },

    #[error("unknown log format {value:?}, expected \"json\" or \"text\"")]
    InvalidLogFormat { value: String },
}

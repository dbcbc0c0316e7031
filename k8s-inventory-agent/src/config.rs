//! Environment-driven configuration. Loaded and validated once at
//! startup; immutable afterwards.

use std::env;
use std::str::FromStr;

use k8s_inventory::{
    parse_go_duration, ConfigError, ScanConfig, ScanKind, Scope, DEFAULT_GRACE_PERIOD,
    DEFAULT_INTERVAL,
};

const ENV_PREFIX: &str = "KUBE_INVENTORY_";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Config {
    pub scan: ScanConfig,
    pub scope: Scope,
    /// Restrict secret scans to one secret type, e.g. `"Opaque"`.
    pub secret_type: Option<String>,
    pub logging: LoggingConfig,
    pub bind: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LogFormat {
    Json,
    Text,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            _ => Err(ConfigError::InvalidLogFormat {
                value: value.to_string(),
            }),
        }
    }
}

impl Config {
    /// Read `KUBE_INVENTORY_*` variables, falling back to the defaults
    /// (5m interval, 2s grace, all scan kinds, cluster scope, json logs
    /// at info, bind 0.0.0.0:8080).
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        let interval = match get("SCAN_INTERVAL") {
            Some(value) => parse_go_duration(&value)?,
            None => DEFAULT_INTERVAL,
        };
        let grace_period = match get("GRACE_PERIOD") {
            Some(value) => parse_go_duration(&value)?,
            None => DEFAULT_GRACE_PERIOD,
        };
        let kinds = match get("SCANS") {
            Some(value) => ScanKind::parse_list(&value)?,
            None => ScanKind::ALL.to_vec(),
        };
        let scan = ScanConfig {
            interval,
            grace_period,
            kinds,
        };
        scan.validate()?;

        let scope = match get("NAMESPACE") {
            Some(namespace) if !namespace.is_empty() => Scope::Namespace(namespace),
            _ => Scope::Cluster,
        };
        let secret_type = get("SECRET_TYPE").filter(|value| !value.is_empty());

        let level = get("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        if level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::InvalidLogLevel { value: level });
        }
        let format = get("LOG_FORMAT")
            .unwrap_or_else(|| "json".to_string())
            .parse()?;
        let logging = LoggingConfig { level, format };

        let bind = get("BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        Ok(Self {
            scan,
            scope,
            secret_type,
            logging,
            bind,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    fn config_from(entries: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = entries
            .iter()
            .map(|(key, value)| (format!("{ENV_PREFIX}{key}"), value.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.scan.interval, Duration::from_secs(300));
        assert_eq!(config.scan.grace_period, Duration::from_secs(2));
        assert_eq!(config.scan.kinds, ScanKind::ALL.to_vec());
        assert_eq!(config.scope, Scope::Cluster);
        assert_eq!(config.secret_type, None);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.bind, "0.0.0.0:8080");
    }

    #[test]
    fn overrides_are_honored() {
        let config = config_from(&[
            ("SCAN_INTERVAL", "30s"),
            ("GRACE_PERIOD", "0s"),
            ("SCANS", "pods,secrets"),
            ("NAMESPACE", "dev"),
            ("SECRET_TYPE", "Opaque"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "text"),
            ("BIND", "127.0.0.1:9090"),
        ])
        .unwrap();
        assert_eq!(config.scan.interval, Duration::from_secs(30));
        assert_eq!(config.scan.grace_period, Duration::ZERO);
        assert_eq!(config.scan.kinds, vec![ScanKind::Pods, ScanKind::Secrets]);
        assert_eq!(config.scope, Scope::Namespace("dev".to_string()));
        assert_eq!(config.secret_type.as_deref(), Some("Opaque"));
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.bind, "127.0.0.1:9090");
    }

    #[test]
    fn zero_interval_is_fatal() {
        let err = config_from(&[("SCAN_INTERVAL", "0s")]).unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveInterval);
    }

    #[test]
    fn negative_interval_is_fatal() {
        let err = config_from(&[("SCAN_INTERVAL", "-5m")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidDuration {
                value: "-5m".to_string()
            }
        );
    }

    #[test]
    fn unknown_log_level_is_fatal() {
        let err = config_from(&[("LOG_LEVEL", "verbose")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidLogLevel {
                value: "verbose".to_string()
            }
        );
    }

    #[test]
    fn unknown_log_format_is_fatal() {
        let err = config_from(&[("LOG_FORMAT", "yaml")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidLogFormat {
                value: "yaml".to_string()
            }
        );
    }

    #[test]
    fn unknown_scan_kind_is_fatal() {
        let err = config_from(&[("SCANS", "pods,nodes")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownScanKind {
                value: "nodes".to_string()
            }
        );
    }
}

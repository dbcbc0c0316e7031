use std::time::Duration;

use go_parse_duration::parse_duration;

use super::*;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// Scan scheduling knobs. Immutable once the scheduler starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// Time between scan passes within one loop. Must be greater than zero.
    pub interval: Duration,
    /// How long shutdown waits for in-flight passes to finish. May be zero.
    pub grace_period: Duration,
    /// Which resource families to scan, one loop per kind.
    pub kinds: Vec<ScanKind>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            grace_period: DEFAULT_GRACE_PERIOD,
            kinds: ScanKind::ALL.to_vec(),
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval);
        }
        if self.kinds.is_empty() {
            return Err(ConfigError::NoScanKinds);
        }
        Ok(())
    }
}

/// Parse a Go-style duration literal such as `"5m"` or `"1h30m"`.
///
/// Negative durations are rejected. Zero is allowed here; interval
/// positivity is enforced by [`ScanConfig::validate`] so that grace
/// periods may still be zero.
pub fn parse_go_duration(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: value.to_string(),
    };
    let nanos = parse_duration(value).map_err(|_| invalid())?;
    u64::try_from(nanos).map(Duration::from_nanos).map_err(|_| invalid())
}

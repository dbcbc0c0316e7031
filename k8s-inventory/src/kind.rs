use std::fmt;
use std::str::FromStr;

use super::*;

/// The resource families the agent knows how to scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Namespaces,
    Pods,
    Secrets,
}

impl ScanKind {
    pub const ALL: [Self; 3] = [Self::Namespaces, Self::Pods, Self::Secrets];

    /// Parse a comma-separated list such as `"namespaces,pods"`,
    /// preserving order and dropping duplicates.
    pub fn parse_list(value: &str) -> Result<Vec<Self>, ConfigError> {
        let mut kinds = Vec::new();
        for part in value.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let kind = part.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            return Err(ConfigError::NoScanKinds);
        }
        Ok(kinds)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Namespaces => "namespaces",
            Self::Pods => "pods",
            Self::Secrets => "secrets",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "namespaces" => Ok(Self::Namespaces),
            "pods" => Ok(Self::Pods),
            "secrets" => Ok(Self::Secrets),
            other => Err(ConfigError::UnknownScanKind {
                value: other.to_string(),
            }),
        }
    }
}

/// The namespace or cluster-wide selector a scan operates over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    /// Every namespace in the cluster.
    #[default]
    Cluster,
    /// A single namespace.
    Namespace(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster => f.write_str("all namespaces"),
            Self::Namespace(name) => f.write_str(name),
        }
    }
}

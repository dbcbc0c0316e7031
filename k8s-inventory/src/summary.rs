use std::collections::BTreeMap;
use std::time::Duration;

use super::*;

/// Counts and timing for one scan pass. Consumed by logging, never
/// persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanResult {
    pub kind: ScanKind,
    pub items: usize,
    pub duration: Duration,
}

/// Flattened view of one namespace at capture time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamespaceSummary {
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<metav1::Time>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations with the well-known cluster prefixes filtered out.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    pub system: bool,
    pub captured_at: metav1::Time,
}

/// Flattened view of one pod at capture time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PodSummary {
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<metav1::Time>,
    /// Set only for pods that ran to completion or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<metav1::Time>,
    pub captured_at: metav1::Time,
}

/// Flattened view of one secret at capture time. Carries key names only,
/// never the values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SecretSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub data_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<metav1::Time>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    pub captured_at: metav1::Time,
}

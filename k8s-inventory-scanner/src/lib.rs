//! Resource scanners and the scan scheduler.
//!
//! The scanners are thin read-only adapters over [`KubeApi`] that shape
//! raw resources into the flat summaries from `k8s-inventory`. The
//! [`schedule`] module drives them: one periodic loop per scan kind, a
//! shared cancellation token, and a grace-bounded shutdown.

pub use error::ScanError;
pub use namespace::NamespaceScanner;
pub use pod::PodScanner;
pub use schedule::{ScanTask, Scheduler};
pub use secret::SecretScanner;

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_inventory::{
    is_system_annotation, is_system_namespace, NamespaceSummary, PodSummary, ScanKind, Scope,
    SecretSummary,
};
use k8s_inventory_ext as k8s;
use k8s_inventory_kubeapi::KubeApi;

use k8s::corev1;
use k8s::metav1;

mod error;
mod fanout;
mod namespace;
mod pod;
pub mod schedule;
mod secret;

/// RFC 3339 rendering for optional resource timestamps in log fields.
pub(crate) fn rfc3339(ts: Option<&metav1::Time>) -> String {
    ts.map(|ts| ts.0.to_string()).unwrap_or_default()
}

//! Core types for the cluster inventory agent: scan kinds and scopes,
//! per-resource summaries, scan configuration, and the startup error
//! taxonomy. Everything here is plain data; the scanners and the
//! scheduler live in `k8s-inventory-scanner`.

pub use classify::{is_system_annotation, is_system_namespace};
pub use config::{parse_go_duration, ScanConfig, DEFAULT_GRACE_PERIOD, DEFAULT_INTERVAL};
pub use error::ConfigError;
pub use kind::{ScanKind, Scope};
pub use summary::{NamespaceSummary, PodSummary, ScanResult, SecretSummary};

use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use serde::{Deserialize, Serialize};

mod classify;
mod config;
mod error;
mod kind;
mod summary;

pub use k8s_openapi as openapi;
pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

pub use time::TimeExt;

mod time;

/// Phase reported for resources whose status block is absent.
pub const UNKNOWN_PHASE: &str = "Unknown";

pub trait PodExt {
    fn phase(&self) -> &str;
    fn started_at(&self) -> Option<&metav1::Time>;
    fn finished_at(&self) -> Option<&metav1::Time>;
    fn is_finished(&self) -> bool;
}

impl PodExt for corev1::Pod {
    fn phase(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|status| status.phase.as_deref())
            .unwrap_or(UNKNOWN_PHASE)
    }

    fn started_at(&self) -> Option<&metav1::Time> {
        self.status.as_ref()?.start_time.as_ref()
    }

    /// Finish time of the first terminated container, reported only for
    /// pods that ran to completion or failed.
    fn finished_at(&self) -> Option<&metav1::Time> {
        if !self.is_finished() {
            return None;
        }
        self.status
            .as_ref()?
            .container_statuses
            .as_ref()?
            .iter()
            .find_map(|container| {
                container.state.as_ref()?.terminated.as_ref()?.finished_at.as_ref()
            })
    }

    fn is_finished(&self) -> bool {
        matches!(self.phase(), "Succeeded" | "Failed")
    }
}

pub trait NamespaceExt {
    fn phase(&self) -> &str;
}

impl NamespaceExt for corev1::Namespace {
    fn phase(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|status| status.phase.as_deref())
            .unwrap_or(UNKNOWN_PHASE)
    }
}

pub trait SecretExt {
    fn type_name(&self) -> &str;
    fn data_keys(&self) -> Vec<String>;
}

impl SecretExt for corev1::Secret {
    fn type_name(&self) -> &str {
        self.type_.as_deref().unwrap_or(UNKNOWN_PHASE)
    }

    /// Key names only; values never leave the secret.
    fn data_keys(&self) -> Vec<String> {
        self.data
            .as_ref()
            .map(|data| data.keys().cloned().collect())
            .unwrap_or_default()
    }
}

pub fn default<T: Default>() -> T {
    T::default()
}

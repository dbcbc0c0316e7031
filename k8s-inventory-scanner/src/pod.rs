use kube::ResourceExt as _;

use k8s::PodExt as _;
use k8s::TimeExt as _;

use super::*;

/// Lists pods in one namespace or across the cluster and shapes them
/// into summaries.
#[derive(Debug)]
pub struct PodScanner {
    kubeapi: Arc<KubeApi>,
    scope: Scope,
}

impl PodScanner {
    pub fn new(kubeapi: Arc<KubeApi>, scope: Scope) -> Self {
        Self { kubeapi, scope }
    }

    /// One pod scan pass over the configured scope: namespace to pod name
    /// to summary. Namespaces with no pods are omitted.
    pub async fn list(&self) -> Result<BTreeMap<String, BTreeMap<String, PodSummary>>, ScanError> {
        let mut by_namespace = match &self.scope {
            Scope::Namespace(namespace) => {
                let pods = self.list_namespace(namespace).await?;
                BTreeMap::from([(namespace.clone(), pods)])
            }
            Scope::Cluster => {
                let namespaces = self.namespace_names().await?;
                fanout::per_namespace("pods", &namespaces, |namespace| async move {
                    self.list_namespace(&namespace).await
                })
                .await
            }
        };
        by_namespace.retain(|_, pods| !pods.is_empty());
        tracing::info!(namespaces = by_namespace.len(), "pod scan collected");
        Ok(by_namespace)
    }

    async fn list_namespace(&self, namespace: &str) -> Result<BTreeMap<String, PodSummary>, ScanError> {
        tracing::debug!(namespace, "listing pods");
        let pods = self.kubeapi.list_pods(namespace).await?;
        let captured_at = metav1::Time::now();

        let mut summaries = BTreeMap::new();
        for pod in &pods {
            let name = pod.name_any();
            let summary = summarize_pod(pod, &captured_at);
            tracing::info!(
                pod = %name,
                namespace,
                phase = %summary.phase,
                started_at = %rfc3339(summary.started_at.as_ref()),
                finished_at = %rfc3339(summary.finished_at.as_ref()),
                "pod found"
            );
            summaries.insert(name, summary);
        }
        tracing::info!(namespace, pods = summaries.len(), "pod listing completed");
        Ok(summaries)
    }

    async fn namespace_names(&self) -> Result<Vec<String>, ScanError> {
        let namespaces = self.kubeapi.list_namespaces().await?;
        Ok(namespaces.iter().map(kube::ResourceExt::name_any).collect())
    }
}

impl ScanTask for PodScanner {
    fn kind(&self) -> ScanKind {
        ScanKind::Pods
    }

    async fn scan(&self) -> Result<usize, ScanError> {
        self.list()
            .await
            .map(|by_namespace| by_namespace.values().map(BTreeMap::len).sum())
    }
}

pub(crate) fn summarize_pod(pod: &corev1::Pod, captured_at: &metav1::Time) -> PodSummary {
    PodSummary {
        phase: pod.phase().to_string(),
        started_at: pod.started_at().cloned(),
        finished_at: pod.finished_at().cloned(),
        captured_at: captured_at.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use k8s::openapi::jiff::Timestamp;
    use k8s::TimeExt as _;

    fn pod(phase: &str, terminated: bool) -> corev1::Pod {
        let container_statuses = terminated.then(|| {
            vec![corev1::ContainerStatus {
                state: Some(corev1::ContainerState {
                    terminated: Some(corev1::ContainerStateTerminated {
                        finished_at: Some(metav1::Time(
                            "2026-03-01T12:30:00Z".parse::<Timestamp>().unwrap(),
                        )),
                        ..k8s::default()
                    }),
                    ..k8s::default()
                }),
                ..k8s::default()
            }]
        });
        corev1::Pod {
            status: Some(corev1::PodStatus {
                phase: Some(phase.to_string()),
                start_time: Some(metav1::Time(
                    "2026-03-01T12:00:00Z".parse::<Timestamp>().unwrap(),
                )),
                container_statuses,
                ..k8s::default()
            }),
            ..k8s::default()
        }
    }

    #[test]
    fn running_pod_has_no_end_time() {
        let summary = summarize_pod(&pod("Running", false), &metav1::Time::now());
        assert_eq!(summary.phase, "Running");
        assert!(summary.started_at.is_some());
        assert!(summary.finished_at.is_none());
    }

    #[test]
    fn failed_pod_reports_container_finish_time() {
        let summary = summarize_pod(&pod("Failed", true), &metav1::Time::now());
        assert_eq!(summary.phase, "Failed");
        let finished = summary.finished_at.expect("failed pod should carry an end time");
        assert_eq!(finished.0, "2026-03-01T12:30:00Z".parse::<Timestamp>().unwrap());
    }
}

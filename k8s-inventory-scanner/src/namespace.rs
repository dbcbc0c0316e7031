use kube::ResourceExt as _;

use k8s::NamespaceExt as _;
use k8s::TimeExt as _;

use super::*;

/// Lists namespaces cluster-wide and shapes them into summaries.
#[derive(Debug)]
pub struct NamespaceScanner {
    kubeapi: Arc<KubeApi>,
}

impl NamespaceScanner {
    pub fn new(kubeapi: Arc<KubeApi>) -> Self {
        Self { kubeapi }
    }

    /// One namespace scan pass: name to summary for every namespace in
    /// the cluster.
    pub async fn list(&self) -> Result<BTreeMap<String, NamespaceSummary>, ScanError> {
        let namespaces = self.kubeapi.list_namespaces().await?;
        let captured_at = metav1::Time::now();

        let mut summaries = BTreeMap::new();
        for namespace in &namespaces {
            let name = namespace.name_any();
            let summary = summarize_namespace(namespace, &captured_at);
            tracing::info!(
                namespace = %name,
                phase = %summary.phase,
                system = summary.system,
                created = %rfc3339(summary.created.as_ref()),
                "namespace discovered"
            );
            summaries.insert(name, summary);
        }

        let system = summaries.values().filter(|summary| summary.system).count();
        tracing::info!(
            total = summaries.len(),
            system,
            user = summaries.len() - system,
            "namespace scan summary"
        );
        Ok(summaries)
    }
}

impl ScanTask for NamespaceScanner {
    fn kind(&self) -> ScanKind {
        ScanKind::Namespaces
    }

    async fn scan(&self) -> Result<usize, ScanError> {
        self.list().await.map(|summaries| summaries.len())
    }
}

pub(crate) fn summarize_namespace(
    namespace: &corev1::Namespace,
    captured_at: &metav1::Time,
) -> NamespaceSummary {
    let annotations = namespace
        .annotations()
        .iter()
        .filter(|(key, _)| !is_system_annotation(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    NamespaceSummary {
        phase: namespace.phase().to_string(),
        uid: namespace.uid(),
        created: namespace.creation_timestamp(),
        labels: namespace.labels().clone(),
        annotations,
        system: is_system_namespace(&namespace.name_any()),
        captured_at: captured_at.clone(),
    }
}

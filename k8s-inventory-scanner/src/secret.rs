use kube::ResourceExt as _;

use k8s::SecretExt as _;
use k8s::TimeExt as _;

use super::*;

/// Lists secrets in one namespace or across the cluster and shapes them
/// into summaries. Only key names are ever read out of the secret data.
#[derive(Debug)]
pub struct SecretScanner {
    kubeapi: Arc<KubeApi>,
    scope: Scope,
    type_filter: Option<String>,
}

impl SecretScanner {
    pub fn new(kubeapi: Arc<KubeApi>, scope: Scope) -> Self {
        Self {
            kubeapi,
            scope,
            type_filter: None,
        }
    }

    /// Restrict passes to secrets of one type, e.g. `"Opaque"` or
    /// `"kubernetes.io/tls"`.
    pub fn with_type_filter(mut self, type_name: impl Into<String>) -> Self {
        self.type_filter = Some(type_name.into());
        self
    }

    /// One secret scan pass over the configured scope: namespace to
    /// summaries. Namespaces with no matching secrets are omitted.
    pub async fn list(&self) -> Result<BTreeMap<String, Vec<SecretSummary>>, ScanError> {
        let mut by_namespace = match &self.scope {
            Scope::Namespace(namespace) => {
                let secrets = self.list_namespace(namespace).await?;
                BTreeMap::from([(namespace.clone(), secrets)])
            }
            Scope::Cluster => {
                let namespaces = self.namespace_names().await?;
                fanout::per_namespace("secrets", &namespaces, |namespace| async move {
                    self.list_namespace(&namespace).await
                })
                .await
            }
        };
        if let Some(type_name) = &self.type_filter {
            filter_by_type(&mut by_namespace, type_name);
        }
        by_namespace.retain(|_, secrets| !secrets.is_empty());

        let total: usize = by_namespace.values().map(Vec::len).sum();
        tracing::info!(
            namespaces = by_namespace.len(),
            secrets = total,
            "secret scan collected"
        );
        Ok(by_namespace)
    }

    async fn list_namespace(&self, namespace: &str) -> Result<Vec<SecretSummary>, ScanError> {
        tracing::debug!(namespace, "listing secrets");
        let secrets = self.kubeapi.list_secrets(namespace).await?;
        let captured_at = metav1::Time::now();

        let mut summaries = Vec::with_capacity(secrets.len());
        for secret in &secrets {
            let summary = summarize_secret(secret, &captured_at);
            tracing::info!(
                secret = %summary.name,
                namespace,
                secret_type = %summary.type_name,
                data_keys = summary.data_keys.len(),
                created = %rfc3339(summary.created.as_ref()),
                "secret found"
            );
            summaries.push(summary);
        }
        tracing::info!(namespace, secrets = summaries.len(), "secret listing completed");
        Ok(summaries)
    }

    async fn namespace_names(&self) -> Result<Vec<String>, ScanError> {
        let namespaces = self.kubeapi.list_namespaces().await?;
        Ok(namespaces.iter().map(kube::ResourceExt::name_any).collect())
    }
}

impl ScanTask for SecretScanner {
    fn kind(&self) -> ScanKind {
        ScanKind::Secrets
    }

    async fn scan(&self) -> Result<usize, ScanError> {
        self.list()
            .await
            .map(|by_namespace| by_namespace.values().map(Vec::len).sum())
    }
}

/// Keep only secrets of the given type, in place.
pub(crate) fn filter_by_type(
    by_namespace: &mut BTreeMap<String, Vec<SecretSummary>>,
    type_name: &str,
) {
    for secrets in by_namespace.values_mut() {
        secrets.retain(|secret| secret.type_name == type_name);
    }
}

pub(crate) fn summarize_secret(secret: &corev1::Secret, captured_at: &metav1::Time) -> SecretSummary {
    SecretSummary {
        name: secret.name_any(),
        type_name: secret.type_name().to_string(),
        data_keys: secret.data_keys(),
        created: secret.creation_timestamp(),
        labels: secret.labels().clone(),
        captured_at: captured_at.clone(),
    }
}

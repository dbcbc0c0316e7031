use std::fmt::Debug;

use k8s_inventory_ext as k8s;
use kube::api;

use k8s::corev1;

/// Read-only wrapper over a [`kube::Client`], exposing the list
/// operations the scanners need. Safe for concurrent use; scan loops
/// share one instance behind an `Arc`.
pub struct KubeApi {
    list_params: api::ListParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a `KubeApi` from the default credential chain (in-cluster
    /// service account, or the local kubeconfig outside a cluster).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> kube::Result<()> {
    /// let api = k8s_inventory_kubeapi::KubeApi::new().await?;
    /// let namespaces = api.list_namespaces().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new() -> kube::Result<Self> {
        kube::Client::try_default().await.map(Self::with_client)
    }

    /// Create a `KubeApi` backed by the provided Kubernetes client.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            list_params: api::ListParams::default(),
            client,
        }
    }

    /// List every namespace in the cluster.
    pub async fn list_namespaces(&self) -> kube::Result<Vec<corev1::Namespace>> {
        let lp = self.list_params();
        self.namespaces().list(lp).await.map(|list| list.items)
    }

    /// List the pods in one namespace.
    pub async fn list_pods(&self, namespace: &str) -> kube::Result<Vec<corev1::Pod>> {
        let lp = self.list_params();
        self.pods(namespace).list(lp).await.map(|list| list.items)
    }

    /// List the secrets in one namespace.
    pub async fn list_secrets(&self, namespace: &str) -> kube::Result<Vec<corev1::Secret>> {
        let lp = self.list_params();
        self.secrets(namespace).list(lp).await.map(|list| list.items)
    }

    /// Probe the API server with a limit-1 metadata list. Cheap enough to
    /// sit behind a readiness endpoint.
    pub async fn check_health(&self) -> kube::Result<()> {
        let lp = api::ListParams::default().limit(1);
        self.namespaces()
            .list_metadata(&lp)
            .await
            .map(|_| ())
            .inspect_err(|err| tracing::debug!(%err, "API server health probe failed"))
    }

    fn namespaces(&self) -> api::Api<corev1::Namespace> {
        api::Api::all(self.client.clone())
    }

    fn pods(&self, namespace: &str) -> api::Api<corev1::Pod> {
        api::Api::namespaced(self.client.clone(), namespace)
    }

    fn secrets(&self, namespace: &str) -> api::Api<corev1::Secret> {
        api::Api::namespaced(self.client.clone(), namespace)
    }

    fn list_params(&self) -> &api::ListParams {
        &self.list_params
    }
}

impl Debug for KubeApi {
    /// The `client` carries credentials, so it is shown as a placeholder.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeApi")
            .field("list_params", &self.list_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}

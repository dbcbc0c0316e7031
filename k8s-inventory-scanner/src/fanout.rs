use std::future::Future;

use super::*;

/// Fan a per-namespace listing out over a set of namespaces.
///
/// A namespace whose listing fails is logged at warn and skipped; the
/// remaining namespaces still get collected.
pub(crate) async fn per_namespace<T, F, Fut>(
    resource: &'static str,
    namespaces: &[String],
    mut list: F,
) -> BTreeMap<String, T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, ScanError>>,
{
    let mut collected = BTreeMap::new();
    for namespace in namespaces {
        match list(namespace.clone()).await {
            Ok(items) => {
                collected.insert(namespace.clone(), items);
            }
            Err(err) => {
                tracing::warn!(
                    namespace = %namespace,
                    resource,
                    %err,
                    "skipping namespace after failed listing"
                );
            }
        }
    }
    collected
}

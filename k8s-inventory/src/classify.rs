//! System/user classification for namespaces and annotations.

/// Namespaces that ship with a cluster or common tooling rather than user
/// workloads.
const SYSTEM_NAMESPACES: [&str; 5] = [
    "kube-system",
    "kube-public",
    "kube-node-lease",
    "local-path-storage",
    "default",
];

const SYSTEM_NAMESPACE_PREFIXES: [&str; 2] = ["kube-", "kubernetes-"];

const SYSTEM_ANNOTATION_PREFIXES: [&str; 3] =
    ["kubectl.kubernetes.io/", "kubernetes.io/", "k8s.io/"];

pub fn is_system_namespace(name: &str) -> bool {
    SYSTEM_NAMESPACES.contains(&name)
        || SYSTEM_NAMESPACE_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

/// Annotations under the well-known cluster prefixes are noise for
/// inventory purposes and get filtered from summaries.
pub fn is_system_annotation(key: &str) -> bool {
    SYSTEM_ANNOTATION_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

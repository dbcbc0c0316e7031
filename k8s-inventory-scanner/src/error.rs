use thiserror::Error;

/// A failed scan pass. Never fatal: the scheduler logs it and the next
/// tick is the retry.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cluster API request failed: {0}")]
    Client(#[from] kube::Error),
}

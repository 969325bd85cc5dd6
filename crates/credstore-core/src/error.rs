use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Rejected before any storage access (empty username or password).
    #[error("validation error: {0}")]
    Validation(String),

    /// Database open, read or write failure. Fatal to the calling operation.
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Schema missing or malformed. Surfaced separately from [`Storage`]
    /// so "needs initialization" is distinguishable from "disk failure".
    ///
    /// [`Storage`]: StoreError::Storage
    #[error("schema integrity error: {0}")]
    Integrity(String),
}

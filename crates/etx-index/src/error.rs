//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// A table needs at least one bucket.
    #[error("bucket count must be positive")]
    NoBuckets,

    /// Growing a bucket array or chain failed.
    #[error("allocation failed while {what}")]
    Allocation { what: String },
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;

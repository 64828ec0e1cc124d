//! Error types for cosann.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during index construction, mutation, or search.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Invalid index configuration (bad dimensionality or hash width).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid operation parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Vector length does not match the configured dimensionality.
    #[error("dimension mismatch: index has {expected} dimensions, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The id has no entry in the index.
    #[error("id {0} is not indexed")]
    NotFound(u64),

    /// Malformed persisted key or value.
    #[error("codec error: {0}")]
    Codec(String),

    /// Terminal failure surfaced by the underlying store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

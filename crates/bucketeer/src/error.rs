//! Error types for bucket navigation and key encoding.

use bucketeer_store::StoreError;
use thiserror::Error;

/// Errors produced while encoding or decoding keys and values.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value could not be rendered as, or parsed from, text.
    #[error("text codec failed: {0}")]
    Text(String),

    /// bincode serialization or deserialization failed.
    #[error("binary codec failed: {0}")]
    Binary(String),

    /// JSON serialization or deserialization failed.
    #[error("json codec failed: {0}")]
    Json(String),

    /// A fixed-width encoding had the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Stored bytes were not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Errors returned by bucketeer operations.
#[derive(Debug, Error)]
pub enum BucketeerError {
    /// A path with no segments was used for resolution.
    #[error("path must have at least one element")]
    EmptyPath,

    /// One or more buckets along the path do not exist.
    #[error("did not find one or more path buckets: {path}")]
    MissingPath { path: String },

    /// Error reported by the underlying store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A key or value could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Error raised by a caller-supplied transaction closure. Returning it
    /// rolls the transaction back.
    #[error("transaction callback failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BucketeerError {
    /// Wrap a caller error so it can abort a transaction.
    pub fn callback(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Callback(err.into())
    }
}

/// Convenience type alias for bucketeer operations.
pub type Result<T> = std::result::Result<T, BucketeerError>;

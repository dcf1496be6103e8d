use thiserror::Error;

/// Errors reported natively by a bucket store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A bucket name was empty.
    #[error("bucket name required")]
    BucketNameRequired,

    /// `create_bucket` was called for a bucket that already exists.
    #[error("bucket already exists: {name}")]
    BucketExists { name: String },

    /// The named bucket does not exist.
    #[error("bucket not found: {name}")]
    BucketNotFound { name: String },

    /// The name is already used by the other kind of entry (a plain value
    /// where a bucket was expected, or the reverse).
    #[error("incompatible value at {name}")]
    IncompatibleValue { name: String },

    /// A key was empty.
    #[error("key required")]
    KeyRequired,

    /// A key exceeded the configured maximum.
    #[error("key too large: {len} bytes (max {max})")]
    KeyTooLarge { len: usize, max: usize },

    /// A value exceeded the configured maximum.
    #[error("value too large: {len} bytes (max {max})")]
    ValueTooLarge { len: usize, max: usize },

    /// The bucket sequence cannot advance past `u64::MAX`.
    #[error("bucket sequence overflow")]
    SequenceOverflow,

    /// The store configuration is unusable.
    #[error("invalid store config: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    pub(crate) fn bucket_exists(name: &[u8]) -> Self {
        Self::BucketExists {
            name: display_name(name),
        }
    }

    pub(crate) fn bucket_not_found(name: &[u8]) -> Self {
        Self::BucketNotFound {
            name: display_name(name),
        }
    }

    pub(crate) fn incompatible(name: &[u8]) -> Self {
        Self::IncompatibleValue {
            name: display_name(name),
        }
    }
}

/// Render a byte name for error messages.
fn display_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

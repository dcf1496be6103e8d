//! The store boundary: buckets, transactions, and transaction scoping.
//!
//! Any embedded ordered key-value store with nested buckets can back
//! bucketeer by implementing these traits.

use std::ops::Bound;

use crate::error::{StoreError, StoreResult};
use crate::stats::BucketStats;

/// Borrowed `(key, value)` pairs yielded by a bucket cursor.
pub type Entries<'a> = Box<dyn Iterator<Item = (&'a [u8], &'a [u8])> + 'a>;

/// Read view of a bucket inside an open transaction.
///
/// Keys and nested bucket names share one namespace: a name is either a
/// plain entry or a bucket, never both.
pub trait Bucket {
    /// Value stored under `key`, or `None` if absent or if `key` names a
    /// nested bucket.
    fn get(&self, key: &[u8]) -> Option<&[u8]>;

    /// Nested bucket called `name`.
    fn bucket(&self, name: &[u8]) -> Option<&Self>;

    /// Last sequence value issued for this bucket (0 if none).
    fn sequence(&self) -> u64;

    /// Statistics for this bucket and everything nested below it.
    fn stats(&self) -> BucketStats;

    /// Native cursor over the plain entries whose keys fall between the
    /// bounds, in byte-lexicographic key order. Nested buckets are skipped.
    ///
    /// An inverted range yields nothing.
    fn range<'a>(&'a self, lower: Bound<&[u8]>, upper: Bound<&[u8]>) -> Entries<'a>;

    /// Names of the nested buckets, in byte order.
    fn bucket_names(&self) -> Vec<&[u8]>;

    /// All plain entries in key order.
    fn iter(&self) -> Entries<'_> {
        self.range(Bound::Unbounded, Bound::Unbounded)
    }

    /// Whether a plain entry exists under `key`.
    fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

/// Mutable bucket access inside a write transaction.
pub trait BucketMut: Bucket {
    /// Nested bucket called `name`, for mutation.
    fn bucket_mut(&mut self, name: &[u8]) -> Option<&mut Self>;

    /// Create a nested bucket. Fails with [`StoreError::BucketExists`] if it
    /// already exists.
    fn create_bucket(&mut self, name: &[u8]) -> StoreResult<&mut Self>;

    /// Create a nested bucket, or return the existing one.
    fn create_bucket_if_not_exists(&mut self, name: &[u8]) -> StoreResult<&mut Self>;

    /// Delete a nested bucket and everything below it. Fails with
    /// [`StoreError::BucketNotFound`] if it does not exist.
    fn delete_bucket(&mut self, name: &[u8]) -> StoreResult<()>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Remove the entry under `key`. Removing an absent key is a no-op.
    fn delete(&mut self, key: &[u8]) -> StoreResult<()>;

    /// Advance and return the bucket sequence.
    fn next_sequence(&mut self) -> StoreResult<u64>;

    /// Overwrite the bucket sequence.
    fn set_sequence(&mut self, value: u64) -> StoreResult<()>;
}

/// Top-level bucket lookup inside a read-only transaction.
pub trait ReadTx {
    type Bucket: Bucket;

    /// Top-level bucket called `name`.
    fn bucket(&self, name: &[u8]) -> Option<&Self::Bucket>;

    /// Names of all top-level buckets, in byte order.
    fn bucket_names(&self) -> Vec<&[u8]>;
}

/// Top-level bucket management inside a read-write transaction.
pub trait WriteTx {
    type Bucket: BucketMut;

    /// Top-level bucket called `name`.
    fn bucket(&self, name: &[u8]) -> Option<&Self::Bucket>;

    /// Top-level bucket called `name`, for mutation.
    fn bucket_mut(&mut self, name: &[u8]) -> Option<&mut Self::Bucket>;

    /// Create a top-level bucket; fails if it already exists.
    fn create_bucket(&mut self, name: &[u8]) -> StoreResult<&mut Self::Bucket>;

    /// Create a top-level bucket, or return the existing one.
    fn create_bucket_if_not_exists(&mut self, name: &[u8]) -> StoreResult<&mut Self::Bucket>;

    /// Delete a top-level bucket; fails if it does not exist.
    fn delete_bucket(&mut self, name: &[u8]) -> StoreResult<()>;
}

/// An embedded transactional store of nested buckets.
///
/// Implementations must be shareable across threads and uphold:
/// - at most one write transaction runs at a time;
/// - read transactions observe the snapshot taken when they began and never
///   block, or are blocked by, the writer;
/// - a transaction commits iff its closure returns `Ok`.
pub trait Store: Send + Sync {
    type Bucket: BucketMut;
    type ReadTx: ReadTx<Bucket = Self::Bucket>;
    type WriteTx: WriteTx<Bucket = Self::Bucket>;

    /// Run `f` inside a read-only transaction.
    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&Self::ReadTx) -> Result<T, E>;

    /// Run `f` inside a read-write transaction, committing on `Ok` and
    /// rolling back on `Err`.
    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut Self::WriteTx) -> Result<T, E>;
}

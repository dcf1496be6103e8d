//! The [`Bucketeer`] accessor: a store handle bound to a bucket path.

use std::fmt;

use bucketeer_store::{BucketStats, Store};
use serde::Serialize;

use crate::error::Result;
use crate::key::{BinaryKey, ByteKey, Int64Key, JsonKey, Key, StringKey, TextKey, Uint64Key};
use crate::keyfarer::Keyfarer;
use crate::path::Path;
use crate::{resolve, scope};

/// Resolves one bucket in a store and runs transactions against it.
///
/// A `Bucketeer` only borrows the store and holds an immutable [`Path`], so
/// it is cheap to build, clone, and discard, and any number of them may use
/// the same store from different threads.
pub struct Bucketeer<'db, S> {
    db: &'db S,
    path: Path,
}

impl<'db, S: Store> Bucketeer<'db, S> {
    /// Accessor for the bucket reached through `names`.
    pub fn new<I, N>(db: &'db S, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: AsRef<[u8]>,
    {
        Self::for_path(db, Path::new(names))
    }

    /// Accessor for the bucket at `path`.
    pub fn for_path(db: &'db S, path: Path) -> Self {
        Self { db, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn db(&self) -> &'db S {
        self.db
    }

    /// Create any missing buckets along the path.
    pub fn ensure_path_buckets(&self) -> Result<()> {
        resolve::ensure_path_buckets(self.db, &self.path)
    }

    /// Create a nested bucket under this one. This bucket's full path must
    /// already exist.
    pub fn ensure_nested_bucket(&self, name: impl AsRef<[u8]>) -> Result<()> {
        resolve::ensure_nested_bucket(self.db, &self.path, name.as_ref())
    }

    /// Accessor for the nested bucket `name`, on the same store.
    pub fn in_nested_bucket(&self, name: impl AsRef<[u8]>) -> Bucketeer<'db, S> {
        Self::for_path(self.db, self.path.nest(name))
    }

    /// Delete the nested bucket `name` and everything below it.
    pub fn delete_nested_bucket(&self, name: impl AsRef<[u8]>) -> Result<()> {
        scope::delete_nested_bucket(self.db, &self.path, name.as_ref())
    }

    /// Statistics for this bucket.
    pub fn get_bucket_stats(&self) -> Result<BucketStats> {
        scope::bucket_stats(self.db, &self.path)
    }

    /// Whether the whole path currently resolves.
    pub fn exists(&self) -> Result<bool> {
        Ok(self.view(|_| Ok(()))?.is_some())
    }

    /// Run `f` against this bucket in a read-only transaction. Returns
    /// `Ok(None)` without calling `f` if the path does not resolve.
    pub fn view<T, F>(&self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&S::Bucket) -> Result<T>,
    {
        scope::view_in_bucket(self.db, &self.path, f)
    }

    /// Run `f` against this bucket in a read-write transaction. Returns
    /// `Ok(None)` without calling `f` if the path does not resolve.
    pub fn update<T, F>(&self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut S::Bucket) -> Result<T>,
    {
        scope::update_in_bucket(self.db, &self.path, f)
    }

    /// Run `f` in a read-write transaction with the bucket's next sequence
    /// value, returning that value alongside `f`'s result.
    pub fn update_with_sequence<T, F>(&self, f: F) -> Result<Option<(u64, T)>>
    where
        F: FnOnce(&mut S::Bucket, u64) -> Result<T>,
    {
        scope::update_with_sequence(self.db, &self.path, f)
    }

    /// Per-key accessor for any [`Key`].
    pub fn for_key<K: Key + ?Sized>(&self, key: &K) -> Result<Keyfarer<'db, S>> {
        let bytes = key.key_bytes()?.into_owned();
        Ok(Keyfarer::new(self.clone(), bytes))
    }

    /// Per-key accessor for raw bytes.
    pub fn for_byte_key(&self, key: impl AsRef<[u8]>) -> Keyfarer<'db, S> {
        Keyfarer::new(self.clone(), ByteKey::new(key).into_bytes())
    }

    /// Per-key accessor for a string.
    pub fn for_string_key(&self, key: impl Into<String>) -> Keyfarer<'db, S> {
        Keyfarer::new(self.clone(), StringKey::new(key).into_bytes())
    }

    /// Per-key accessor for a `u64`, stored big-endian and fixed-width so it
    /// sorts with other `u64` keys.
    pub fn for_uint64_key(&self, key: u64) -> Keyfarer<'db, S> {
        Keyfarer::new(self.clone(), Uint64Key(key).to_bytes().to_vec())
    }

    /// Per-key accessor for an `i64`, shifted onto the unsigned range and
    /// stored big-endian so it sorts with other `i64` keys.
    pub fn for_int64_key(&self, key: i64) -> Keyfarer<'db, S> {
        Keyfarer::new(self.clone(), Int64Key(key).to_bytes().to_vec())
    }

    /// Per-key accessor for the `Display` form of `key`.
    pub fn for_text_key<T: fmt::Display + ?Sized>(&self, key: &T) -> Result<Keyfarer<'db, S>> {
        self.for_key(&TextKey(key))
    }

    /// Per-key accessor for the bincode form of `key`.
    pub fn for_binary_key<T: Serialize + ?Sized>(&self, key: &T) -> Result<Keyfarer<'db, S>> {
        self.for_key(&BinaryKey(key))
    }

    /// Per-key accessor for the JSON form of `key`. Object keys are sorted,
    /// so equal maps address the same entry.
    pub fn for_json_key<T: Serialize + ?Sized>(&self, key: &T) -> Result<Keyfarer<'db, S>> {
        self.for_key(&JsonKey(key))
    }
}

impl<S> Clone for Bucketeer<'_, S> {
    fn clone(&self) -> Self {
        Self {
            db: self.db,
            path: self.path.clone(),
        }
    }
}

impl<S> fmt::Debug for Bucketeer<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucketeer")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

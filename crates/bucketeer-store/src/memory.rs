//! In-memory bucket store for tests and embedding.
//!
//! [`InMemoryStore`] keeps the committed bucket tree behind an `Arc`. A read
//! transaction clones that `Arc` and works on an immutable snapshot. A write
//! transaction clones it too, then copies nodes on first mutation
//! (`Arc::make_mut`), so untouched subtrees stay shared with readers. Keys
//! and values are reference-counted [`Bytes`], so copying a node duplicates
//! its map structure but never the stored bytes. Commit swaps the new root
//! in; rollback just drops it.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use bytes::Bytes;
use tracing::trace;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::stats::BucketStats;
use crate::traits::{Bucket, BucketMut, Entries, ReadTx, Store, WriteTx};

/// A bucket node in the in-memory tree.
#[derive(Clone, Debug)]
pub struct MemoryBucket {
    entries: BTreeMap<Bytes, Bytes>,
    buckets: BTreeMap<Vec<u8>, Arc<MemoryBucket>>,
    sequence: u64,
    config: StoreConfig,
}

impl MemoryBucket {
    fn new(config: StoreConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            buckets: BTreeMap::new(),
            sequence: 0,
            config,
        }
    }

    fn check_bucket_name(&self, name: &[u8]) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::BucketNameRequired);
        }
        self.config.check_key(name)
    }
}

/// Whether a range with these bounds would be empty or inverted.
fn is_empty_range(lower: Bound<&[u8]>, upper: Bound<&[u8]>) -> bool {
    match (lower, upper) {
        (Bound::Included(lo), Bound::Included(hi)) => lo > hi,
        (Bound::Included(lo), Bound::Excluded(hi))
        | (Bound::Excluded(lo), Bound::Included(hi))
        | (Bound::Excluded(lo), Bound::Excluded(hi)) => lo >= hi,
        _ => false,
    }
}

impl Bucket for MemoryBucket {
    fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.entries.get(key).map(Bytes::as_ref)
    }

    fn bucket(&self, name: &[u8]) -> Option<&Self> {
        self.buckets.get(name).map(Arc::as_ref)
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }

    fn stats(&self) -> BucketStats {
        let mut stats = BucketStats {
            key_count: self.entries.len(),
            bucket_count: 1,
            depth: 1,
            key_bytes: self.entries.keys().map(Bytes::len).sum(),
            value_bytes: self.entries.values().map(Bytes::len).sum(),
        };
        for child in self.buckets.values() {
            stats.merge_child(&child.stats());
        }
        stats
    }

    fn range<'a>(&'a self, lower: Bound<&[u8]>, upper: Bound<&[u8]>) -> Entries<'a> {
        // BTreeMap::range panics on inverted bounds.
        if is_empty_range(lower, upper) {
            return Box::new(std::iter::empty());
        }
        Box::new(
            self.entries
                .range::<[u8], _>((lower, upper))
                .map(|(k, v)| (k.as_ref(), v.as_ref())),
        )
    }

    fn bucket_names(&self) -> Vec<&[u8]> {
        self.buckets.keys().map(Vec::as_slice).collect()
    }
}

impl BucketMut for MemoryBucket {
    fn bucket_mut(&mut self, name: &[u8]) -> Option<&mut Self> {
        self.buckets.get_mut(name).map(Arc::make_mut)
    }

    fn create_bucket(&mut self, name: &[u8]) -> StoreResult<&mut Self> {
        self.check_bucket_name(name)?;
        if self.entries.contains_key(name) {
            return Err(StoreError::incompatible(name));
        }
        if self.buckets.contains_key(name) {
            return Err(StoreError::bucket_exists(name));
        }
        let child = Arc::new(MemoryBucket::new(self.config));
        let slot = self.buckets.entry(name.to_vec()).or_insert(child);
        Ok(Arc::make_mut(slot))
    }

    fn create_bucket_if_not_exists(&mut self, name: &[u8]) -> StoreResult<&mut Self> {
        self.check_bucket_name(name)?;
        if self.entries.contains_key(name) {
            return Err(StoreError::incompatible(name));
        }
        let config = self.config;
        let slot = self
            .buckets
            .entry(name.to_vec())
            .or_insert_with(|| Arc::new(MemoryBucket::new(config)));
        Ok(Arc::make_mut(slot))
    }

    fn delete_bucket(&mut self, name: &[u8]) -> StoreResult<()> {
        if self.entries.contains_key(name) {
            return Err(StoreError::incompatible(name));
        }
        match self.buckets.remove(name) {
            Some(_) => Ok(()),
            None => Err(StoreError::bucket_not_found(name)),
        }
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.config.check_key(key)?;
        self.config.check_value(value)?;
        if self.buckets.contains_key(key) {
            return Err(StoreError::incompatible(key));
        }
        self.entries
            .insert(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        if self.buckets.contains_key(key) {
            return Err(StoreError::incompatible(key));
        }
        self.entries.remove(key);
        Ok(())
    }

    fn next_sequence(&mut self) -> StoreResult<u64> {
        self.sequence = self
            .sequence
            .checked_add(1)
            .ok_or(StoreError::SequenceOverflow)?;
        Ok(self.sequence)
    }

    fn set_sequence(&mut self, value: u64) -> StoreResult<()> {
        self.sequence = value;
        Ok(())
    }
}

/// Read-only transaction over a committed snapshot.
#[derive(Debug)]
pub struct MemoryReadTx {
    root: Arc<MemoryBucket>,
}

impl ReadTx for MemoryReadTx {
    type Bucket = MemoryBucket;

    fn bucket(&self, name: &[u8]) -> Option<&MemoryBucket> {
        self.root.bucket(name)
    }

    fn bucket_names(&self) -> Vec<&[u8]> {
        self.root.bucket_names()
    }
}

/// Read-write transaction working on a private copy-on-write root.
#[derive(Debug)]
pub struct MemoryWriteTx {
    root: Arc<MemoryBucket>,
}

impl WriteTx for MemoryWriteTx {
    type Bucket = MemoryBucket;

    fn bucket(&self, name: &[u8]) -> Option<&MemoryBucket> {
        self.root.bucket(name)
    }

    fn bucket_mut(&mut self, name: &[u8]) -> Option<&mut MemoryBucket> {
        if !self.root.buckets.contains_key(name) {
            return None;
        }
        Arc::make_mut(&mut self.root).bucket_mut(name)
    }

    fn create_bucket(&mut self, name: &[u8]) -> StoreResult<&mut MemoryBucket> {
        Arc::make_mut(&mut self.root).create_bucket(name)
    }

    fn create_bucket_if_not_exists(&mut self, name: &[u8]) -> StoreResult<&mut MemoryBucket> {
        Arc::make_mut(&mut self.root).create_bucket_if_not_exists(name)
    }

    fn delete_bucket(&mut self, name: &[u8]) -> StoreResult<()> {
        Arc::make_mut(&mut self.root).delete_bucket(name)
    }
}

/// In-memory, copy-on-write bucket store.
///
/// Data is lost when the store is dropped.
pub struct InMemoryStore {
    committed: RwLock<Arc<MemoryBucket>>,
    writer: Mutex<()>,
    config: StoreConfig,
}

impl InMemoryStore {
    /// Create an empty store with the default limits.
    pub fn new() -> Self {
        let config = StoreConfig::default();
        Self {
            committed: RwLock::new(Arc::new(MemoryBucket::new(config))),
            writer: Mutex::new(()),
            config,
        }
    }

    /// Create an empty store with custom limits.
    pub fn with_config(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            committed: RwLock::new(Arc::new(MemoryBucket::new(config))),
            writer: Mutex::new(()),
            config,
        })
    }

    /// The limits this store enforces.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of committed top-level buckets.
    pub fn bucket_count(&self) -> usize {
        self.snapshot().buckets.len()
    }

    // The lock only guards a pointer swap, so a poisoned lock never holds a
    // half-written root.
    fn snapshot(&self) -> Arc<MemoryBucket> {
        Arc::clone(&self.committed.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for InMemoryStore {
    type Bucket = MemoryBucket;
    type ReadTx = MemoryReadTx;
    type WriteTx = MemoryWriteTx;

    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&MemoryReadTx) -> Result<T, E>,
    {
        let tx = MemoryReadTx {
            root: self.snapshot(),
        };
        f(&tx)
    }

    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut MemoryWriteTx) -> Result<T, E>,
    {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tx = MemoryWriteTx {
            root: self.snapshot(),
        };
        match f(&mut tx) {
            Ok(value) => {
                *self
                    .committed
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = tx.root;
                trace!("write transaction committed");
                Ok(value)
            }
            Err(err) => {
                trace!("write transaction rolled back");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("bucket_count", &self.bucket_count())
            .field("config", &self.config)
            .finish()
    }
}

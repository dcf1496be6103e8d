//! Store boundary for bucketeer.
//!
//! This crate describes the embedded, transactional, ordered key-value store
//! that bucketeer navigates. The store is organized as nested named buckets:
//! every bucket holds key/value entries and may hold further buckets, and
//! keys and bucket names share one namespace inside a bucket.
//!
//! # Traits
//!
//! - [`Bucket`] -- read view of a bucket (lookups, nested buckets, cursor)
//! - [`BucketMut`] -- mutation of a bucket inside a write transaction
//! - [`ReadTx`] / [`WriteTx`] -- top-level bucket access per transaction
//! - [`Store`] -- read-only (`view`) and read-write (`update`) scoping
//!
//! # Backends
//!
//! - [`InMemoryStore`] -- copy-on-write tree for tests and embedding
//!
//! # Transaction Rules
//!
//! 1. At most one write transaction is active at a time.
//! 2. Read transactions see the snapshot taken when they started.
//! 3. A transaction commits when its closure returns `Ok` and rolls back
//!    otherwise. Sequence advancement rolls back with everything else.
//! 4. Read transactions have no mutating API at all.

pub mod config;
pub mod error;
pub mod memory;
pub mod stats;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryStore, MemoryBucket, MemoryReadTx, MemoryWriteTx};
pub use stats::BucketStats;
pub use traits::{Bucket, BucketMut, Entries, ReadTx, Store, WriteTx};

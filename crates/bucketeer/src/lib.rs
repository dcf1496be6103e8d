//! Navigation and key encoding over an embedded store of nested buckets.
//!
//! A [`Bucketeer`] binds a store handle to a [`Path`] of bucket names and runs
//! read-only or read-write transactions directly against the bucket at the
//! end of that path. A [`Keyfarer`] narrows that further to one key, encoded
//! by one of the byte-sortable schemes in [`codec`].
//!
//! # Example
//!
//! ```
//! use bucketeer::{Bucketeer, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! let users = Bucketeer::new(&store, ["app", "users"]);
//! users.ensure_path_buckets().unwrap();
//!
//! users.for_uint64_key(42).put_string("v").unwrap();
//! assert_eq!(users.for_uint64_key(42).get_string().unwrap().as_deref(), Some("v"));
//! ```
//!
//! # Modules
//!
//! - [`path`] -- immutable bucket paths
//! - [`codec`] -- key and value encodings
//! - [`key`] -- the [`Key`] trait and its variants
//! - [`resolve`] -- walking and creating bucket chains
//! - [`scope`] -- transactions scoped to a resolved bucket
//! - [`accessor`] -- the [`Bucketeer`] store + path accessor
//! - [`keyfarer`] -- the per-key accessor
//!
//! # Absent Paths
//!
//! Resolution never treats a missing bucket as an error. Scoped `view` and
//! `update` return `Ok(None)` without running the caller's closure when the
//! path does not resolve. Operations with nothing to hand back to a closure
//! (deleting a nested bucket, reading stats, writing a key) report
//! [`BucketeerError::MissingPath`] instead.

pub mod accessor;
pub mod codec;
pub mod error;
pub mod key;
pub mod keyfarer;
pub mod path;
pub mod resolve;
pub mod scope;

pub use accessor::Bucketeer;
pub use bucketeer_store::{
    Bucket, BucketMut, BucketStats, InMemoryStore, Store, StoreConfig, StoreError,
};
pub use error::{BucketeerError, CodecError, Result};
pub use key::{BinaryKey, ByteKey, Int64Key, JsonKey, Key, StringKey, TextKey, Uint64Key};
pub use keyfarer::Keyfarer;
pub use path::Path;

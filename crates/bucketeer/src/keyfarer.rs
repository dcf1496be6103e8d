//! The [`Keyfarer`] accessor: one encoded key inside one bucket.
//!
//! Reads over a path that does not resolve yield `None`. Writes and deletes
//! over such a path fail with [`BucketeerError::MissingPath`](crate::BucketeerError::MissingPath),
//! since silently dropping a write would hide a missing `ensure_path_buckets`.

use std::fmt;
use std::str::FromStr;

use bucketeer_store::{Bucket, BucketMut, Store};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::accessor::Bucketeer;
use crate::codec;
use crate::error::{CodecError, Result};

/// A bucket accessor paired with one encoded key.
pub struct Keyfarer<'db, S> {
    bucketeer: Bucketeer<'db, S>,
    key: Vec<u8>,
}

impl<'db, S: Store> Keyfarer<'db, S> {
    pub fn new(bucketeer: Bucketeer<'db, S>, key: Vec<u8>) -> Self {
        Self { bucketeer, key }
    }

    /// The encoded key bytes.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn bucketeer(&self) -> &Bucketeer<'db, S> {
        &self.bucketeer
    }

    /// Whether a value is stored under the key.
    pub fn exists(&self) -> Result<bool> {
        let found = self.bucketeer.view(|b| Ok(b.contains_key(&self.key)))?;
        Ok(found.unwrap_or(false))
    }

    /// The raw value stored under the key.
    pub fn get(&self) -> Result<Option<Vec<u8>>> {
        self.get_with(|bytes| Ok(bytes.to_vec()))
    }

    /// Store a raw value under the key.
    pub fn put(&self, value: impl AsRef<[u8]>) -> Result<()> {
        let value = value.as_ref();
        self.write(|b, key| Ok(b.put(key, value)?))
    }

    /// Remove the key. Removing an absent key succeeds.
    pub fn delete(&self) -> Result<()> {
        self.write(|b, key| Ok(b.delete(key)?))
    }

    pub fn get_string(&self) -> Result<Option<String>> {
        self.get_with(codec::decode_string)
    }

    pub fn put_string(&self, value: &str) -> Result<()> {
        self.put(value.as_bytes())
    }

    /// Read a value written by [`Keyfarer::put_uint64`].
    pub fn get_uint64(&self) -> Result<Option<u64>> {
        self.get_with(codec::decode_uint64)
    }

    /// Store a `u64` in fixed-width big-endian form.
    pub fn put_uint64(&self, value: u64) -> Result<()> {
        self.put(codec::encode_uint64(value))
    }

    /// Read a value written by [`Keyfarer::put_int64`].
    pub fn get_int64(&self) -> Result<Option<i64>> {
        self.get_with(codec::decode_int64)
    }

    /// Store an `i64` in its sign-flipped big-endian form.
    pub fn put_int64(&self, value: i64) -> Result<()> {
        self.put(codec::encode_int64(value))
    }

    /// Parse the stored text with `FromStr`.
    pub fn get_text<T>(&self) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get_with(codec::decode_text)
    }

    /// Store the `Display` form of `value`.
    pub fn put_text<T: fmt::Display + ?Sized>(&self, value: &T) -> Result<()> {
        self.put(codec::encode_text(value)?)
    }

    pub fn get_binary<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.get_with(codec::decode_binary)
    }

    pub fn put_binary<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.put(codec::encode_binary(value)?)
    }

    pub fn get_json<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.get_with(codec::decode_json)
    }

    pub fn put_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.put(codec::encode_json(value)?)
    }

    fn get_with<T, D>(&self, decode: D) -> Result<Option<T>>
    where
        D: FnOnce(&[u8]) -> std::result::Result<T, CodecError>,
    {
        let value = self.bucketeer.view(|b| match b.get(&self.key) {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        })?;
        Ok(value.flatten())
    }

    fn write<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut S::Bucket, &[u8]) -> Result<()>,
    {
        self.bucketeer
            .update(|b| f(b, &self.key))?
            .ok_or_else(|| self.bucketeer.path().missing())
    }
}

impl<S> Clone for Keyfarer<'_, S> {
    fn clone(&self) -> Self {
        Self {
            bucketeer: self.bucketeer.clone(),
            key: self.key.clone(),
        }
    }
}

impl<S> fmt::Debug for Keyfarer<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyfarer")
            .field("bucketeer", &self.bucketeer)
            .field("key", &String::from_utf8_lossy(&self.key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BucketeerError;
    use bucketeer_store::InMemoryStore;
    use serde::Deserialize;
    use std::net::Ipv4Addr;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        age: u8,
    }

    fn users(store: &InMemoryStore) -> Bucketeer<'_, InMemoryStore> {
        let users = Bucketeer::new(store, ["app", "users"]);
        users.ensure_path_buckets().unwrap();
        users
    }

    #[test]
    fn raw_put_get_delete() {
        let store = InMemoryStore::new();
        let key = users(&store).for_string_key("alice");
        assert!(!key.exists().unwrap());
        assert_eq!(key.get().unwrap(), None);

        key.put(b"hello").unwrap();
        assert!(key.exists().unwrap());
        assert_eq!(key.get().unwrap(), Some(b"hello".to_vec()));

        key.delete().unwrap();
        assert!(!key.exists().unwrap());
        key.delete().unwrap();
    }

    #[test]
    fn typed_values() {
        let store = InMemoryStore::new();
        let b = users(&store);

        b.for_string_key("s").put_string("text").unwrap();
        assert_eq!(b.for_string_key("s").get_string().unwrap().as_deref(), Some("text"));

        b.for_string_key("u").put_uint64(u64::MAX).unwrap();
        assert_eq!(b.for_string_key("u").get_uint64().unwrap(), Some(u64::MAX));

        b.for_string_key("i").put_int64(-17).unwrap();
        assert_eq!(b.for_string_key("i").get_int64().unwrap(), Some(-17));

        let addr = Ipv4Addr::new(192, 168, 1, 1);
        b.for_string_key("t").put_text(&addr).unwrap();
        assert_eq!(b.for_string_key("t").get_text::<Ipv4Addr>().unwrap(), Some(addr));

        let profile = Profile {
            name: "ada".into(),
            age: 36,
        };
        b.for_string_key("j").put_json(&profile).unwrap();
        assert_eq!(b.for_string_key("j").get_json::<Profile>().unwrap(), Some(profile));

        let profile = Profile {
            name: "grace".into(),
            age: 45,
        };
        b.for_string_key("bin").put_binary(&profile).unwrap();
        assert_eq!(
            b.for_string_key("bin").get_binary::<Profile>().unwrap(),
            Some(profile)
        );
    }

    #[test]
    fn decode_errors_surface() {
        let store = InMemoryStore::new();
        let key = users(&store).for_string_key("short");
        key.put([1_u8, 2, 3]).unwrap();
        assert!(matches!(
            key.get_uint64(),
            Err(BucketeerError::Codec(CodecError::InvalidLength { .. }))
        ));
        assert!(matches!(
            key.get_json::<Profile>(),
            Err(BucketeerError::Codec(CodecError::Json(_)))
        ));
    }

    #[test]
    fn absent_path_reads_none_and_rejects_writes() {
        let store = InMemoryStore::new();
        let key = Bucketeer::new(&store, ["missing"]).for_uint64_key(1);
        assert_eq!(key.get().unwrap(), None);
        assert!(!key.exists().unwrap());

        let err = key.put_string("x").unwrap_err();
        assert!(matches!(err, BucketeerError::MissingPath { ref path } if path == "missing"));
        assert!(matches!(key.delete(), Err(BucketeerError::MissingPath { .. })));
        assert_eq!(store.bucket_count(), 0);
    }

    #[test]
    fn key_that_names_a_bucket() {
        let store = InMemoryStore::new();
        let b = users(&store);
        b.ensure_nested_bucket("active").unwrap();
        let key = b.for_string_key("active");
        assert_eq!(key.get().unwrap(), None);
        assert!(matches!(
            key.put("v"),
            Err(BucketeerError::Store(bucketeer_store::StoreError::IncompatibleValue { .. }))
        ));
    }

    #[test]
    fn json_key_addresses_same_entry() {
        let store = InMemoryStore::new();
        let b = users(&store);
        b.for_json_key(&("org", 7)).unwrap().put_string("seven").unwrap();
        let again = b.for_json_key(&("org", 7)).unwrap();
        assert_eq!(again.get_string().unwrap().as_deref(), Some("seven"));
        assert_eq!(again.key(), br#"["org",7]"#);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryStore::new();
        let key = Bucketeer::new(&store, ["a"]).for_string_key("k");
        let debug = format!("{key:?}");
        assert!(debug.contains("Keyfarer"));
        assert!(debug.contains("Path(a)"));
        assert!(debug.contains("\"k\""));
    }
}

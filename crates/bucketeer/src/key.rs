//! Typed keys and their canonical byte encodings.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::codec::{encode_binary, encode_int64, encode_json, encode_text, encode_uint64};
use crate::error::CodecError;

/// A value that can address an entry in a bucket.
///
/// Encoding is deterministic: the same logical value always yields the same
/// bytes, which the store relies on for equality lookups.
pub trait Key {
    /// The canonical byte encoding of this key.
    fn key_bytes(&self) -> Result<Cow<'_, [u8]>, CodecError>;
}

impl<K: Key + ?Sized> Key for &K {
    fn key_bytes(&self) -> Result<Cow<'_, [u8]>, CodecError> {
        (**self).key_bytes()
    }
}

/// Raw bytes, used as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteKey(pub Vec<u8>);

impl ByteKey {
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self(key.as_ref().to_vec())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Key for ByteKey {
    fn key_bytes(&self) -> Result<Cow<'_, [u8]>, CodecError> {
        Ok(Cow::Borrowed(&self.0))
    }
}

/// A string, encoded as its UTF-8 bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringKey(pub String);

impl StringKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

impl Key for StringKey {
    fn key_bytes(&self) -> Result<Cow<'_, [u8]>, CodecError> {
        Ok(Cow::Borrowed(self.0.as_bytes()))
    }
}

/// An unsigned integer in fixed-width big-endian form, byte-sortable with
/// other `Uint64Key`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uint64Key(pub u64);

impl Uint64Key {
    pub fn to_bytes(self) -> [u8; 8] {
        encode_uint64(self.0)
    }
}

impl Key for Uint64Key {
    fn key_bytes(&self) -> Result<Cow<'_, [u8]>, CodecError> {
        Ok(Cow::Owned(self.to_bytes().to_vec()))
    }
}

/// A signed integer shifted onto the unsigned range and stored big-endian,
/// byte-sortable with other `Int64Key`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Int64Key(pub i64);

impl Int64Key {
    pub fn to_bytes(self) -> [u8; 8] {
        encode_int64(self.0)
    }
}

impl Key for Int64Key {
    fn key_bytes(&self) -> Result<Cow<'_, [u8]>, CodecError> {
        Ok(Cow::Owned(self.to_bytes().to_vec()))
    }
}

/// Any value keyed by its `Display` form.
#[derive(Clone, Debug)]
pub struct TextKey<T>(pub T);

impl<T: fmt::Display> Key for TextKey<T> {
    fn key_bytes(&self) -> Result<Cow<'_, [u8]>, CodecError> {
        encode_text(&self.0).map(Cow::Owned)
    }
}

/// Any serializable value keyed by its bincode form.
///
/// Bincode follows the value's own serialization order, so only use types
/// that serialize deterministically. A `HashMap` inside the key will not.
#[derive(Clone, Debug)]
pub struct BinaryKey<T>(pub T);

impl<T: Serialize> Key for BinaryKey<T> {
    fn key_bytes(&self) -> Result<Cow<'_, [u8]>, CodecError> {
        encode_binary(&self.0).map(Cow::Owned)
    }
}

/// Any serializable value keyed by its JSON form. Object keys are sorted.
#[derive(Clone, Debug)]
pub struct JsonKey<T>(pub T);

impl<T: Serialize> Key for JsonKey<T> {
    fn key_bytes(&self) -> Result<Cow<'_, [u8]>, CodecError> {
        encode_json(&self.0).map(Cow::Owned)
    }
}

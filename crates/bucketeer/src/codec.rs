//! Byte encodings for keys and values.
//!
//! Integer encodings are fixed-width big-endian so that byte-lexicographic
//! order equals numeric order, which makes range scans over numeric keys
//! work with the store's native cursor. Signed integers have their sign bit
//! flipped first, which moves the signed range onto the unsigned range while
//! keeping negatives below non-negatives.
//!
//! Text, binary (bincode) and JSON encodings delegate to their marshalers and
//! return [`CodecError`] when marshaling fails. They carry no ordering
//! guarantee. JSON output sorts object keys, so maps encode the same way
//! regardless of iteration order. Bincode writes fields and map entries in
//! the order the value serializes them, so it is only deterministic for types
//! whose serialization order is fixed (structs, `Vec`, `BTreeMap`, but not
//! `HashMap`).

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// Width of the fixed-length integer encodings.
pub const INT_WIDTH: usize = 8;

const SIGN_BIT: u64 = 1 << 63;

/// Encode a `u64` as 8 big-endian bytes.
pub fn encode_uint64(value: u64) -> [u8; INT_WIDTH] {
    value.to_be_bytes()
}

/// Decode bytes produced by [`encode_uint64`].
pub fn decode_uint64(bytes: &[u8]) -> Result<u64, CodecError> {
    let raw: [u8; INT_WIDTH] = bytes.try_into().map_err(|_| CodecError::InvalidLength {
        expected: INT_WIDTH,
        actual: bytes.len(),
    })?;
    Ok(u64::from_be_bytes(raw))
}

/// Encode an `i64` as 8 big-endian bytes with the sign bit flipped
/// (equivalently, `value + 2^63` in wrapping unsigned arithmetic).
///
/// ```
/// use bucketeer::codec::encode_int64;
///
/// assert!(encode_int64(-1) < encode_int64(0));
/// assert_eq!(encode_int64(i64::MIN), [0; 8]);
/// assert_eq!(encode_int64(i64::MAX), [0xff; 8]);
/// ```
pub fn encode_int64(value: i64) -> [u8; INT_WIDTH] {
    encode_uint64(value as u64 ^ SIGN_BIT)
}

/// Decode bytes produced by [`encode_int64`].
pub fn decode_int64(bytes: &[u8]) -> Result<i64, CodecError> {
    Ok((decode_uint64(bytes)? ^ SIGN_BIT) as i64)
}

/// Decode UTF-8 bytes into a `String`.
pub fn decode_string(bytes: &[u8]) -> Result<String, CodecError> {
    Ok(std::str::from_utf8(bytes)?.to_owned())
}

/// Render a value through its `Display` impl.
pub fn encode_text<T: fmt::Display + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut out = String::new();
    write!(out, "{value}").map_err(|e| CodecError::Text(e.to_string()))?;
    Ok(out.into_bytes())
}

/// Parse a value from UTF-8 text through its `FromStr` impl.
pub fn decode_text<T>(bytes: &[u8]) -> Result<T, CodecError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let text = std::str::from_utf8(bytes)?;
    text.parse()
        .map_err(|e: T::Err| CodecError::Text(e.to_string()))
}

/// Serialize a value with bincode.
///
/// The output follows the value's serialization order. Key types must
/// serialize deterministically; use `BTreeMap` rather than `HashMap`.
pub fn encode_binary<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(value).map_err(|e| CodecError::Binary(e.to_string()))
}

/// Deserialize a bincode value.
pub fn decode_binary<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    bincode::deserialize(bytes).map_err(|e| CodecError::Binary(e.to_string()))
}

/// Serialize a value as JSON with object keys in sorted order.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    // Going through `Value` routes every object through `serde_json::Map`,
    // which is ordered by key.
    let value = serde_json::to_value(value).map_err(|e| CodecError::Json(e.to_string()))?;
    serde_json::to_vec(&value).map_err(|e| CodecError::Json(e.to_string()))
}

/// Deserialize a JSON value.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::{Deserialize, Serializer};
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Account {
        id: u32,
        name: String,
    }

    struct Unprintable;

    impl fmt::Display for Unprintable {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refuses to serialize"))
        }
    }

    // -----------------------------------------------------------------------
    // Integers
    // -----------------------------------------------------------------------

    #[test]
    fn uint64_is_big_endian() {
        assert_eq!(encode_uint64(0), [0; 8]);
        assert_eq!(encode_uint64(1), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(encode_uint64(256), [0, 0, 0, 0, 0, 0, 1, 0]);
        assert_eq!(encode_uint64(u64::MAX), [0xff; 8]);
    }

    #[test]
    fn int64_extremes() {
        assert_eq!(encode_int64(i64::MIN), [0; 8]);
        assert_eq!(encode_int64(-1), [0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(encode_int64(0), [0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode_int64(i64::MAX), [0xff; 8]);
        assert!(encode_int64(i64::MIN) < encode_int64(i64::MIN + 1));
        assert!(encode_int64(i64::MAX - 1) < encode_int64(i64::MAX));
    }

    #[test]
    fn integer_decoding() {
        assert_eq!(decode_uint64(&encode_uint64(42)).unwrap(), 42);
        assert_eq!(decode_int64(&encode_int64(-42)).unwrap(), -42);
        assert_eq!(decode_int64(&encode_int64(i64::MIN)).unwrap(), i64::MIN);
        assert!(matches!(
            decode_uint64(&[1, 2, 3]),
            Err(CodecError::InvalidLength {
                expected: 8,
                actual: 3
            })
        ));
    }

    proptest! {
        #[test]
        fn uint64_order_matches_numeric(a: u64, b: u64) {
            prop_assert_eq!(a.cmp(&b), encode_uint64(a).cmp(&encode_uint64(b)));
        }

        #[test]
        fn int64_order_matches_numeric(a: i64, b: i64) {
            prop_assert_eq!(a.cmp(&b), encode_int64(a).cmp(&encode_int64(b)));
        }

        #[test]
        fn int64_is_injective(a: i64, b: i64) {
            prop_assume!(a != b);
            prop_assert_ne!(encode_int64(a), encode_int64(b));
        }

        #[test]
        fn int64_order_across_sign(neg in i64::MIN..0i64, non_neg in 0i64..=i64::MAX) {
            prop_assert!(encode_int64(neg) < encode_int64(non_neg));
        }
    }

    // -----------------------------------------------------------------------
    // Marshaled values
    // -----------------------------------------------------------------------

    #[test]
    fn text_codec() {
        assert_eq!(encode_text(&1234_u32).unwrap(), b"1234");
        assert_eq!(encode_text("plain").unwrap(), b"plain");
        assert_eq!(decode_text::<u32>(b"1234").unwrap(), 1234);
        assert!(matches!(decode_text::<u32>(b"nope"), Err(CodecError::Text(_))));
        assert!(matches!(decode_text::<u32>(&[0xff]), Err(CodecError::Utf8(_))));
    }

    #[test]
    fn text_marshal_failure_is_reported() {
        assert!(matches!(encode_text(&Unprintable), Err(CodecError::Text(_))));
    }

    #[test]
    fn binary_codec() {
        let account = Account {
            id: 7,
            name: "ada".into(),
        };
        let bytes = encode_binary(&account).unwrap();
        assert_eq!(bytes, encode_binary(&account).unwrap());
        assert_eq!(decode_binary::<Account>(&bytes).unwrap(), account);
        assert!(matches!(
            encode_binary(&Unserializable),
            Err(CodecError::Binary(_))
        ));
        assert!(decode_binary::<Account>(&[1]).is_err());
    }

    #[test]
    fn json_codec() {
        let account = Account {
            id: 7,
            name: "ada".into(),
        };
        let bytes = encode_json(&account).unwrap();
        assert_eq!(bytes, br#"{"id":7,"name":"ada"}"#);
        assert_eq!(decode_json::<Account>(&bytes).unwrap(), account);
        assert!(matches!(encode_json(&Unserializable), Err(CodecError::Json(_))));

        // JSON object keys must be strings.
        let mut bad = HashMap::new();
        bad.insert((1_u8, 2_u8), 3_u8);
        assert!(matches!(encode_json(&bad), Err(CodecError::Json(_))));
    }

    #[test]
    fn json_maps_encode_in_key_order() {
        let entries: Vec<(String, u32)> = (0..8).map(|i| (format!("k{i}"), i)).collect();
        let expected = encode_json(&entries.iter().cloned().collect::<BTreeMap<_, _>>()).unwrap();
        assert_eq!(
            expected,
            br#"{"k0":0,"k1":1,"k2":2,"k3":3,"k4":4,"k5":5,"k6":6,"k7":7}"#
        );

        // Each HashMap gets its own random hasher seed.
        for _ in 0..50 {
            let map: HashMap<String, u32> = entries.iter().cloned().collect();
            assert_eq!(encode_json(&map).unwrap(), expected);
        }

        // Nested objects are sorted too.
        let mut inner = HashMap::new();
        inner.insert("z", 1);
        inner.insert("a", 2);
        let mut outer = HashMap::new();
        outer.insert("y", inner.clone());
        outer.insert("b", inner);
        assert_eq!(
            encode_json(&outer).unwrap(),
            br#"{"b":{"a":2,"z":1},"y":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn string_decoding() {
        assert_eq!(decode_string(b"hello").unwrap(), "hello");
        assert!(matches!(decode_string(&[0xc3, 0x28]), Err(CodecError::Utf8(_))));
    }
}

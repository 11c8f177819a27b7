//! Canonical serialization and hashing for Agrochain.
//!
//! The block hash is the chain's only integrity anchor, so two
//! structurally-identical blocks must serialize to identical bytes. We get
//! that by round-tripping through `serde_json::Value`: `serde_json::Map` is
//! BTreeMap-backed, so object keys come out in lexicographic order no matter
//! how the struct declares its fields.

use crate::error::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Serialize any value to canonical JSON bytes (lexicographic object keys,
/// full-precision floats).
pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&value)?)
}

/// SHA-256 over arbitrary bytes, rendered as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 of a value's canonical JSON serialization, as lowercase hex.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<String> {
    Ok(sha256_hex(&canonical_json(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Forward {
        apple: u32,
        zebra: u32,
    }

    #[derive(Serialize)]
    struct Backward {
        zebra: u32,
        apple: u32,
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let bytes = canonical_json(&Backward { zebra: 2, apple: 1 }).unwrap();
        assert_eq!(bytes, br#"{"apple":1,"zebra":2}"#);
    }

    #[test]
    fn test_field_declaration_order_does_not_affect_hash() {
        let a = canonical_hash(&Forward { apple: 1, zebra: 2 }).unwrap();
        let b = canonical_hash(&Backward { zebra: 2, apple: 1 }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        // sha256("") — well-known digest
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_is_deterministic() {
        let v = Forward { apple: 7, zebra: 9 };
        assert_eq!(canonical_hash(&v).unwrap(), canonical_hash(&v).unwrap());
    }

    #[test]
    fn test_floats_keep_full_precision() {
        #[derive(Serialize)]
        struct Stamp {
            timestamp: f64,
        }
        let bytes = canonical_json(&Stamp {
            timestamp: 1727000000.123456,
        })
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("1727000000.123456"));
    }
}

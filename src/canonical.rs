//! Canonical serialization for deterministic fingerprints.
//!
//! Hypergraph fingerprints and report hashes are computed over canonical JSON.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: Struct fields serialize in declaration order
//! - Stable collection order: only BTreeMap/BTreeSet/Vec are hashed, never HashMap
//! - Stable float format: f64 values serialize through serde_json's shortest form

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// Panics only if `T`'s `Serialize` impl fails, which cannot happen for the
/// map-keyed-by-string and plain-struct types hashed in this crate.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as a 16-digit hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_determinism() {
        let mut counts: BTreeMap<i64, u32> = BTreeMap::new();
        counts.insert(3, 2);
        counts.insert(1, 5);

        assert_eq!(canonical_hash(&counts), canonical_hash(&counts.clone()));
        assert_eq!(canonical_hash_hex(&counts).len(), 16);
    }

    #[test]
    fn test_content_sensitivity() {
        let a = vec![1.0_f64, 2.0];
        let b = vec![1.0_f64, 2.5];
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }
}

//! # Content Digests
//!
//! SHA-256 fingerprints of serialized verdicts. A report digest lets an
//! auditor confirm that a stored verdict is byte-for-byte the one the engine
//! produced for a given request.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::TeaError;

/// A SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Digest raw bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    /// Digest the compact JSON serialization of `value`.
    ///
    /// Only deterministic for types whose serialization order is fixed
    /// (ordered maps, structs).
    pub fn of_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, TeaError> {
        let bytes = serde_json::to_vec(value)?;
        Ok(Self::of_bytes(&bytes))
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        // sha256("abc")
        assert_eq!(
            ContentDigest::of_bytes(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn json_digest_is_deterministic() {
        let v = serde_json::json!({"a": 1, "b": [true, null]});
        assert_eq!(
            ContentDigest::of_json(&v).unwrap(),
            ContentDigest::of_json(&v).unwrap()
        );
    }

    #[test]
    fn display_is_tagged() {
        let d = ContentDigest::of_bytes(b"");
        assert!(d.to_string().starts_with("sha256:"));
        assert_eq!(d.to_hex().len(), 64);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Durable key for a finalized file.
///
/// A `BlobKey` is assigned by the storage service exactly once, when a file
/// is finalized, and is 1:1 with that file from then on. The key is opaque:
/// nothing about its bytes may be interpreted by callers. Keys are obtained
/// through lookup, never constructed from file content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlobKey([u8; 32]);

impl BlobKey {
    /// Wrap raw key bytes handed out by a storage service.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw 32-byte key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobKey({})", self.short_hex())
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for BlobKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<BlobKey> for [u8; 32] {
    fn from(key: BlobKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let key = BlobKey::from_bytes([0xab; 32]);
        let hex = key.to_hex();
        let parsed = BlobKey::from_hex(&hex).unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn from_hex_rejects_bad_digits() {
        let err = BlobKey::from_hex("zz").unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let err = BlobKey::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn short_hex_is_8_chars() {
        let key = BlobKey::from_bytes([7; 32]);
        assert_eq!(key.short_hex().len(), 8);
    }

    #[test]
    fn display_is_full_hex() {
        let key = BlobKey::from_bytes([1; 32]);
        let display = format!("{key}");
        assert_eq!(display.len(), 64);
        assert_eq!(display, key.to_hex());
    }

    #[test]
    fn serde_roundtrip() {
        let key = BlobKey::from_bytes([0x42; 32]);
        let json = serde_json::to_string(&key).unwrap();
        let parsed: BlobKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, parsed);
    }
}

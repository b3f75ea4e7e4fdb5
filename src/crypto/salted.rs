//! OpenSSL-style "salted" ciphertext container.
//!
//! Layout of a blob, before base64 encoding:
//!
//! ```text
//! ["Salted__": 8 bytes][salt: 8 bytes][AES-256-CBC ciphertext]
//! ```
//!
//! - **Marker** (`Salted__`): tells the decryptor a salt follows.
//! - **Salt**: per-message random bytes fed into key stretching.
//! - **Ciphertext**: PKCS#7-padded, so always a non-empty multiple of 16.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::crypto::kdf::SALT_LEN;
use crate::errors::{CredSealError, Result};

/// Marker at the start of every salted blob.
pub const SALTED_MARKER: &[u8; 8] = b"Salted__";

/// Marker plus salt.
pub const HEADER_LEN: usize = SALTED_MARKER.len() + SALT_LEN;

/// A parsed salted blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltedBlob {
    pub salt: [u8; SALT_LEN],
    pub ciphertext: Vec<u8>,
}

impl SaltedBlob {
    pub fn new(salt: [u8; SALT_LEN], ciphertext: Vec<u8>) -> Self {
        Self { salt, ciphertext }
    }

    /// Serialize as `marker || salt || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        out.extend_from_slice(SALTED_MARKER);
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse raw bytes. Fails if the marker is missing or the blob is
    /// shorter than the header.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN || &data[..SALTED_MARKER.len()] != SALTED_MARKER {
            return Err(CredSealError::DecryptionFailed);
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[SALTED_MARKER.len()..HEADER_LEN]);

        Ok(Self {
            salt,
            ciphertext: data[HEADER_LEN..].to_vec(),
        })
    }

    /// Standard (padded) base64 of `to_bytes()`.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let raw = BASE64
            .decode(encoded.trim())
            .map_err(|_| CredSealError::DecryptionFailed)?;
        Self::from_bytes(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_marker_salt_ciphertext() {
        let blob = SaltedBlob::new([1, 2, 3, 4, 5, 6, 7, 8], vec![0xEE; 16]);
        let bytes = blob.to_bytes();

        assert_eq!(&bytes[..8], b"Salted__");
        assert_eq!(&bytes[8..16], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&bytes[16..], &[0xEE; 16]);
    }

    #[test]
    fn base64_starts_with_salted_prefix() {
        // "Salted__" always encodes to "U2FsdGVkX1" in base64.
        let blob = SaltedBlob::new([0u8; 8], vec![0u8; 16]);
        assert!(blob.to_base64().starts_with("U2FsdGVkX1"));
    }

    #[test]
    fn parse_rejects_missing_marker() {
        let mut bytes = SaltedBlob::new([0u8; 8], vec![0u8; 16]).to_bytes();
        bytes[0] = b's';
        assert!(SaltedBlob::from_bytes(&bytes).is_err());
    }

    #[test]
    fn parse_rejects_short_input() {
        assert!(SaltedBlob::from_bytes(b"Salted__1234").is_err());
        assert!(SaltedBlob::from_bytes(b"").is_err());
    }

    #[test]
    fn parse_rejects_invalid_base64() {
        assert!(SaltedBlob::from_base64("not base64!!").is_err());
    }

    #[test]
    fn parse_recovers_salt_and_ciphertext() {
        let blob = SaltedBlob::new([9u8; 8], vec![1, 2, 3]);
        let parsed = SaltedBlob::from_base64(&blob.to_base64()).unwrap();
        assert_eq!(parsed, blob);
    }
}

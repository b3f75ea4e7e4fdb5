//! The 32-byte session key agreed during a handshake.
//!
//! On the wire and in the protocol the key travels as 64 lowercase hex
//! characters; the key-derivation step consumes its raw bytes.

use std::fmt;

use zeroize::Zeroize;

use crate::errors::{CredSealError, Result};

/// Length of the session key in bytes (256 bits).
pub const SESSION_KEY_LEN: usize = 32;

/// Length of the hex rendering of the session key.
pub const SESSION_KEY_HEX_LEN: usize = SESSION_KEY_LEN * 2;

/// A session key that zeroes its memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct SessionKey {
    hex: String,
    bytes: [u8; SESSION_KEY_LEN],
}

impl SessionKey {
    /// Parse a session key from its hex form.
    ///
    /// Anything other than exactly 64 hex characters is a derivation error.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() != SESSION_KEY_HEX_LEN {
            return Err(CredSealError::Derivation(format!(
                "session key must be {SESSION_KEY_HEX_LEN} hex characters (got {})",
                hex_str.len()
            )));
        }

        let mut bytes = [0u8; SESSION_KEY_LEN];
        hex::decode_to_slice(hex_str, &mut bytes)
            .map_err(|e| CredSealError::Derivation(format!("session key is not valid hex: {e}")))?;

        Ok(Self {
            hex: hex_str.to_ascii_lowercase(),
            bytes,
        })
    }

    /// Build a session key directly from raw bytes.
    pub fn from_bytes(bytes: [u8; SESSION_KEY_LEN]) -> Self {
        Self {
            hex: hex::encode(bytes),
            bytes,
        }
    }

    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

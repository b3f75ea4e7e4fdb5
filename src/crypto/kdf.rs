//! Legacy key stretching: turn a session key and a per-message salt into
//! an AES-256 key and a CBC initialization vector.
//!
//! The scheme chains MD5 digests: each block is `MD5(previous || salt)`,
//! starting from the session key bytes, until 48 bytes are collected.
//! The first 32 bytes become the cipher key and the next 16 the IV.
//! The peer derives the same material from the salt carried in the
//! `Salted__` header, so this must stay byte-for-byte stable.

use md5::{Digest, Md5};
use rand::RngCore;
use zeroize::Zeroize;

/// Length of the per-message salt in bytes.
pub const SALT_LEN: usize = 8;

/// Length of the derived cipher key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Length of the CBC initialization vector in bytes.
pub const IV_LEN: usize = 16;

const MATERIAL_LEN: usize = KEY_LEN + IV_LEN;

/// Cipher key and IV derived for one message. Zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct DerivedKeyMaterial {
    pub key: [u8; KEY_LEN],
    pub iv: [u8; IV_LEN],
}

/// Stretch `session_key` with `salt` into a key and IV.
///
/// Deterministic: the same inputs always produce the same output.
pub fn derive_key_and_iv(session_key: &[u8], salt: &[u8]) -> DerivedKeyMaterial {
    let mut acc: Vec<u8> = Vec::with_capacity(MATERIAL_LEN + Md5::output_size());
    let mut prev: Vec<u8> = session_key.to_vec();

    while acc.len() < MATERIAL_LEN {
        let mut hasher = Md5::new();
        hasher.update(&prev);
        hasher.update(salt);
        let block = hasher.finalize();

        acc.extend_from_slice(&block);
        prev.zeroize();
        prev = block.to_vec();
    }

    let mut material = DerivedKeyMaterial {
        key: [0u8; KEY_LEN],
        iv: [0u8; IV_LEN],
    };
    material.key.copy_from_slice(&acc[..KEY_LEN]);
    material.iv.copy_from_slice(&acc[KEY_LEN..MATERIAL_LEN]);

    acc.zeroize();
    prev.zeroize();
    material
}

/// Generate a cryptographically random 8-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

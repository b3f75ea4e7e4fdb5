//! AES-256-CBC with PKCS#7 padding, wrapped in the salted blob format.
//!
//! Each call to `encrypt` generates a fresh random 8-byte salt, stretches
//! the session key with it, and emits `base64("Salted__" || salt || ct)`.
//! `decrypt` reads the salt back out of the header and reverses the steps.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::crypto::kdf::{derive_key_and_iv, generate_salt, SALT_LEN};
use crate::crypto::salted::SaltedBlob;
use crate::crypto::session_key::SessionKey;
use crate::errors::{CredSealError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Encrypt `plaintext` under `session_key` with a fresh random salt.
///
/// Returns the base64 encoding of the salted blob.
pub fn encrypt(session_key: &SessionKey, plaintext: &[u8]) -> Result<String> {
    let blob = encrypt_with_salt(session_key, generate_salt(), plaintext)?;
    Ok(blob.to_base64())
}

/// Encrypt with a caller-chosen salt.
///
/// Salts must never be reused with the same session key; prefer `encrypt`.
pub fn encrypt_with_salt(
    session_key: &SessionKey,
    salt: [u8; SALT_LEN],
    plaintext: &[u8],
) -> Result<SaltedBlob> {
    let material = derive_key_and_iv(session_key.as_bytes(), &salt);

    let cipher = Aes256CbcEnc::new_from_slices(&material.key, &material.iv)
        .map_err(|e| CredSealError::EncryptionFailed(format!("invalid key length: {e}")))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    Ok(SaltedBlob::new(salt, ciphertext))
}

/// Decrypt a base64 salted blob produced by `encrypt`.
///
/// Every failure (bad base64, missing marker, bad padding, non-UTF-8
/// plaintext) collapses into `DecryptionFailed`.
pub fn decrypt(session_key: &SessionKey, encoded: &str) -> Result<String> {
    let blob = SaltedBlob::from_base64(encoded)?;
    let plaintext = decrypt_blob(session_key, &blob)?;
    String::from_utf8(plaintext).map_err(|_| CredSealError::DecryptionFailed)
}

/// Decrypt a parsed blob into raw bytes.
pub fn decrypt_blob(session_key: &SessionKey, blob: &SaltedBlob) -> Result<Vec<u8>> {
    if blob.ciphertext.is_empty() || blob.ciphertext.len() % 16 != 0 {
        return Err(CredSealError::DecryptionFailed);
    }

    let material = derive_key_and_iv(session_key.as_bytes(), &blob.salt);

    let cipher = Aes256CbcDec::new_from_slices(&material.key, &material.iv)
        .map_err(|_| CredSealError::DecryptionFailed)?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&blob.ciphertext)
        .map_err(|_| CredSealError::DecryptionFailed)
}

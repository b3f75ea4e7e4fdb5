//! Integration tests for the CredSeal crypto module.

mod common;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use credseal::crypto::kdf::{derive_key_and_iv, SALT_LEN};
use credseal::crypto::{
    decrypt, encrypt, encrypt_with_salt, mod_pow, KeyExchange, SaltedBlob, SessionKey,
};
use credseal::errors::CredSealError;
use md5::{Digest, Md5};
use num_bigint::BigUint;
use rand::RngCore;

fn session_key() -> SessionKey {
    SessionKey::from_bytes([0x42u8; 32])
}

// ---------------------------------------------------------------------------
// Salted blob wire format
// ---------------------------------------------------------------------------

#[test]
fn known_vector_matches_openssl() {
    // Produced with `openssl enc -aes-256-cbc -K <key> -iv <iv>` using the
    // key/iv stretched from 0x42 * 32 and salt 01..08.
    let blob = encrypt_with_salt(&session_key(), [1, 2, 3, 4, 5, 6, 7, 8], b"hunter2").unwrap();
    assert_eq!(
        blob.to_base64(),
        "U2FsdGVkX18BAgMEBQYHCBpyC4gWU9kvT6xxjZw0x2k="
    );
}

#[test]
fn encrypt_output_has_marker_and_salt() {
    let encoded = encrypt(&session_key(), b"alice@example.com").unwrap();
    let raw = BASE64.decode(&encoded).unwrap();

    assert_eq!(&raw[..8], b"Salted__");
    assert_eq!(raw.len(), 8 + SALT_LEN + 32);
}

#[test]
fn independent_rederivation_recovers_plaintext() {
    let plaintext = "пароль with unicode ✓";
    let encoded = encrypt(&session_key(), plaintext.as_bytes()).unwrap();
    let raw = BASE64.decode(&encoded).unwrap();
    let (salt, ciphertext) = (&raw[8..16], &raw[16..]);

    // Stretch by hand: MD5(prev || salt) until 48 bytes.
    let mut material = Vec::new();
    let mut prev = session_key().as_bytes().to_vec();
    while material.len() < 48 {
        let mut h = Md5::new();
        h.update(&prev);
        h.update(salt);
        prev = h.finalize().to_vec();
        material.extend_from_slice(&prev);
    }

    let dec = cbc::Decryptor::<aes::Aes256>::new_from_slices(&material[..32], &material[32..48])
        .unwrap();
    let recovered = dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext).unwrap();
    assert_eq!(String::from_utf8(recovered).unwrap(), plaintext);
}

#[test]
fn encrypt_decrypt_roundtrip() {
    for text in ["", "a", "exactly sixteen!", "a considerably longer credential value"] {
        let encoded = encrypt(&session_key(), text.as_bytes()).unwrap();
        assert_eq!(decrypt(&session_key(), &encoded).unwrap(), text);
    }
}

#[test]
fn encrypt_uses_a_fresh_salt_each_time() {
    let a = encrypt(&session_key(), b"same").unwrap();
    let b = encrypt(&session_key(), b"same").unwrap();
    assert_ne!(a, b, "two encryptions of the same plaintext must differ");
}

#[test]
fn decrypt_with_wrong_key_fails_or_differs() {
    let encoded = encrypt(&session_key(), b"TOP_SECRET=42").unwrap();
    let wrong = SessionKey::from_bytes([0x24u8; 32]);

    // CBC has no authentication: a wrong key usually breaks the padding,
    // and otherwise yields garbage.
    match decrypt(&wrong, &encoded) {
        Err(e) => assert!(matches!(e, CredSealError::DecryptionFailed)),
        Ok(text) => assert_ne!(text, "TOP_SECRET=42"),
    }
}

#[test]
fn decrypt_rejects_blob_without_marker() {
    let mut raw = SaltedBlob::new([0u8; 8], vec![0u8; 16]).to_bytes();
    raw[..8].copy_from_slice(b"Unsalted");
    assert!(decrypt(&session_key(), &BASE64.encode(raw)).is_err());
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derivation_is_deterministic_for_random_inputs() {
    let mut rng = rand::rng();
    for _ in 0..16 {
        let mut key = [0u8; 32];
        let mut salt = [0u8; SALT_LEN];
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut salt);

        let a = derive_key_and_iv(&key, &salt);
        let b = derive_key_and_iv(&key, &salt);
        assert_eq!(a.key, b.key);
        assert_eq!(a.iv, b.iv);
    }
}

#[test]
fn session_key_length_is_enforced() {
    assert!(SessionKey::from_hex(&"f".repeat(64)).is_ok());
    for bad in ["".to_string(), "f".repeat(32), "f".repeat(63), "f".repeat(66)] {
        assert!(matches!(
            SessionKey::from_hex(&bad),
            Err(CredSealError::Derivation(_))
        ));
    }
}

// ---------------------------------------------------------------------------
// Diffie–Hellman
// ---------------------------------------------------------------------------

#[test]
fn mod_pow_matches_reference_on_random_operands() {
    let params = common::modp_params();
    let mut rng = rand::rng();

    for _ in 0..8 {
        let mut b = [0u8; 200];
        let mut e = [0u8; 40];
        rng.fill_bytes(&mut b);
        rng.fill_bytes(&mut e);
        let (base, exp) = (BigUint::from_bytes_be(&b), BigUint::from_bytes_be(&e));

        assert_eq!(
            mod_pow(&base, &exp, &params.modulus),
            base.modpow(&exp, &params.modulus)
        );
    }
}

#[test]
fn independent_sessions_agree_on_shared_secret() {
    let params = common::modp_params();
    let mut rng = rand::rng();

    for _ in 0..4 {
        let mut xa = [0u8; 32];
        let mut xb = [0u8; 32];
        rng.fill_bytes(&mut xa);
        rng.fill_bytes(&mut xb);

        let a = KeyExchange::with_private_exponent(params.clone(), BigUint::from_bytes_be(&xa));
        let b = KeyExchange::with_private_exponent(params.clone(), BigUint::from_bytes_be(&xb));

        let sa = a.compute_shared(b.public_value());
        let sb = b.compute_shared(a.public_value());
        assert_eq!(sa, sb);
        assert_eq!(sa.to_session_key().unwrap(), sb.to_session_key().unwrap());
    }
}

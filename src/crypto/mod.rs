//! Cryptographic primitives for CredSeal.
//!
//! This module provides:
//! - Square-and-multiply modular exponentiation (`modpow`)
//! - Diffie–Hellman key pairs and shared secrets (`exchange`)
//! - The 32-byte session key (`session_key`)
//! - MD5-chained key/IV stretching (`kdf`)
//! - The `Salted__` blob container (`salted`)
//! - AES-256-CBC encryption and decryption (`encryption`)

pub mod encryption;
pub mod exchange;
pub mod kdf;
pub mod modpow;
pub mod salted;
pub mod session_key;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, SessionKey, ...};
pub use encryption::{decrypt, encrypt, encrypt_with_salt};
pub use exchange::{DomainParameters, ExponentPolicy, KeyExchange, SharedSecret};
pub use kdf::{derive_key_and_iv, generate_salt, DerivedKeyMaterial};
pub use modpow::mod_pow;
pub use salted::{SaltedBlob, SALTED_MARKER};
pub use session_key::SessionKey;

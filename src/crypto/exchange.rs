//! Diffie–Hellman key agreement over a server-supplied prime group.
//!
//! A `KeyExchange` holds one key pair for one handshake. It is built from
//! the `DomainParameters` the server publishes, and turns the server's
//! public value into a `SharedSecret`.

use std::fmt;

use num_bigint::BigUint;
use num_traits::{CheckedSub, Num};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::crypto::modpow::mod_pow;
use crate::crypto::session_key::SessionKey;
use crate::errors::{CredSealError, Result};

/// Private exponent used by the legacy protocol for every handshake.
///
/// A constant exponent gives no forward secrecy; see `ExponentPolicy`.
pub const LEGACY_PRIVATE_EXPONENT_HEX: &str = "9876543210FEDCBA9876543210FEDCBA98765432";

/// Prime modulus and generator of the DH group, as published by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParameters {
    pub modulus: BigUint,
    pub generator: BigUint,
}

impl DomainParameters {
    /// Build parameters from the wire representation: the prime as hex
    /// (an optional `0x` prefix is tolerated) and the generator as decimal.
    pub fn from_wire(prime_hex: &str, generator_dec: &str) -> Result<Self> {
        let prime_hex = prime_hex.trim();
        let prime_hex = prime_hex
            .strip_prefix("0x")
            .or_else(|| prime_hex.strip_prefix("0X"))
            .unwrap_or(prime_hex);

        let modulus = BigUint::from_str_radix(prime_hex, 16).map_err(|e| {
            CredSealError::InvalidResponse(format!("prime is not valid hex: {e}"))
        })?;
        let generator = parse_decimal(generator_dec, "generator")?;

        if modulus <= BigUint::from(1u8) {
            return Err(CredSealError::InvalidResponse(
                "prime modulus must be greater than one".into(),
            ));
        }

        Ok(Self { modulus, generator })
    }
}

/// How the local private exponent is chosen for each handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExponentPolicy {
    /// The legacy hard-coded exponent. Interoperable, predictable.
    #[default]
    Fixed,
    /// A fresh random exponent in `[2, p-2]` per handshake.
    Ephemeral,
}

/// One side of a Diffie–Hellman exchange.
#[derive(Clone)]
pub struct KeyExchange {
    params: DomainParameters,
    private_exponent: BigUint,
    public_value: BigUint,
}

impl KeyExchange {
    /// Generate a key pair according to `policy`.
    pub fn new(params: DomainParameters, policy: ExponentPolicy) -> Result<Self> {
        let exponent = match policy {
            ExponentPolicy::Fixed => legacy_private_exponent(),
            ExponentPolicy::Ephemeral => random_exponent(&params.modulus)?,
        };
        Ok(Self::with_private_exponent(params, exponent))
    }

    /// Build a key pair from an explicit private exponent.
    pub fn with_private_exponent(params: DomainParameters, private_exponent: BigUint) -> Self {
        let public_value = mod_pow(&params.generator, &private_exponent, &params.modulus);
        Self {
            params,
            private_exponent,
            public_value,
        }
    }

    /// Our public value, `g^x mod p`.
    pub fn public_value(&self) -> &BigUint {
        &self.public_value
    }

    /// Combine the peer's public value with our private exponent.
    pub fn compute_shared(&self, peer_public: &BigUint) -> SharedSecret {
        SharedSecret(mod_pow(
            peer_public,
            &self.private_exponent,
            &self.params.modulus,
        ))
    }
}

impl fmt::Debug for KeyExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyExchange")
            .field("params", &self.params)
            .field("private_exponent", &"<redacted>")
            .field("public_value", &self.public_value)
            .finish()
    }
}

/// The agreed group element `peer^x mod p`.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(BigUint);

impl SharedSecret {
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Hash the decimal rendering of the secret with SHA-256 into a
    /// session key.
    pub fn to_session_key(&self) -> Result<SessionKey> {
        let digest = Sha256::digest(self.0.to_str_radix(10).as_bytes());
        SessionKey::from_hex(&hex::encode(digest))
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Parse a base-10 big integer field from a server response.
pub fn parse_decimal(value: &str, field: &str) -> Result<BigUint> {
    BigUint::from_str_radix(value.trim(), 10).map_err(|e| {
        CredSealError::InvalidResponse(format!("{field} is not a decimal integer: {e}"))
    })
}

fn legacy_private_exponent() -> BigUint {
    // The constant is a compile-time literal, so parsing cannot fail.
    BigUint::from_str_radix(LEGACY_PRIVATE_EXPONENT_HEX, 16).unwrap_or_default()
}

/// Draw a uniformly-ish random exponent in `[2, p-2]`.
fn random_exponent(modulus: &BigUint) -> Result<BigUint> {
    let two = BigUint::from(2u8);
    // p-3 values in [2, p-2]; need at least one.
    let span = modulus
        .checked_sub(&BigUint::from(3u8))
        .filter(|s| *s > BigUint::default())
        .ok_or_else(|| {
            CredSealError::Derivation("modulus too small for an ephemeral exponent".into())
        })?;

    // Oversample by 8 bytes so the modulo bias is negligible.
    let mut bytes = vec![0u8; (modulus.bits() as usize).div_ceil(8) + 8];
    rand::rng().fill_bytes(&mut bytes);
    let raw = BigUint::from_bytes_be(&bytes);

    Ok(raw % span + two)
}

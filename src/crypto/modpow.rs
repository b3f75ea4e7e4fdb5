//! Square-and-multiply modular exponentiation over arbitrary-precision
//! unsigned integers.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Compute `base^exponent mod modulus`.
///
/// Walks the exponent from its least significant bit upwards: a set bit
/// folds the running base into the accumulator, and the base is squared
/// on every step. The base is reduced modulo `modulus` before the loop.
///
/// `modulus` must be non-zero. A modulus of one always yields zero.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    debug_assert!(!modulus.is_zero(), "modulus must be positive");

    if modulus.is_one() {
        return BigUint::zero();
    }

    let mut result = BigUint::one();
    let mut base = base % modulus;
    let mut exponent = exponent.clone();

    while !exponent.is_zero() {
        if exponent.bit(0) {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exponent >>= 1u32;
    }

    result
}

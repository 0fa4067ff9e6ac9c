//! Modular arithmetic and scalar parsing over a configurable prime modulus

use anyhow::{anyhow, bail, Result};
use num_bigint::BigUint;
use num_traits::{Num, Zero};

/// secp256k1 group order n in hexadecimal, the default modulus.
pub const SECP256K1_ORDER_HEX: &str =
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141";

pub fn secp256k1_order() -> BigUint {
    BigUint::from_str_radix(SECP256K1_ORDER_HEX, 16)
        .expect("SECP256K1_ORDER_HEX should parse as base-16 integer")
}

pub enum ScalarKind {
    RorS,
    Z,
}

/// Parses a strict decimal scalar and validates it against the run modulus.
///
/// Rejects empty strings, non-digit characters, leading zeros, and values
/// outside [0, n). r and s must additionally be nonzero; z may be zero.
pub fn parse_scalar_decimal_strict(s: &str, kind: ScalarKind, n: &BigUint) -> Result<BigUint> {
    if s.is_empty() {
        bail!("Empty decimal string");
    }
    if !s.chars().all(|c| c.is_ascii_digit()) {
        bail!("Invalid decimal string: only digits 0-9 allowed");
    }
    if s.len() > 1 && s.starts_with('0') {
        bail!("Invalid decimal string: no leading zeros allowed");
    }

    let value =
        BigUint::from_str_radix(s, 10).map_err(|e| anyhow!("Failed to parse decimal: {}", e))?;

    if value >= *n {
        bail!("Value >= group order n, ensure your data is already reduced");
    }

    match kind {
        ScalarKind::RorS => {
            if value.is_zero() {
                bail!("r and s values cannot be zero");
            }
        }
        ScalarKind::Z => {}
    }

    Ok(value)
}

/// Normalizes an arbitrary value into [0, n).
pub fn reduce(x: &BigUint, n: &BigUint) -> BigUint {
    x % n
}

/// Multiplicative inverse of `a` modulo `n`.
///
/// Returns `None` when gcd(a, n) != 1, which covers a == 0. For a prime
/// modulus and a nonzero reduced operand the inverse always exists, but
/// inputs are attacker-influenced and must be checked.
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    a.modinv(n)
}

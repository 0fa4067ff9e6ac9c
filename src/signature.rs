//! Signature data types and the immutable run context

use crate::math::{parse_scalar_decimal_strict, ScalarKind};
use anyhow::{bail, Result};
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

/// Raw signature record as it appears in JSON or CSV input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureInput {
    pub r: String,
    pub s: String,
    pub z: String,
}

/// A validated signature triple, reduced into [0, n) with r and s nonzero.
#[derive(Debug, Clone)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
    pub z: BigUint,
}

impl Signature {
    /// Parses and validates a raw record against the run modulus.
    ///
    /// Degenerate signatures (r = 0 or s = 0) are rejected here, at load
    /// time, so the recovery hot path can assume well-formed inputs.
    pub fn parse(input: &SignatureInput, n: &BigUint) -> Result<Self> {
        let r = parse_scalar_decimal_strict(&input.r, ScalarKind::RorS, n)?;
        let s = parse_scalar_decimal_strict(&input.s, ScalarKind::RorS, n)?;
        let z = parse_scalar_decimal_strict(&input.z, ScalarKind::Z, n)?;
        Ok(Signature { r, s, z })
    }
}

/// Immutable per-run state: the group order and the signature dataset.
///
/// Constructed once before the search starts and shared read-only by the
/// fitness evaluator.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub n: BigUint,
    pub signatures: Vec<Signature>,
}

impl SearchContext {
    pub fn new(n: BigUint, inputs: &[SignatureInput]) -> Result<Self> {
        if n <= BigUint::one() {
            bail!("Modulus must be greater than 1");
        }
        if inputs.is_empty() {
            bail!("Signature set must not be empty");
        }

        let signatures = inputs
            .iter()
            .map(|input| Signature::parse(input, &n))
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchContext { n, signatures })
    }
}

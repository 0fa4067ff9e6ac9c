//! Per-signature private-key recovery with memoization

use crate::math::{mod_inverse, reduce};
use num_bigint::BigUint;
use num_traits::One;
use std::collections::HashMap;

/// Why a single recovery attempt produced no candidate.
///
/// Failures are domain values, not errors: the fitness evaluator absorbs
/// them into the objective via a penalty sentinel and the search continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryFailure {
    /// r shares a nontrivial factor with n (includes r = 0 mod n).
    NotInvertible,
    /// The recovered candidate fell outside (1, n).
    OutOfRange,
}

pub type RecoveryResult = Result<BigUint, RecoveryFailure>;

/// Computes `d = ((s*k - z) mod n) * r^-1 mod n`.
///
/// Succeeds only when 1 < d < n. Deterministic and pure.
pub fn recover_candidate(
    r: &BigUint,
    s: &BigUint,
    z: &BigUint,
    k: &BigUint,
    n: &BigUint,
) -> RecoveryResult {
    let r = reduce(r, n);
    let inv_r = mod_inverse(&r, n).ok_or(RecoveryFailure::NotInvertible)?;

    let sk = reduce(&(s * k), n);
    let z = reduce(z, n);
    // (s*k - z) mod n without signed arithmetic
    let diff = if sk >= z { sk - z } else { sk + n - z };
    let d = (diff * inv_r) % n;

    if d > BigUint::one() {
        Ok(d)
    } else {
        Err(RecoveryFailure::OutOfRange)
    }
}

type CacheKey = (BigUint, BigUint, BigUint, BigUint);

/// Unbounded memoization of `recover_candidate` keyed by the exact
/// (r, s, z, k) tuple.
///
/// Entries are pure functions of their key and are never overwritten or
/// evicted; growth is bounded by the number of distinct tuples a run
/// evaluates.
#[derive(Debug, Default)]
pub struct RecoveryCache {
    entries: HashMap<CacheKey, RecoveryResult>,
}

impl RecoveryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recover(
        &mut self,
        r: &BigUint,
        s: &BigUint,
        z: &BigUint,
        k: &BigUint,
        n: &BigUint,
    ) -> RecoveryResult {
        let key = (r.clone(), s.clone(), z.clone(), k.clone());
        self.entries
            .entry(key)
            .or_insert_with(|| recover_candidate(r, s, z, k, n))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Disagreement objective over per-signature recovery candidates

use crate::math::reduce;
use crate::recover::RecoveryCache;
use crate::signature::SearchContext;
use num_bigint::BigUint;
use num_traits::Zero;

/// Fitness of one trial nonce: the aggregate disagreement score (lower is
/// better, 0 means every candidate agrees) and the per-signature candidate
/// list it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub score: BigUint,
    pub candidates: Vec<BigUint>,
}

/// Evaluates a trial nonce against the full signature set.
///
/// The nonce is normalized into [0, n) first. Signatures whose recovery
/// fails contribute the sentinel value n, which is strictly larger than any
/// valid candidate and therefore dominates the disagreement sum; failing
/// nonces are penalized rather than excluded.
///
/// The score is the sum of |candidates[i] - candidates[j]| over all
/// unordered pairs, quadratic in the dataset size. It reaches 0 exactly
/// when every signature recovers the same candidate.
pub fn evaluate(k: &BigUint, ctx: &SearchContext, cache: &mut RecoveryCache) -> Evaluation {
    let k = reduce(k, &ctx.n);

    let candidates: Vec<BigUint> = ctx
        .signatures
        .iter()
        .map(|sig| {
            cache
                .recover(&sig.r, &sig.s, &sig.z, &k, &ctx.n)
                .unwrap_or_else(|_| ctx.n.clone())
        })
        .collect();

    let mut score = BigUint::zero();
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let (a, b) = (&candidates[i], &candidates[j]);
            score += if a >= b { a - b } else { b - a };
        }
    }

    Evaluation { score, candidates }
}

//! Variation operators: uniform crossover and Gaussian mutation

use super::population::Individual;
use num_bigint::{BigInt, BigUint};
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Mutation step width: n / divisor, clamped to at least 1 so that
/// small-modulus runs still move.
pub fn mutation_sigma(n: &BigUint, divisor: u64) -> BigUint {
    let sigma = n / BigUint::from(divisor);
    if sigma.is_zero() {
        BigUint::one()
    } else {
        sigma
    }
}

/// Uniform crossover over a single-scalar genome.
///
/// With one gene per individual, per-position uniform recombination
/// degenerates to swapping the two nonces with probability 0.5. Cached
/// evaluations are invalidated when values move.
pub fn crossover_uniform(a: &mut Individual, b: &mut Individual, rng: &mut impl Rng) {
    if rng.gen_bool(0.5) {
        std::mem::swap(&mut a.k, &mut b.k);
        a.evaluation = None;
        b.evaluation = None;
    }
}

/// Perturbs the nonce with Normal(0, sigma) noise, reduces modulo n, and
/// re-clamps into [1, n-1] (a result of 0 wraps to 1).
pub fn mutate_gaussian(ind: &mut Individual, sigma: &BigUint, n: &BigUint, rng: &mut impl Rng) {
    let sigma_f = sigma
        .to_f64()
        .filter(|f| f.is_finite())
        .unwrap_or(f64::MAX)
        .max(1.0);
    let normal = Normal::new(0.0, sigma_f).expect("standard deviation is positive and finite");
    let noise = BigInt::from_f64(normal.sample(rng).trunc()).unwrap_or_else(BigInt::zero);

    let n_int = BigInt::from(n.clone());
    let mut shifted = (BigInt::from(ind.k.clone()) + noise) % &n_int;
    if shifted.is_negative() {
        shifted += &n_int;
    }
    if shifted.is_zero() {
        shifted = BigInt::one();
    }

    ind.k = shifted
        .to_biguint()
        .expect("perturbed nonce was normalized into [1, n)");
    ind.evaluation = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mutation_sigma_fraction_of_modulus() {
        let n = crate::math::secp256k1_order();
        let sigma = mutation_sigma(&n, 1000);
        assert_eq!(sigma, &n / BigUint::from(1000u32));
    }

    #[test]
    fn test_mutation_sigma_clamped_to_one() {
        let n = BigUint::from(17u32);
        assert_eq!(mutation_sigma(&n, 1000), BigUint::one());
    }

    #[test]
    fn test_crossover_permutes_pair_values() {
        let mut rng = StdRng::seed_from_u64(11);
        let (ka, kb) = (BigUint::from(4u32), BigUint::from(9u32));
        let mut swapped = false;
        for _ in 0..100 {
            let mut a = Individual::new(ka.clone());
            let mut b = Individual::new(kb.clone());
            crossover_uniform(&mut a, &mut b, &mut rng);
            // The pair as a whole keeps both values in some order.
            assert!(
                (a.k == ka && b.k == kb) || (a.k == kb && b.k == ka),
                "crossover must only permute the two parent values"
            );
            if a.k == kb {
                swapped = true;
            }
        }
        assert!(swapped, "swap should occur with probability 0.5");
    }

    #[test]
    fn test_mutation_invalidates_evaluation() {
        let mut rng = StdRng::seed_from_u64(12);
        let n = BigUint::from(17u32);
        let mut ind = Individual {
            k: BigUint::from(5u32),
            evaluation: Some(crate::fitness::Evaluation {
                score: BigUint::zero(),
                candidates: vec![],
            }),
        };
        mutate_gaussian(&mut ind, &BigUint::one(), &n, &mut rng);
        assert!(ind.evaluation.is_none());
    }

    #[test]
    fn test_mutation_always_reclamps_into_range() {
        let mut rng = StdRng::seed_from_u64(13);
        let n = BigUint::from(17u32);
        let sigma = mutation_sigma(&n, 2);
        for i in 0..10_000u32 {
            let start = BigUint::from(1 + (i % 16));
            let mut ind = Individual::new(start);
            mutate_gaussian(&mut ind, &sigma, &n, &mut rng);
            assert!(ind.k >= BigUint::one() && ind.k < n, "escaped range: {}", ind.k);
        }
    }

    #[test]
    fn test_mutation_in_range_large_modulus() {
        let mut rng = StdRng::seed_from_u64(14);
        let n = crate::math::secp256k1_order();
        let sigma = mutation_sigma(&n, 1000);
        let mut ind = Individual::new(BigUint::one());
        for _ in 0..1_000 {
            mutate_gaussian(&mut ind, &sigma, &n, &mut rng);
            assert!(ind.k >= BigUint::one() && ind.k < n);
        }
    }
}

//! Individuals, population initialization, and tournament selection

use crate::fitness::Evaluation;
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;

/// One member of the population: a trial nonce and its cached fitness.
///
/// The evaluation is cleared whenever `k` changes and must be recomputed
/// before the individual takes part in selection.
#[derive(Debug, Clone)]
pub struct Individual {
    pub k: BigUint,
    pub evaluation: Option<Evaluation>,
}

impl Individual {
    pub fn new(k: BigUint) -> Self {
        Individual {
            k,
            evaluation: None,
        }
    }

    pub fn score(&self) -> Option<&BigUint> {
        self.evaluation.as_ref().map(|e| &e.score)
    }
}

/// Builds a population of `size` individuals with nonces drawn uniformly
/// from [1, n-1].
pub fn init_population(size: usize, n: &BigUint, rng: &mut impl Rng) -> Vec<Individual> {
    let span = n - BigUint::one();
    (0..size)
        .map(|_| Individual::new(rng.gen_biguint_below(&span) + BigUint::one()))
        .collect()
}

/// Pick `tournament_size` individuals at random (with replacement) and
/// return the one with the lowest score. Unevaluated individuals lose
/// against any evaluated one.
pub fn tournament_select<'a>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut impl Rng,
) -> &'a Individual {
    assert!(!population.is_empty(), "Population must not be empty");

    let effective_size = tournament_size.min(population.len());
    let mut best_idx = rng.gen_range(0..population.len());

    for _ in 1..effective_size {
        let candidate_idx = rng.gen_range(0..population.len());
        if beats(&population[candidate_idx], &population[best_idx]) {
            best_idx = candidate_idx;
        }
    }

    &population[best_idx]
}

/// The minimal-score individual of the population.
pub fn best_individual(population: &[Individual]) -> &Individual {
    assert!(!population.is_empty(), "Population must not be empty");

    let mut best = &population[0];
    for candidate in &population[1..] {
        if beats(candidate, best) {
            best = candidate;
        }
    }
    best
}

fn beats(candidate: &Individual, incumbent: &Individual) -> bool {
    match (candidate.score(), incumbent.score()) {
        (Some(c), Some(i)) => c < i,
        (Some(_), None) => true,
        _ => false,
    }
}

//! Generational evolution engine
//!
//! Each generation clones the population into an offspring pool, applies
//! pairwise uniform crossover and independent Gaussian mutation, evaluates
//! every offspring against the signature set, and assembles the next
//! population via tournament selection. The loop stops early once the best
//! score reaches the convergence threshold, otherwise it runs to the
//! generation budget.

pub mod operators;
pub mod population;

use crate::fitness::{evaluate, Evaluation};
use crate::recover::RecoveryCache;
use crate::signature::SearchContext;
use anyhow::{bail, Result};
use num_bigint::BigUint;
use population::Individual;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct EvolveConfig {
    pub population_size: usize,
    pub max_generations: u32,
    pub convergence_threshold: BigUint,
    pub crossover_prob: f64,
    pub mutation_prob: f64,
    /// Mutation sigma is modulus / sigma_divisor, clamped to at least 1.
    pub sigma_divisor: u64,
    pub tournament_size: usize,
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for EvolveConfig {
    fn default() -> Self {
        EvolveConfig {
            population_size: 50,
            max_generations: 100,
            convergence_threshold: BigUint::from(100u32),
            crossover_prob: 0.5,
            mutation_prob: 0.2,
            sigma_divisor: 1000,
            tournament_size: 3,
            seed: None,
        }
    }
}

impl EvolveConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            bail!("Population size must be at least 2");
        }
        if self.max_generations == 0 {
            bail!("Max generations must be positive");
        }
        if !(0.0..=1.0).contains(&self.crossover_prob) {
            bail!("Crossover probability must be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            bail!("Mutation probability must be in [0, 1]");
        }
        if self.sigma_divisor == 0 {
            bail!("Sigma divisor must be positive");
        }
        if self.tournament_size < 2 {
            bail!("Tournament size must be at least 2");
        }
        Ok(())
    }
}

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Best score reached the convergence threshold.
    Converged,
    /// Generation budget ran out; inspect the final score to judge success.
    Exhausted,
}

/// Read-only per-generation progress snapshot for external reporting.
#[derive(Debug, Clone)]
pub struct GenerationSnapshot {
    pub generation: u32,
    pub best_k: BigUint,
    pub best_score: BigUint,
}

/// Final result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub termination: Termination,
    pub generations: u32,
    pub best_k: BigUint,
    pub best_score: BigUint,
    pub candidates: Vec<BigUint>,
    /// Present only when every per-signature candidate agrees exactly and
    /// is a valid key (not the failure sentinel).
    pub recovered_key: Option<BigUint>,
}

/// Runs the evolutionary search over the context's signature set.
///
/// `report` receives one snapshot per completed generation.
pub fn run_search(
    ctx: &SearchContext,
    config: &EvolveConfig,
    mut report: impl FnMut(&GenerationSnapshot),
) -> Result<SearchOutcome> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let sigma = operators::mutation_sigma(&ctx.n, config.sigma_divisor);
    let mut cache = RecoveryCache::new();
    let mut pop = population::init_population(config.population_size, &ctx.n, &mut rng);

    let mut best: Option<Individual> = None;
    let mut termination = Termination::Exhausted;
    let mut generations = 0;

    for generation in 0..config.max_generations {
        let mut offspring = pop.clone();

        for pair in offspring.chunks_exact_mut(2) {
            if rng.gen_bool(config.crossover_prob) {
                if let [a, b] = pair {
                    operators::crossover_uniform(a, b, &mut rng);
                }
            }
        }
        for ind in &mut offspring {
            if rng.gen_bool(config.mutation_prob) {
                operators::mutate_gaussian(ind, &sigma, &ctx.n, &mut rng);
            }
        }

        // Fitness is recomputed for every offspring; values untouched by
        // variation hit the recovery cache.
        for ind in &mut offspring {
            ind.evaluation = Some(evaluate(&ind.k, ctx, &mut cache));
        }

        pop = (0..config.population_size)
            .map(|_| population::tournament_select(&offspring, config.tournament_size, &mut rng).clone())
            .collect();

        let generation_best = population::best_individual(&pop).clone();
        let best_eval = evaluate(&generation_best.k, ctx, &mut cache);
        generations = generation + 1;

        report(&GenerationSnapshot {
            generation,
            best_k: generation_best.k.clone(),
            best_score: best_eval.score.clone(),
        });

        let converged = best_eval.score <= config.convergence_threshold;
        best = Some(generation_best);

        if converged {
            termination = Termination::Converged;
            break;
        }
    }

    let best = best.expect("max_generations >= 1 was validated");
    let best_eval = evaluate(&best.k, ctx, &mut cache);
    let recovered_key = agreed_key(&best_eval, &ctx.n);

    Ok(SearchOutcome {
        termination,
        generations,
        best_k: best.k,
        best_score: best_eval.score,
        candidates: best_eval.candidates,
        recovered_key,
    })
}

/// The shared candidate, if all per-signature candidates agree exactly and
/// at least one recovery succeeded (the sentinel never counts as a key).
fn agreed_key(eval: &Evaluation, n: &BigUint) -> Option<BigUint> {
    let first = eval.candidates.first()?;
    if first < n && eval.candidates.iter().all(|c| c == first) {
        Some(first.clone())
    } else {
        None
    }
}

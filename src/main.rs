//! CLI for the evolutionary shared-nonce search

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use kevo::evolve::{run_search, EvolveConfig, SearchOutcome, Termination};
use kevo::math::secp256k1_order;
use kevo::provider::load_signature_inputs;
use kevo::signature::SearchContext;
use num_bigint::BigUint;
use num_traits::Num;
use serde::Serialize;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kevo")]
#[command(about = "Evolutionary search for shared ECDSA nonces")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    Search {
        #[arg(default_value = "-")]
        input: String,

        #[arg(
            long,
            help = "Group order as a decimal integer (defaults to the secp256k1 order)"
        )]
        modulus: Option<String>,

        #[arg(long, default_value = "50", help = "Population size")]
        population: usize,

        #[arg(long, default_value = "100", help = "Maximum number of generations")]
        generations: u32,

        #[arg(
            long,
            default_value = "100",
            help = "Convergence threshold: stop once the best score is <= this value"
        )]
        threshold: String,

        #[arg(long, default_value = "0.5", help = "Per-pair crossover probability")]
        crossover_prob: f64,

        #[arg(
            long,
            default_value = "0.2",
            help = "Per-individual Gaussian mutation probability"
        )]
        mutation_prob: f64,

        #[arg(
            long,
            default_value = "1000",
            help = "Mutation standard deviation is modulus / this divisor"
        )]
        sigma_divisor: u64,

        #[arg(long, default_value = "3", help = "Tournament size for selection")]
        tournament_size: usize,

        #[arg(long, help = "Random seed for reproducible runs")]
        seed: Option<u64>,

        #[arg(long, help = "Suppress per-generation progress on stderr")]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(key_recovered) => {
            if key_recovered {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Search {
            input,
            modulus,
            population,
            generations,
            threshold,
            crossover_prob,
            mutation_prob,
            sigma_divisor,
            tournament_size,
            seed,
            quiet,
        } => {
            let n = match modulus {
                Some(text) => BigUint::from_str_radix(&text, 10)
                    .map_err(|e| anyhow!("Invalid modulus: {}", e))?,
                None => secp256k1_order(),
            };
            let threshold = BigUint::from_str_radix(&threshold, 10)
                .map_err(|e| anyhow!("Invalid threshold: {}", e))?;

            let inputs = load_signature_inputs(&input)?;
            let ctx = SearchContext::new(n, &inputs)?;

            let config = EvolveConfig {
                population_size: population,
                max_generations: generations,
                convergence_threshold: threshold,
                crossover_prob,
                mutation_prob,
                sigma_divisor,
                tournament_size,
                seed,
            };

            let outcome = run_search(&ctx, &config, |snap| {
                if !quiet {
                    eprintln!(
                        "generation {}: best k = {}, score = {}",
                        snap.generation, snap.best_k, snap.best_score
                    );
                }
            })?;

            let output = format_output(&outcome, &ctx, cli.json)?;
            println!("{}", output);

            Ok(outcome.recovered_key.is_some())
        }
    }
}

#[derive(Serialize)]
struct SearchReport {
    status: String,
    generations: u32,
    best_nonce: String,
    best_score: String,
    recovered_key: Option<RecoveredKeyOutput>,
    recovery_status: String,
    summary: SummaryOutput,
}

#[derive(Serialize)]
struct RecoveredKeyOutput {
    private_key_decimal: String,
    private_key_hex: String,
}

#[derive(Serialize)]
struct SummaryOutput {
    total_signatures: usize,
    modulus: String,
}

fn key_to_hex_string(key: &BigUint) -> String {
    hex::encode(key.to_bytes_be())
}

fn format_output(outcome: &SearchOutcome, ctx: &SearchContext, json: bool) -> Result<String> {
    let status = match outcome.termination {
        Termination::Converged => "converged",
        Termination::Exhausted => "exhausted",
    };

    let recovered_key = outcome.recovered_key.as_ref().map(|key| RecoveredKeyOutput {
        private_key_decimal: key.to_string(),
        private_key_hex: key_to_hex_string(key),
    });
    let recovery_status = if recovered_key.is_some() {
        "recovered"
    } else {
        "no-key-recovered"
    };

    let report = SearchReport {
        status: status.to_string(),
        generations: outcome.generations,
        best_nonce: outcome.best_k.to_string(),
        best_score: outcome.best_score.to_string(),
        recovered_key,
        recovery_status: recovery_status.to_string(),
        summary: SummaryOutput {
            total_signatures: ctx.signatures.len(),
            modulus: ctx.n.to_string(),
        },
    };

    if json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        let mut output = String::new();
        output.push_str(&format!(
            "Searched {} signatures for {} generations\n\n",
            report.summary.total_signatures, report.generations
        ));
        output.push_str(&format!("Status: {}\n", report.status));
        output.push_str(&format!("Best Nonce: {}\n", report.best_nonce));
        output.push_str(&format!("Best Score: {}\n", report.best_score));

        if let Some(key) = &report.recovered_key {
            output.push_str(&format!(
                "Private Key (decimal): {}\n",
                key.private_key_decimal
            ));
            output.push_str(&format!("Private Key (hex): {}\n", key.private_key_hex));
        } else {
            output.push_str("No key recovered: candidates do not agree across signatures.\n");
        }

        Ok(output)
    }
}

//! Evolutionary search for shared ECDSA nonces
//!
//! This library searches for a nonce `k` that was reused across a set of
//! ECDSA signatures. For each trial nonce the recovery formula
//! `d = (s*k - z) * r^-1 mod n` yields one private-key candidate per
//! signature; a genetic algorithm minimizes the disagreement between those
//! candidates. Exact agreement across the whole set recovers the key.

pub mod evolve;
pub mod fitness;
pub mod math;
pub mod provider;
pub mod recover;
pub mod signature;

pub use evolve::{run_search, EvolveConfig, SearchOutcome, Termination};
pub use signature::{SearchContext, Signature, SignatureInput};

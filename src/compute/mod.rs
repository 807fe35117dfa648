//! Compute module - The evolutionary search itself.

pub mod evolution;

pub use evolution::{EvolutionEngine, EvolutionError, Gene, Scorer};

//! DNA Evolution - Adaptive genetic search over fixed-length byte sequences.
//!
//! This crate evolves a population of byte strings ("DNA") toward higher
//! fitness. What the bytes mean is up to the caller: fitness comes from an
//! injected [`Scorer`], which might run a virtual machine, a simulation, or
//! a simple comparison.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, progress and snapshot types (serde)
//! - `compute`: The evolutionary search (genes, operators, engine)
//!
//! # Example
//!
//! ```rust,no_run
//! use dna_evolution::{EngineConfig, EvolutionEngine};
//!
//! // Reward DNA with large byte values.
//! let scorer = |dna: &[u8]| dna.iter().map(|&b| b as f32).sum::<f32>();
//!
//! let config = EngineConfig {
//!     dna_length: 32,
//!     ..Default::default()
//! };
//! let mut engine = EvolutionEngine::new(scorer, config)?;
//! engine.initialize_population(100)?;
//!
//! for _ in 0..200 {
//!     engine.next_generation()?;
//! }
//!
//! println!("Best score after 200 generations: {}", engine.best_score()?);
//! # Ok::<(), dna_evolution::EvolutionError>(())
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{EvolutionEngine, EvolutionError, Gene, Scorer};
pub use schema::{EngineConfig, PopulationSnapshot, RunLimits};

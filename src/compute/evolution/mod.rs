//! Evolutionary search over fixed-length byte sequences.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Scoring** (`fitness`): the [`Scorer`] seam that turns DNA into fitness
//! - **Genes** (`gene`): immutable scored individuals and their ranking order
//! - **DNA Operations** (`dna`): random generation, crossover, and mutation
//! - **Elite Reserve** (`reserve`): pinned genes that parent upcoming offspring
//! - **Search** (`search`): the generational engine with adaptive mutation
//!
//! # Example
//!
//! ```rust,no_run
//! use dna_evolution::compute::evolution::{EvolutionEngine, TargetMatch};
//! use dna_evolution::schema::{EngineConfig, RunLimits};
//!
//! let config = EngineConfig {
//!     dna_length: 5,
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let mut engine = EvolutionEngine::new(TargetMatch::new("hello"), config)?;
//! engine.initialize_population(64)?;
//!
//! let limits = RunLimits {
//!     max_generations: 500,
//!     target_score: Some(5.0),
//!     ..Default::default()
//! };
//! let summary = engine.run(&limits, |progress| {
//!     println!("Generation {}: best = {}", progress.generation, progress.best_score);
//! })?;
//! println!("Best DNA: {:?}", summary.best.dna);
//! # Ok::<(), dna_evolution::compute::evolution::EvolutionError>(())
//! ```
//!
//! # Generational Step
//!
//! Each step keeps the better half of the ranked population and refills the
//! other half with offspring. Offspring start as a copy of one parent and
//! take material from the other through either a wrapped two-point block
//! copy or uniform per-byte selection, then may receive a strided mutation.
//! The mutation rate rises as the elite half converges on the best score.

mod dna;
mod fitness;
mod gene;
mod reserve;
mod search;

pub use dna::{DnaRng, copy_wrapped, hamming_fraction, strided_positions};
pub use fitness::{ScoreError, Scorer, TargetMatch, byte_sum};
pub use gene::{Gene, by_descending_score};
pub use reserve::EliteReserve;
pub use search::{EvolutionEngine, EvolutionError, adaptive_mutation_rate};

//! Generational search over fixed-length DNA.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::schema::{
    ConfigError, EngineConfig, EvolutionHistory, EvolutionProgress, GeneRecord,
    PopulationSnapshot, RunLimits, RunSummary, StopReason,
};

use super::dna::{DnaRng, hamming_fraction};
use super::fitness::{ScoreError, Scorer};
use super::gene::{Gene, by_descending_score};
use super::reserve::EliteReserve;

/// Errors surfaced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error(
        "Gene DNA length {actual} does not match configured length {expected}; re-initialize the population"
    )]
    InconsistentGeneLength { expected: usize, actual: usize },
    #[error("Population is empty; initialize it first")]
    EmptyPopulation,
    #[error("Scorer failed: {0}")]
    Scorer(#[source] ScoreError),
}

/// Mutation settings in effect for one offspring.
#[derive(Debug, Clone, Copy)]
struct MutationParams {
    rate: u32,
    run_size: usize,
}

/// Evolution engine that owns the population, the elite reserve and the RNG.
pub struct EvolutionEngine<S> {
    scorer: S,
    config: EngineConfig,
    rng: DnaRng,
    population: Vec<Gene>,
    reserve: EliteReserve,
    mutation_rate: u32,
    generation: usize,
    history: EvolutionHistory,
    evaluations: AtomicU64,
    cancelled: Arc<AtomicBool>,
}

impl<S: Scorer> EvolutionEngine<S> {
    /// Create a new engine. The population starts empty.
    pub fn new(scorer: S, config: EngineConfig) -> Result<Self, EvolutionError> {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let mutation_rate = config.clamp_mutation_rate(config.initial_mutation_rate);

        Ok(Self {
            scorer,
            config,
            rng: DnaRng::new(seed),
            population: Vec::new(),
            reserve: EliteReserve::new(),
            mutation_rate,
            generation: 0,
            history: EvolutionHistory::default(),
            evaluations: AtomicU64::new(0),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Replace the configuration.
    ///
    /// The RNG keeps its stream; `random_seed` only applies at construction.
    /// Changing `dna_length` leaves the current population unusable until it
    /// is re-initialized.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), EvolutionError> {
        config.validate()?;

        if config.dna_length != self.config.dna_length && !self.population.is_empty() {
            log::warn!(
                "DNA length changed from {} to {}; population must be re-initialized",
                self.config.dna_length,
                config.dna_length
            );
        }

        self.mutation_rate = config.clamp_mutation_rate(self.mutation_rate);
        self.config = config;
        Ok(())
    }

    pub fn set_dna_length(&mut self, dna_length: usize) -> Result<(), EvolutionError> {
        self.set_config(EngineConfig {
            dna_length,
            ..self.config.clone()
        })
    }

    pub fn set_mutation_bounds(&mut self, min: u32, max: u32) -> Result<(), EvolutionError> {
        self.set_config(EngineConfig {
            min_mutation_rate: min,
            max_mutation_rate: max,
            ..self.config.clone()
        })
    }

    /// Current generation counter.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Mutation rate (percent) used by the most recent step.
    pub fn mutation_rate(&self) -> u32 {
        self.mutation_rate
    }

    /// Ranked population, best first.
    pub fn population(&self) -> &[Gene] {
        &self.population
    }

    pub fn reserve(&self) -> &EliteReserve {
        &self.reserve
    }

    /// Per-step records since the population was last built or restored.
    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Total scorer invocations made by this engine.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Get cancellation handle for [`run`](Self::run).
    ///
    /// Setting it stops the current run (or the next one, if none is in
    /// progress). The run that observes it clears it again.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Score `dna` into a gene stamped with the current generation.
    pub fn create_gene(&self, dna: Vec<u8>) -> Result<Gene, EvolutionError> {
        self.check_length(&dna)?;
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        Gene::new(dna, self.generation, &self.scorer).map_err(EvolutionError::Scorer)
    }

    /// Replace the population with `size` random genes.
    ///
    /// The generation counter and the elite reserve are left alone; the
    /// history starts over with the new population.
    pub fn initialize_population(&mut self, size: usize) -> Result<(), EvolutionError> {
        if size < 2 {
            return Err(ConfigError::PopulationTooSmall(size).into());
        }

        let length = self.config.dna_length;
        let generation = self.generation;
        let batch: Vec<(Vec<u8>, usize)> = (0..size)
            .map(|_| (self.rng.random_dna(length), generation))
            .collect();

        let mut population = self.score_all(batch)?;
        population.sort_by(by_descending_score);
        self.population = population;
        self.history.clear();

        log::debug!(
            "Initialized population of {} genes (DNA length {}), best score {}",
            size,
            length,
            self.population[0].score()
        );
        Ok(())
    }

    /// Discard the population and start over with `new_size` random genes.
    pub fn resize_population(&mut self, new_size: usize) -> Result<(), EvolutionError> {
        self.initialize_population(new_size)
    }

    // ------------------------------------------------------------------
    // Generational step
    // ------------------------------------------------------------------

    /// Advance one generation.
    ///
    /// The elite half survives untouched; every slot of the bottom half is
    /// refilled with an offspring. Pinned genes parent the first slots. All
    /// offspring DNA is built before any scoring, so a failing scorer leaves
    /// the population, the reserve and the generation counter as they were.
    pub fn next_generation(&mut self) -> Result<(), EvolutionError> {
        self.ranked()?;

        let half = self.half();
        let slots = self.population.len() - half;
        let pinned_used = slots.min(self.reserve.len());
        for depth in 0..pinned_used {
            if let Some(gene) = self.reserve.from_top(depth) {
                self.check_length(gene.dna())?;
            }
        }

        self.adjust_mutation_rate()?;
        let params = self.mutation_params();

        let mut batch = Vec::with_capacity(slots);
        for slot in 0..slots {
            let dna = match self.reserve.from_top(slot) {
                Some(mom) => {
                    let dad = &self.population[self.rng.index(half)];
                    breed(&mut self.rng, params, mom.dna(), dad.dna())
                }
                None => {
                    let (a, b) = self.rng.distinct_pair(half);
                    breed(
                        &mut self.rng,
                        params,
                        self.population[a].dna(),
                        self.population[b].dna(),
                    )
                }
            };
            batch.push((dna, self.generation));
        }

        let offspring = self.score_all(batch)?;

        if !self.config.retain_pinned {
            self.reserve.consume(pinned_used);
        }
        self.population.truncate(half);
        self.population.extend(offspring);
        self.population.sort_by(by_descending_score);
        self.generation += 1;

        let best = self.population[0].score();
        let worst = self.population[half - 1].score();
        self.history.best_score.push(best);
        self.history.worst_score.push(worst);
        self.history.mutation_rate.push(self.mutation_rate);

        log::debug!(
            "Generation {}: best {}, worst elite {}, mutation rate {}%, {} pinned parents",
            self.generation,
            best,
            worst,
            self.mutation_rate,
            pinned_used
        );
        Ok(())
    }

    /// Recompute the mutation rate from the current ranking.
    ///
    /// The closer the worst elite is to the best, the more the population has
    /// converged and the higher the rate.
    pub fn adjust_mutation_rate(&mut self) -> Result<u32, EvolutionError> {
        let ratio = self.worst_score()? / self.best_score()?;
        if !ratio.is_finite() {
            log::debug!("Degenerate score ratio {ratio}; mutation rate clamped");
        }
        self.mutation_rate = adaptive_mutation_rate(
            ratio,
            self.config.min_mutation_rate,
            self.config.max_mutation_rate,
        );
        Ok(self.mutation_rate)
    }

    /// Uniformly random gene from the elite half.
    pub fn select_random_gene(&mut self) -> Result<&Gene, EvolutionError> {
        self.ranked()?;
        let index = self.rng.index(self.half());
        Ok(&self.population[index])
    }

    /// Offspring of two distinct elite genes.
    pub fn cross_top_half(&mut self) -> Result<Gene, EvolutionError> {
        self.ranked()?;
        let (a, b) = self.rng.distinct_pair(self.half());
        let params = self.mutation_params();
        let dna = breed(
            &mut self.rng,
            params,
            self.population[a].dna(),
            self.population[b].dna(),
        );
        self.create_gene(dna)
    }

    /// Offspring built from `mom`'s DNA with material from `dad`, possibly
    /// mutated, scored and stamped with the current generation.
    pub fn cross(&mut self, mom: &Gene, dad: &Gene) -> Result<Gene, EvolutionError> {
        self.check_length(mom.dna())?;
        self.check_length(dad.dna())?;
        let params = self.mutation_params();
        let dna = breed(&mut self.rng, params, mom.dna(), dad.dna());
        self.create_gene(dna)
    }

    /// Apply one strided mutation to `dna` in place.
    pub fn mutate(&mut self, dna: &mut [u8]) -> Result<(), EvolutionError> {
        self.check_length(dna)?;
        self.rng.mutate(dna, self.config.mutation_run_size);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn best_gene(&self) -> Result<&Gene, EvolutionError> {
        Ok(&self.ranked()?[0])
    }

    pub fn best_dna(&self) -> Result<Vec<u8>, EvolutionError> {
        Ok(self.best_gene()?.dna().to_vec())
    }

    pub fn best_score(&self) -> Result<f32, EvolutionError> {
        Ok(self.best_gene()?.score())
    }

    /// Score of the weakest gene in the elite half.
    pub fn worst_score(&self) -> Result<f32, EvolutionError> {
        let population = self.ranked()?;
        Ok(population[population.len() / 2 - 1].score())
    }

    /// Current progress for display.
    pub fn progress(&self) -> Result<EvolutionProgress, EvolutionError> {
        let population = self.ranked()?;
        let elite = &population[..self.half()];

        let mut total = 0.0f32;
        let mut pairs = 0usize;
        for i in 0..elite.len() {
            for j in (i + 1)..elite.len() {
                total += hamming_fraction(elite[i].dna(), elite[j].dna());
                pairs += 1;
            }
        }
        let diversity = if pairs > 0 { total / pairs as f32 } else { 0.0 };

        Ok(EvolutionProgress {
            generation: self.generation,
            population_size: population.len(),
            best_score: self.best_score()?,
            worst_score: self.worst_score()?,
            mutation_rate: self.mutation_rate,
            pinned: self.reserve.len(),
            diversity,
        })
    }

    // ------------------------------------------------------------------
    // Elite reserve
    // ------------------------------------------------------------------

    /// Pin the current best gene.
    pub fn pin(&mut self) -> Result<(), EvolutionError> {
        let best = self.best_gene()?.clone();
        self.reserve.push(best);
        Ok(())
    }

    /// Score externally supplied DNA and pin it.
    pub fn pin_dna(&mut self, dna: Vec<u8>) -> Result<(), EvolutionError> {
        let gene = self.create_gene(dna)?;
        self.reserve.push(gene);
        Ok(())
    }

    pub fn clear_pinned(&mut self) {
        self.reserve.clear();
    }

    // ------------------------------------------------------------------
    // Driving
    // ------------------------------------------------------------------

    /// Step until a limit is hit, reporting progress after every step.
    ///
    /// The population must already be initialized.
    pub fn run<F>(
        &mut self,
        limits: &RunLimits,
        mut callback: F,
    ) -> Result<RunSummary, EvolutionError>
    where
        F: FnMut(&EvolutionProgress),
    {
        self.ranked()?;

        let start_time = Instant::now();
        let start_generation = self.generation;
        let start_evaluations = self.evaluations();
        let mut best = self.best_score()?;
        let mut stagnation = 0usize;

        log::info!(
            "Starting run at generation {} with {} genes (max {} generations)",
            start_generation,
            self.population.len(),
            limits.max_generations
        );

        let stop_reason = loop {
            // A cancellation stops one run; the flag is cleared for the next.
            if self.cancelled.swap(false, Ordering::Relaxed) {
                break StopReason::Cancelled;
            }
            if self.generation - start_generation >= limits.max_generations {
                break StopReason::MaxGenerations;
            }
            if let Some(target) = limits.target_score
                && best >= target
            {
                break StopReason::TargetReached;
            }
            if let Some(limit) = limits.stagnation_limit
                && stagnation >= limit
            {
                break StopReason::Stagnation;
            }

            self.next_generation()?;

            let current = self.best_score()?;
            if current > best {
                best = current;
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            callback(&self.progress()?);
        };

        let elapsed = start_time.elapsed().as_secs_f64();
        let evaluations = self.evaluations() - start_evaluations;
        let evaluations_per_second = if elapsed > 0.0 {
            evaluations as f64 / elapsed
        } else {
            0.0
        };

        log::info!(
            "Run stopped after {} generations ({:?}), best score {}",
            self.generation - start_generation,
            stop_reason,
            best
        );

        Ok(RunSummary {
            generations_run: self.generation - start_generation,
            final_generation: self.generation,
            best: self.best_gene()?.to_record(),
            stop_reason,
            elapsed_seconds: elapsed,
            evaluations_per_second,
        })
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> PopulationSnapshot {
        PopulationSnapshot {
            generation: self.generation,
            dna_length: self.config.dna_length,
            mutation_rate: self.mutation_rate,
            genes: self.population.iter().map(Gene::to_record).collect(),
            pinned: self.reserve.iter().map(Gene::to_record).collect(),
        }
    }

    /// Rebuild population and reserve from a snapshot, re-scoring every DNA.
    ///
    /// Nothing changes unless the whole snapshot is accepted.
    pub fn restore(&mut self, snapshot: &PopulationSnapshot) -> Result<(), EvolutionError> {
        if snapshot.dna_length != self.config.dna_length {
            log::warn!(
                "Rejected snapshot with DNA length {} (configured {})",
                snapshot.dna_length,
                self.config.dna_length
            );
            return Err(EvolutionError::InconsistentGeneLength {
                expected: self.config.dna_length,
                actual: snapshot.dna_length,
            });
        }
        if snapshot.genes.len() < 2 {
            return Err(ConfigError::PopulationTooSmall(snapshot.genes.len()).into());
        }
        for record in snapshot.genes.iter().chain(&snapshot.pinned) {
            self.check_length(&record.dna)?;
        }

        let to_batch = |records: &[GeneRecord]| -> Vec<(Vec<u8>, usize)> {
            records
                .iter()
                .map(|r| (r.dna.clone(), r.generation))
                .collect()
        };
        let mut population = self.score_all(to_batch(&snapshot.genes))?;
        let pinned = self.score_all(to_batch(&snapshot.pinned))?;
        population.sort_by(by_descending_score);

        self.population = population;
        self.reserve.clear();
        for gene in pinned {
            self.reserve.push(gene);
        }
        self.history.clear();
        self.generation = snapshot.generation;
        self.mutation_rate = self.config.clamp_mutation_rate(snapshot.mutation_rate);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// The population, if it is non-empty and matches the DNA length.
    fn ranked(&self) -> Result<&[Gene], EvolutionError> {
        let first = self
            .population
            .first()
            .ok_or(EvolutionError::EmptyPopulation)?;
        // Populations are built in one go at a single length.
        self.check_length(first.dna())?;
        Ok(&self.population)
    }

    fn check_length(&self, dna: &[u8]) -> Result<(), EvolutionError> {
        if dna.len() != self.config.dna_length {
            return Err(EvolutionError::InconsistentGeneLength {
                expected: self.config.dna_length,
                actual: dna.len(),
            });
        }
        Ok(())
    }

    #[inline]
    fn half(&self) -> usize {
        self.population.len() / 2
    }

    fn mutation_params(&self) -> MutationParams {
        MutationParams {
            rate: self.mutation_rate,
            run_size: self.config.mutation_run_size,
        }
    }

    /// Score finished DNA. Runs on the rayon pool when parallel scoring is on;
    /// no RNG draws happen here, so the result does not depend on the mode.
    ///
    /// Only scorer calls that actually ran are counted. Collection stops at
    /// the first failure, so a failed batch counts fewer than its length.
    fn score_all(&self, batch: Vec<(Vec<u8>, usize)>) -> Result<Vec<Gene>, EvolutionError> {
        let scorer = &self.scorer;
        let evaluations = &self.evaluations;
        let score = |(dna, generation): (Vec<u8>, usize)| {
            evaluations.fetch_add(1, Ordering::Relaxed);
            Gene::new(dna, generation, scorer)
        };

        let genes: Result<Vec<Gene>, ScoreError> = if self.config.parallel_scoring {
            batch.into_par_iter().map(score).collect()
        } else {
            batch.into_iter().map(score).collect()
        };

        genes.map_err(EvolutionError::Scorer)
    }
}

/// Crossover followed by the mutation gate.
fn breed(rng: &mut DnaRng, params: MutationParams, mom: &[u8], dad: &[u8]) -> Vec<u8> {
    let mut dna = rng.crossover(mom, dad);
    if rng.should_mutate(params.rate) {
        rng.mutate(&mut dna, params.run_size);
    }
    dna
}

/// `clamp(min + round(ratio * max), min, max)`.
///
/// A NaN ratio (both scores zero) maps to `min`; infinite ratios clamp to
/// the nearer bound. Requires `min <= max`.
pub fn adaptive_mutation_rate(ratio: f32, min: u32, max: u32) -> u32 {
    let scaled = (f64::from(ratio) * f64::from(max)).round();
    if scaled.is_nan() {
        return min;
    }
    (f64::from(min) + scaled).clamp(f64::from(min), f64::from(max)) as u32
}

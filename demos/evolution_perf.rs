//! Quick evolution performance test

use dna_evolution::{
    EngineConfig, EvolutionEngine, RunLimits, compute::evolution::TargetMatch,
};
use std::time::Instant;

const TARGET: &str = "The quick brown fox jumps over the lazy dog";

fn main() {
    println!("=== Evolution Performance Test ===\n");

    // Test different population sizes
    for population in [32, 128, 512] {
        println!("Population: {}", population);

        let config = EngineConfig {
            dna_length: TARGET.len(),
            random_seed: Some(42),
            ..Default::default()
        };
        let limits = RunLimits {
            max_generations: 2000,
            target_score: Some(TARGET.len() as f32),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(TargetMatch::new(TARGET), config)
            .expect("valid config");
        engine
            .initialize_population(population)
            .expect("population initialized");
        let summary = engine.run(&limits, |_| {}).expect("run completed");
        let elapsed = start.elapsed();

        println!("  Generations:    {}", summary.generations_run);
        println!("  Evaluations:    {}", engine.evaluations());
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", summary.evaluations_per_second);
        println!("  Best score:     {} / {}", summary.best.score, TARGET.len());
        println!("  Stop reason:    {:?}", summary.stop_reason);
        println!(
            "  Best DNA:       {:?}",
            String::from_utf8_lossy(&summary.best.dna)
        );
        println!();
    }
}

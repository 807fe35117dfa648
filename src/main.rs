//! DNA Evolution CLI - Evolve DNA toward a target string from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;

use dna_evolution::{
    EvolutionEngine,
    compute::evolution::TargetMatch,
    schema::{DriverConfig, RunLimits},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations] [snapshot.json]", args[0]);
        eprintln!();
        eprintln!("Evolve DNA toward the target string in a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json    Path to driver configuration file");
        eprintln!("  generations    Override limits.max_generations");
        eprintln!("  snapshot.json  Write the final population here");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: DriverConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Some(generations) = args.get(2).and_then(|s| s.parse().ok()) {
        config.limits.max_generations = generations;
    }
    let snapshot_path = args.get(3).map(PathBuf::from);

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    let target = config.target.as_bytes().to_vec();
    let limits = RunLimits {
        target_score: config
            .limits
            .target_score
            .or(Some(target.len() as f32)),
        ..config.limits.clone()
    };

    println!("DNA Evolution");
    println!("=============");
    println!("Target: {:?} ({} bytes)", config.target, target.len());
    println!("Population: {}", config.population_size);
    println!(
        "Mutation rate bounds: [{}, {}]%, run size {}",
        config.engine.min_mutation_rate,
        config.engine.max_mutation_rate,
        config.engine.mutation_run_size
    );
    println!("Max generations: {}", limits.max_generations);
    println!();

    let mut engine = EvolutionEngine::new(TargetMatch::new(target), config.engine_config())
        .unwrap_or_else(|e| {
            eprintln!("Error creating engine: {}", e);
            std::process::exit(1);
        });

    if let Err(e) = engine.initialize_population(config.population_size) {
        eprintln!("Error initializing population: {}", e);
        std::process::exit(1);
    }

    // Print progress every 10%
    let report_every = (limits.max_generations / 10).max(1);
    let summary = engine
        .run(&limits, |progress| {
            if progress.generation % report_every == 0 {
                println!(
                    "  Generation {}: best={}, worst elite={}, mutation={}%, diversity={:.3}",
                    progress.generation,
                    progress.best_score,
                    progress.worst_score,
                    progress.mutation_rate,
                    progress.diversity
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Evolution failed: {}", e);
            std::process::exit(1);
        });

    println!();
    println!("Stopped: {:?}", summary.stop_reason);
    println!("Generations: {}", summary.generations_run);
    println!(
        "Best: {:?} (score {})",
        String::from_utf8_lossy(&summary.best.dna),
        summary.best.score
    );
    println!(
        "Time: {:.2}s ({:.1} evaluations/s)",
        summary.elapsed_seconds, summary.evaluations_per_second
    );

    if let Some(path) = snapshot_path {
        if let Err(e) = engine.snapshot().save(&path) {
            eprintln!("Error writing snapshot: {}", e);
            std::process::exit(1);
        }
        println!("Snapshot written to {}", path.display());
    }
}

fn print_example_config() {
    let config = DriverConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example: {}", e),
    }
}

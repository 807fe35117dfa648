//! Configuration types for the evolution engine and the CLI driver.

use serde::{Deserialize, Serialize};

use super::RunLimits;

/// Engine parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of bytes in every DNA sequence.
    #[serde(default = "default_dna_length")]
    pub dna_length: usize,
    /// Lower bound of the adaptive mutation rate (percent).
    #[serde(default = "default_min_mutation_rate")]
    pub min_mutation_rate: u32,
    /// Upper bound of the adaptive mutation rate (percent).
    #[serde(default = "default_max_mutation_rate")]
    pub max_mutation_rate: u32,
    /// Mutation rate used until the first generational step adjusts it.
    /// Clamped into the bounds, never rejected.
    #[serde(default = "default_initial_mutation_rate")]
    pub initial_mutation_rate: u32,
    /// Longest span (and widest stride) touched by one mutation.
    #[serde(default = "default_mutation_run_size")]
    pub mutation_run_size: usize,
    /// Keep pinned genes in the reserve after they have been used as parents.
    #[serde(default)]
    pub retain_pinned: bool,
    /// Score freshly built DNA on the rayon thread pool.
    #[serde(default = "default_parallel_scoring")]
    pub parallel_scoring: bool,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dna_length: default_dna_length(),
            min_mutation_rate: default_min_mutation_rate(),
            max_mutation_rate: default_max_mutation_rate(),
            initial_mutation_rate: default_initial_mutation_rate(),
            mutation_run_size: default_mutation_run_size(),
            retain_pinned: false,
            parallel_scoring: default_parallel_scoring(),
            random_seed: None,
        }
    }
}

fn default_dna_length() -> usize {
    256
}
fn default_min_mutation_rate() -> u32 {
    1
}
fn default_max_mutation_rate() -> u32 {
    100
}
fn default_initial_mutation_rate() -> u32 {
    50
}
fn default_mutation_run_size() -> usize {
    4
}
fn default_parallel_scoring() -> bool {
    true
}

impl EngineConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dna_length == 0 {
            return Err(ConfigError::InvalidDnaLength);
        }
        if self.min_mutation_rate > self.max_mutation_rate {
            return Err(ConfigError::InvalidMutationBounds {
                min: self.min_mutation_rate,
                max: self.max_mutation_rate,
            });
        }
        if self.mutation_run_size == 0 {
            return Err(ConfigError::InvalidMutationRunSize);
        }
        Ok(())
    }

    /// Clamp a mutation rate into the configured bounds.
    #[inline]
    pub fn clamp_mutation_rate(&self, rate: u32) -> u32 {
        rate.clamp(self.min_mutation_rate, self.max_mutation_rate)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("DNA length must be non-zero")]
    InvalidDnaLength,
    #[error("Minimum mutation rate {min} exceeds maximum {max}")]
    InvalidMutationBounds { min: u32, max: u32 },
    #[error("Mutation run size must be non-zero")]
    InvalidMutationRunSize,
    #[error("Population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
}

/// Input file for the command line driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Engine parameters. `dna_length` is overridden by the target length.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Number of genes in the population.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Stop conditions.
    #[serde(default)]
    pub limits: RunLimits,
    /// Byte string the demo scorer rewards matching.
    #[serde(default = "default_target")]
    pub target: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            population_size: default_population_size(),
            limits: RunLimits::default(),
            target: default_target(),
        }
    }
}

fn default_population_size() -> usize {
    64
}
fn default_target() -> String {
    "Hello, evolution!".to_string()
}

impl DriverConfig {
    /// Engine configuration with the DNA length taken from the target.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            dna_length: self.target.len(),
            ..self.engine.clone()
        }
    }

    /// Validate driver parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine_config().validate()?;
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_mutation_rate, 1);
        assert_eq!(config.max_mutation_rate, 100);
        assert_eq!(config.mutation_run_size, 4);
    }

    #[test]
    fn test_invalid_configs() {
        let zero_length = EngineConfig {
            dna_length: 0,
            ..Default::default()
        };
        assert_eq!(zero_length.validate(), Err(ConfigError::InvalidDnaLength));

        let inverted = EngineConfig {
            min_mutation_rate: 60,
            max_mutation_rate: 40,
            ..Default::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::InvalidMutationBounds { min: 60, max: 40 })
        );

        let no_run = EngineConfig {
            mutation_run_size: 0,
            ..Default::default()
        };
        assert_eq!(no_run.validate(), Err(ConfigError::InvalidMutationRunSize));
    }

    #[test]
    fn test_clamp_mutation_rate() {
        let config = EngineConfig {
            min_mutation_rate: 10,
            max_mutation_rate: 20,
            ..Default::default()
        };
        assert_eq!(config.clamp_mutation_rate(50), 20);
        assert_eq!(config.clamp_mutation_rate(0), 10);
        assert_eq!(config.clamp_mutation_rate(15), 15);
    }

    #[test]
    fn test_serde_defaults() {
        let parsed: EngineConfig = serde_json::from_str(r#"{"dna_length": 8}"#).unwrap();
        assert_eq!(parsed.dna_length, 8);
        assert_eq!(parsed.initial_mutation_rate, 50);
        assert!(parsed.parallel_scoring);
        assert!(!parsed.retain_pinned);
        assert_eq!(parsed.random_seed, None);
    }

    #[test]
    fn test_driver_config() {
        let config = DriverConfig {
            target: "abc".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.engine_config().dna_length, 3);

        let empty_target = DriverConfig {
            target: String::new(),
            ..Default::default()
        };
        assert_eq!(empty_target.validate(), Err(ConfigError::InvalidDnaLength));

        let tiny = DriverConfig {
            population_size: 1,
            ..Default::default()
        };
        assert_eq!(tiny.validate(), Err(ConfigError::PopulationTooSmall(1)));
    }
}

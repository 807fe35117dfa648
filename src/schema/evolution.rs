//! Record types produced by the evolution engine: progress reports, run
//! summaries and population snapshots.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ============================================================================
// Run control
// ============================================================================

/// Stop conditions for [`run`](crate::compute::evolution::EvolutionEngine::run).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLimits {
    /// Maximum number of generational steps.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Stop once the best score reaches this value.
    #[serde(default)]
    pub target_score: Option<f32>,
    /// Stop if the best score has not improved for N steps.
    #[serde(default)]
    pub stagnation_limit: Option<usize>,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_generations: default_max_generations(),
            target_score: None,
            stagnation_limit: None,
        }
    }
}

fn default_max_generations() -> usize {
    1000
}

/// Reason a run stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Reached maximum generations.
    MaxGenerations,
    /// Reached target score.
    TargetReached,
    /// Stagnation limit hit.
    Stagnation,
    /// Cancelled through the cancel handle.
    Cancelled,
}

/// Final result of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Steps taken during this run.
    pub generations_run: usize,
    /// Engine generation counter when the run stopped.
    pub final_generation: usize,
    /// Best gene at the end of the run.
    pub best: GeneRecord,
    /// Reason for stopping.
    pub stop_reason: StopReason,
    /// Wall time in seconds.
    pub elapsed_seconds: f64,
    /// Scorer invocations per second.
    pub evaluations_per_second: f64,
}

// ============================================================================
// Progress reporting
// ============================================================================

/// Per-generation history, one entry per completed step.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EvolutionHistory {
    /// Best score after each step.
    pub best_score: Vec<f32>,
    /// Worst surviving elite score after each step.
    pub worst_score: Vec<f32>,
    /// Mutation rate used by each step.
    pub mutation_rate: Vec<u32>,
}

impl EvolutionHistory {
    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.best_score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_score.is_empty()
    }

    pub fn clear(&mut self) {
        self.best_score.clear();
        self.worst_score.clear();
        self.mutation_rate.clear();
    }
}

/// Snapshot of engine state for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    pub generation: usize,
    pub population_size: usize,
    pub best_score: f32,
    pub worst_score: f32,
    pub mutation_rate: u32,
    /// Genes waiting in the elite reserve.
    pub pinned: usize,
    /// Mean normalized Hamming distance within the elite half (0.0-1.0).
    pub diversity: f32,
}

// ============================================================================
// Persistence
// ============================================================================

/// Serializable form of a gene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneRecord {
    pub dna: Vec<u8>,
    pub score: f32,
    pub generation: usize,
}

/// Serializable population state.
///
/// Scores are informational: restoring a snapshot re-scores every DNA.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopulationSnapshot {
    pub generation: usize,
    pub dna_length: usize,
    pub mutation_rate: u32,
    pub genes: Vec<GeneRecord>,
    #[serde(default)]
    pub pinned: Vec<GeneRecord>,
}

impl PopulationSnapshot {
    /// Write the snapshot as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Read a snapshot written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_snapshot() -> PopulationSnapshot {
        PopulationSnapshot {
            generation: 7,
            dna_length: 3,
            mutation_rate: 42,
            genes: vec![
                GeneRecord {
                    dna: vec![1, 2, 3],
                    score: 6.0,
                    generation: 7,
                },
                GeneRecord {
                    dna: vec![0, 0, 1],
                    score: 1.0,
                    generation: 2,
                },
            ],
            pinned: vec![GeneRecord {
                dna: vec![9, 9, 9],
                score: 27.0,
                generation: 5,
            }],
        }
    }

    #[test]
    fn test_snapshot_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("population.json");

        let snapshot = test_snapshot();
        snapshot.save(&path).unwrap();

        let loaded = PopulationSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_snapshot_load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = PopulationSnapshot::load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_snapshot_pinned_defaults_empty() {
        let json = r#"{"generation":0,"dna_length":1,"mutation_rate":5,"genes":[]}"#;
        let parsed: PopulationSnapshot = serde_json::from_str(json).unwrap();
        assert!(parsed.pinned.is_empty());
    }

    #[test]
    fn test_run_limits_defaults() {
        let limits: RunLimits = serde_json::from_str("{}").unwrap();
        assert_eq!(limits.max_generations, 1000);
        assert!(limits.target_score.is_none());
        assert!(limits.stagnation_limit.is_none());
    }

    #[test]
    fn test_history_clear() {
        let mut history = EvolutionHistory {
            best_score: vec![1.0],
            worst_score: vec![0.5],
            mutation_rate: vec![51],
        };
        assert_eq!(history.len(), 1);
        history.clear();
        assert!(history.is_empty());
    }
}

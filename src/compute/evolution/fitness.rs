//! The scoring seam between the engine and whatever interprets a DNA sequence.

use std::error::Error;

/// Error raised by a [`Scorer`]. The engine never inspects or retries it.
pub type ScoreError = Box<dyn Error + Send + Sync>;

/// Maps a DNA sequence to a fitness score. Higher is better.
///
/// The engine calls `score` exactly once per gene, when the gene is built.
/// Implementations may be arbitrarily expensive; with parallel scoring
/// enabled they are called from rayon worker threads.
pub trait Scorer: Send + Sync {
    fn score(&self, dna: &[u8]) -> Result<f32, ScoreError>;
}

/// Infallible closures are scorers.
impl<F> Scorer for F
where
    F: Fn(&[u8]) -> f32 + Send + Sync,
{
    fn score(&self, dna: &[u8]) -> Result<f32, ScoreError> {
        Ok(self(dna))
    }
}

/// Sum of byte values. Handy as a deterministic test scorer.
pub fn byte_sum(dna: &[u8]) -> f32 {
    dna.iter().map(|&b| b as f32).sum()
}

/// Scores the number of positions where `dna` equals `target`.
#[derive(Debug, Clone)]
pub struct TargetMatch {
    target: Vec<u8>,
}

impl TargetMatch {
    pub fn new(target: impl Into<Vec<u8>>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }
}

impl Scorer for TargetMatch {
    fn score(&self, dna: &[u8]) -> Result<f32, ScoreError> {
        if dna.len() != self.target.len() {
            return Err(format!(
                "DNA length {} does not match target length {}",
                dna.len(),
                self.target.len()
            )
            .into());
        }
        let matches = dna
            .iter()
            .zip(&self.target)
            .filter(|(a, b)| a == b)
            .count();
        Ok(matches as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_scorer() {
        let scorer = |dna: &[u8]| dna.len() as f32;
        assert_eq!(scorer.score(&[1, 2, 3]).unwrap(), 3.0);
    }

    #[test]
    fn test_byte_sum() {
        assert_eq!(byte_sum(&[255, 1, 0, 4]), 260.0);
        assert_eq!(byte_sum(&[]), 0.0);
    }

    #[test]
    fn test_target_match() {
        let scorer = TargetMatch::new("abcd");
        assert_eq!(scorer.score(b"abcd").unwrap(), 4.0);
        assert_eq!(scorer.score(b"abzz").unwrap(), 2.0);
        assert!(scorer.score(b"abc").is_err());
    }
}

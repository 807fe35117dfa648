//! Scored, immutable individuals.

use std::cmp::Ordering;

use crate::schema::GeneRecord;

use super::fitness::{ScoreError, Scorer};

/// An evaluated DNA sequence.
///
/// The score is computed once, in [`Gene::new`], and never again.
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    dna: Vec<u8>,
    score: f32,
    generation: usize,
}

impl Gene {
    /// Score `dna` and wrap it.
    pub fn new<S: Scorer + ?Sized>(
        dna: Vec<u8>,
        generation: usize,
        scorer: &S,
    ) -> Result<Self, ScoreError> {
        let score = scorer.score(&dna)?;
        Ok(Self {
            dna,
            score,
            generation,
        })
    }

    #[inline]
    pub fn dna(&self) -> &[u8] {
        &self.dna
    }

    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Generation in which this gene was created.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn to_record(&self) -> GeneRecord {
        GeneRecord {
            dna: self.dna.clone(),
            score: self.score,
            generation: self.generation,
        }
    }
}

/// Ranking order for populations: higher scores first.
///
/// NaN scores rank after every other score so a broken evaluation can never
/// take the top slot.
pub fn by_descending_score(a: &Gene, b: &Gene) -> Ordering {
    rank_key(b.score).total_cmp(&rank_key(a.score))
}

#[inline]
fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::byte_sum;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    struct CountingScorer {
        calls: AtomicUsize,
    }

    impl Scorer for CountingScorer {
        fn score(&self, dna: &[u8]) -> Result<f32, ScoreError> {
            self.calls.fetch_add(1, AtomicOrdering::Relaxed);
            Ok(byte_sum(dna))
        }
    }

    fn gene(score: f32) -> Gene {
        Gene::new(vec![0], 0, &move |_: &[u8]| score).unwrap()
    }

    #[test]
    fn test_gene_scored_once() {
        let scorer = CountingScorer {
            calls: AtomicUsize::new(0),
        };
        let gene = Gene::new(vec![1, 2, 3], 4, &scorer).unwrap();

        assert_eq!(gene.score(), 6.0);
        assert_eq!(gene.generation(), 4);
        assert_eq!(gene.dna(), &[1, 2, 3]);

        // Reading the score, cloning and recording never re-run the scorer.
        let _ = gene.score();
        let copy = gene.clone();
        let record = copy.to_record();
        assert_eq!(record.score, 6.0);
        assert_eq!(scorer.calls.load(AtomicOrdering::Relaxed), 1);
    }

    #[test]
    fn test_scorer_error_propagates() {
        struct Failing;
        impl Scorer for Failing {
            fn score(&self, _dna: &[u8]) -> Result<f32, ScoreError> {
                Err("simulation crashed".into())
            }
        }

        let err = Gene::new(vec![0; 4], 0, &Failing).unwrap_err();
        assert_eq!(err.to_string(), "simulation crashed");
    }

    #[test]
    fn test_descending_order() {
        let mut genes = vec![gene(1.0), gene(5.0), gene(-2.0), gene(3.0)];
        genes.sort_by(by_descending_score);
        let scores: Vec<f32> = genes.iter().map(Gene::score).collect();
        assert_eq!(scores, vec![5.0, 3.0, 1.0, -2.0]);
    }

    #[test]
    fn test_nan_ranks_last() {
        let mut genes = vec![gene(f32::NAN), gene(f32::NEG_INFINITY), gene(0.5)];
        genes.sort_by(by_descending_score);
        assert_eq!(genes[0].score(), 0.5);
        assert!(genes.iter().skip(1).any(|g| g.score().is_nan()));
    }
}

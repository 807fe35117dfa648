//! Elite reserve: externally pinned genes that must parent upcoming offspring.

use super::gene::Gene;

/// Stack of pinned genes, consumed last-in-first-out.
#[derive(Debug, Clone, Default)]
pub struct EliteReserve {
    genes: Vec<Gene>,
}

impl EliteReserve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, gene: Gene) {
        self.genes.push(gene);
    }

    /// The `depth`-th gene from the top (0 = most recently pinned).
    pub fn from_top(&self, depth: usize) -> Option<&Gene> {
        self.genes.len().checked_sub(depth + 1).map(|i| &self.genes[i])
    }

    /// Remove up to `count` genes from the top.
    pub fn consume(&mut self, count: usize) {
        let keep = self.genes.len().saturating_sub(count);
        self.genes.truncate(keep);
    }

    pub fn clear(&mut self) {
        self.genes.clear();
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Pinned genes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Gene> {
        self.genes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(tag: u8) -> Gene {
        Gene::new(vec![tag], 0, &|dna: &[u8]| dna[0] as f32).unwrap()
    }

    #[test]
    fn test_lifo_order() {
        let mut reserve = EliteReserve::new();
        reserve.push(gene(1));
        reserve.push(gene(2));
        reserve.push(gene(3));

        assert_eq!(reserve.from_top(0).unwrap().dna(), &[3]);
        assert_eq!(reserve.from_top(2).unwrap().dna(), &[1]);
        assert!(reserve.from_top(3).is_none());
    }

    #[test]
    fn test_consume_never_overdraws() {
        let mut reserve = EliteReserve::new();
        reserve.push(gene(1));
        reserve.push(gene(2));

        reserve.consume(1);
        assert_eq!(reserve.len(), 1);
        assert_eq!(reserve.from_top(0).unwrap().dna(), &[1]);

        reserve.consume(10);
        assert!(reserve.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut reserve = EliteReserve::new();
        reserve.push(gene(5));
        reserve.clear();
        assert!(reserve.is_empty());
        assert_eq!(reserve.iter().count(), 0);
    }
}

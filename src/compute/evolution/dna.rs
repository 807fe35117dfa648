//! DNA manipulation: random generation, crossover and mutation.
//!
//! All draws go through [`DnaRng`] so a seeded engine replays bit for bit.

use rand::prelude::*;

/// Random number generator wrapper for DNA operations.
#[derive(Debug, Clone)]
pub struct DnaRng {
    rng: StdRng,
}

impl DnaRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform byte over the full range.
    #[inline]
    pub fn random_byte(&mut self) -> u8 {
        self.rng.r#gen()
    }

    /// `length` independent uniform bytes.
    pub fn random_dna(&mut self, length: usize) -> Vec<u8> {
        (0..length).map(|_| self.random_byte()).collect()
    }

    /// Uniform index in `[0, upper)`. `upper` must be non-zero.
    #[inline]
    pub fn index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }

    /// Two distinct uniform indices in `[0, upper)`.
    ///
    /// With `upper < 2` there is no distinct pair and `(0, 0)` is returned
    /// without drawing.
    pub fn distinct_pair(&mut self, upper: usize) -> (usize, usize) {
        if upper < 2 {
            return (0, 0);
        }
        loop {
            let a = self.index(upper);
            let b = self.index(upper);
            if a != b {
                return (a, b);
            }
        }
    }

    /// Build a child from `mom`, taking material from `dad` with one of the
    /// two crossover strategies chosen uniformly.
    pub fn crossover(&mut self, mom: &[u8], dad: &[u8]) -> Vec<u8> {
        let mut dna = mom.to_vec();
        match self.rng.gen_range(0..2) {
            0 => self.cross_two_point(dad, &mut dna),
            _ => self.cross_uniform(dad, &mut dna),
        }
        dna
    }

    /// Copy a circular block of `dad` into `dna` at a circular offset.
    pub fn cross_two_point(&mut self, dad: &[u8], dna: &mut [u8]) {
        let len = dna.len();
        let src = self.index(len);
        let dest = self.index(len);
        let size = 1 + self.index(len);
        copy_wrapped(dna, dad, src, dest, size);
    }

    /// Take each byte from `dad` with probability 1/2.
    pub fn cross_uniform(&mut self, dad: &[u8], dna: &mut [u8]) {
        for (byte, &donor) in dna.iter_mut().zip(dad) {
            if self.rng.r#gen::<bool>() {
                *byte = donor;
            }
        }
    }

    /// Mutation gate. The comparison is inclusive, so a rate of `r` mutates
    /// with probability `(r + 1) / 100`.
    #[inline]
    pub fn should_mutate(&mut self, rate: u32) -> bool {
        self.rng.gen_range(0..100u32) <= rate
    }

    /// Overwrite a strided, wrapping run of bytes with fresh random bytes.
    pub fn mutate(&mut self, dna: &mut [u8], run_size: usize) {
        let len = dna.len();
        let dest = self.index(len);
        let size = 1 + self.index(run_size);
        let gap = 1 + self.index(run_size);
        for pos in strided_positions(dest, size, gap, len) {
            dna[pos] = self.random_byte();
        }
    }
}

/// `dna[(dest + i) % len] = donor[(src + i) % len]` for `i` in `[0, size)`.
///
/// `size` may exceed the length; later writes then overwrite earlier ones.
pub fn copy_wrapped(dna: &mut [u8], donor: &[u8], src: usize, dest: usize, size: usize) {
    let len = dna.len();
    if len == 0 {
        return;
    }
    for i in 0..size {
        dna[(dest + i) % len] = donor[(src + i) % len];
    }
}

/// Positions `dest, dest + gap, dest + 2gap, ...` below `dest + size`,
/// wrapped into `[0, len)`. Yields `ceil(size / gap)` positions.
pub fn strided_positions(
    dest: usize,
    size: usize,
    gap: usize,
    len: usize,
) -> impl Iterator<Item = usize> {
    (0..size).step_by(gap.max(1)).map(move |i| (dest + i) % len)
}

/// Fraction of positions at which two sequences differ (0.0-1.0).
pub fn hamming_fraction(a: &[u8], b: &[u8]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let differing = a.iter().zip(b).filter(|(x, y)| x != y).count();
    differing as f32 / len as f32
}

//! Random draw supply
//!
//! Every engine call takes its random source explicitly. A run never shares
//! its source with another run; child sources are derived from seeds drawn
//! out of the parent before any parallel work starts.

use rand::{
    distributions::{Distribution, Open01},
    Rng, SeedableRng,
};
use rand_distr::Binomial;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::errors::{DomainError, Result};

/// Supplier of the draws used by the engines
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`
    fn uniform(&mut self) -> f64;

    /// Uniform draw in the open interval `(0, 1)`
    fn open_uniform(&mut self) -> f64;

    /// Uniform index in `[0, n)`, `n` must be positive
    fn index(&mut self, n: usize) -> usize;

    /// Number of successes in `n` trials with success probability `p`
    fn binomial(&mut self, n: u64, p: f64) -> Result<u64>;

    /// Seed for an independent child source
    fn next_seed(&mut self) -> u64;
}

/// Random source backed by a seeded Xoshiro256++ generator
#[derive(Clone, Debug)]
pub struct SeededSource {
    rng: Xoshiro256PlusPlus,
}

impl SeededSource {
    /// Creates a source from a fixed seed
    ///
    /// # Arguments:
    /// * `seed` seed of the generator
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: Xoshiro256PlusPlus::seed_from_u64(seed) }
    }

    /// Creates a source seeded from the operating system entropy
    pub fn from_entropy() -> Self {
        Self { rng: Xoshiro256PlusPlus::from_entropy() }
    }

    /// Derives `n` independent child sources, one per run
    ///
    /// # Arguments:
    /// * `n` number of child sources
    pub fn split(&mut self, n: usize) -> Vec<SeededSource> {
        (0..n).map(|_| SeededSource::from_seed(self.next_seed())).collect()
    }
}

impl RandomSource for SeededSource {
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn open_uniform(&mut self) -> f64 {
        Open01.sample(&mut self.rng)
    }

    fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    fn binomial(&mut self, n: u64, p: f64) -> Result<u64> {
        let distribution = Binomial::new(n, p).map_err(|_| DomainError::ProbabilityOutOfRange(p))?;
        Ok(distribution.sample(&mut self.rng))
    }

    fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

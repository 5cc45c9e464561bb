//! Single-locus population module
//!
//! A [`Population`] is one immutable generation of a biallelic locus in a
//! haploid Wright-Fisher population. Advancing a population never modifies it:
//! [`Population::next_generation`] builds the successor from scratch, so a
//! trajectory can be kept and compared at any earlier generation.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::errors::{DomainError, Result};
use crate::random::RandomSource;

/// Sequence of snapshots of one lineage, indexed by generation
pub type Trajectory = Vec<Population>;

/// One generation of a single-locus population
#[derive(Clone, Debug, PartialEq)]
pub struct Population {
    size: u64,
    generation: usize,
    selection_coefficient: f64,
    starting_frequency: f64,
    allele_count: u64,
}

impl Population {
    /// Creates the generation 0 population of a new lineage
    ///
    /// # Arguments:
    /// * `size` population size
    /// * `selection_coefficient` selective advantage of the focal allele
    /// * `starting_frequency` initial frequency of the focal allele, in [0, 1]
    pub fn new(size: u64, selection_coefficient: f64, starting_frequency: f64) -> Result<Self> {
        if !(0. ..=1.).contains(&starting_frequency) {
            return Err(DomainError::FrequencyOutOfRange(starting_frequency))
        }
        let allele_count = (starting_frequency * size as f64).round() as u64;
        Self::with_allele_count(size, selection_coefficient, starting_frequency, allele_count)
    }

    /// Creates a generation 0 population with an explicit allele count
    ///
    /// # Arguments:
    /// * `size` population size
    /// * `selection_coefficient` selective advantage of the focal allele
    /// * `starting_frequency` frequency recorded as the lineage starting point
    /// * `allele_count` number of copies of the focal allele
    pub fn with_allele_count(size: u64, selection_coefficient: f64, starting_frequency: f64, allele_count: u64) -> Result<Self> {
        let population = Self {
            size,
            generation: 0,
            selection_coefficient,
            starting_frequency,
            allele_count,
        };
        population.validate()?;
        Ok(population)
    }

    fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(DomainError::ZeroPopulationSize)
        }
        if self.allele_count > self.size {
            return Err(DomainError::AlleleCountOutOfRange { count: self.allele_count, size: self.size })
        }
        Ok(())
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn selection_coefficient(&self) -> f64 {
        self.selection_coefficient
    }

    pub fn starting_frequency(&self) -> f64 {
        self.starting_frequency
    }

    pub fn allele_count(&self) -> u64 {
        self.allele_count
    }

    /// Frequency of the focal allele, always `allele_count / size`
    pub fn frequency(&self) -> f64 {
        self.allele_count as f64 / self.size as f64
    }

    /// Checks if the focal allele reached frequency 1
    pub fn is_fixed(&self) -> bool {
        self.allele_count == self.size
    }

    /// Checks if the focal allele was lost
    pub fn is_lost(&self) -> bool {
        self.allele_count == 0
    }

    /// Probability that an individual of the next generation carries the
    /// focal allele, after weighting its current carriers by `1 + s`
    pub fn sampling_probability(&self) -> Result<f64> {
        self.validate()?;

        // boundary states reproduce themselves exactly, whatever the selection
        if self.is_lost() {
            return Ok(0.)
        }
        if self.is_fixed() {
            return Ok(1.)
        }

        let n = self.allele_count as f64;
        let weighted = n * (1. + self.selection_coefficient);
        let probability = weighted / (weighted + self.size as f64 - n);

        if !(0. ..=1.).contains(&probability) {
            return Err(DomainError::ProbabilityOutOfRange(probability))
        }
        Ok(probability)
    }

    /// Executes a Wright-Fisher update and returns the next generation
    ///
    /// A population where the allele is fixed or lost reproduces itself; this
    /// method never decides to stop.
    ///
    /// # Arguments:
    /// * `rng` random source of this lineage
    pub fn next_generation<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<Population> {
        let probability = self.sampling_probability()?;
        let allele_count = rng.binomial(self.size, probability)?;

        Ok(Population {
            generation: self.generation + 1,
            allele_count,
            ..self.clone()
        })
    }
}

impl Serialize for Population {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Population", 6)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("generation", &self.generation)?;
        state.serialize_field("selection_coefficient", &self.selection_coefficient)?;
        state.serialize_field("starting_frequency", &self.starting_frequency)?;
        state.serialize_field("allele_count", &self.allele_count)?;
        state.serialize_field("frequency", &self.frequency())?;
        state.end()
    }
}

/// Simulates a lineage for a fixed number of generations
///
/// The returned trajectory holds exactly `generations` snapshots, with
/// `initial` at index 0. There is no early termination at fixation.
///
/// # Arguments:
/// * `initial` generation 0 of the lineage
/// * `generations` number of snapshots to produce
/// * `rng` random source of this lineage
pub fn simulate_time_points<R: RandomSource + ?Sized>(initial: Population, generations: usize, rng: &mut R) -> Result<Trajectory> {
    if generations == 0 {
        return Err(DomainError::ZeroCount("generations"))
    }

    let mut trajectory = Vec::with_capacity(generations);
    trajectory.push(initial);
    for t in 1..generations {
        let next = trajectory[t - 1].next_generation(rng)?;
        trajectory.push(next);
    }
    Ok(trajectory)
}

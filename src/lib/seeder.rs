//! Allele seeding module
//!
//! Chooses the number of dominant alleles at locus A when a two-locus
//! population is created.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ensemble::{run_many, SingleLocusParameters};
use crate::errors::{DomainError, Result};
use crate::random::RandomSource;

/// Default number of neutral runs used by [`SeedingStrategy::NeutralDrift`]
pub const DRIFT_RUNS: usize = 100;
/// Default number of generations per run used by [`SeedingStrategy::NeutralDrift`]
pub const DRIFT_GENERATIONS: usize = 100;

/// Describes how the starting allele count at locus A is chosen
///
/// Stored in model files in its command-line form, e.g. `seeding = "drift:100:100"`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "String", into = "String")]
pub enum SeedingStrategy {
    /// Runs a neutral ensemble (selection 0, starting frequency 0.5) with the
    /// population size of the new population and returns the allele count of
    /// a uniformly chosen (run, generation) cell
    NeutralDrift { runs: usize, generations: usize },
    /// Always returns the given count
    Fixed(u64),
    /// Returns `round(f * size)` for the given frequency `f`
    Frequency(f64),
}

impl Default for SeedingStrategy {
    fn default() -> Self {
        Self::NeutralDrift { runs: DRIFT_RUNS, generations: DRIFT_GENERATIONS }
    }
}

impl SeedingStrategy {
    /// Parses a strategy from its command-line form: `drift`,
    /// `drift:<runs>:<generations>`, `fixed:<count>` or `frequency:<f>`
    ///
    /// # Arguments:
    /// * `value` string to parse
    pub fn parse(value: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = value.trim().split(':').collect();

        match fields[..] {
            ["drift"] => Ok(Self::default()),
            ["drift", runs, generations] => Ok(Self::NeutralDrift {
                runs: parse_count(runs)?,
                generations: parse_count(generations)?,
            }),
            ["fixed", n] => Ok(Self::Fixed(parse_count(n)?)),
            ["frequency", f] => f
                .parse::<f64>()
                .map(Self::Frequency)
                .map_err(|_| format!("Error: could not parse '{}' as a frequency", f)),
            _ => Err(format!("Error: unrecognized seeding strategy '{}'", value)),
        }
    }

    /// Gets the command-line form of the strategy, read back by [`SeedingStrategy::parse`]
    pub fn to_arg(&self) -> String {
        match self {
            Self::NeutralDrift { runs, generations } => format!("drift:{}:{}", runs, generations),
            Self::Fixed(count) => format!("fixed:{}", count),
            Self::Frequency(f) => format!("frequency:{}", f),
        }
    }

    pub fn short_description(&self) -> String {
        match self {
            Self::NeutralDrift { runs, generations } => format!("drift{}x{}", runs, generations),
            Self::Fixed(count) => format!("fixed{}", count),
            Self::Frequency(f) => format!("frequency{}", f),
        }
    }

    /// Samples the number of dominant alleles at locus A
    ///
    /// # Arguments:
    /// * `size` population size
    /// * `rng` random source of the population being seeded
    pub fn sample_starting_count<R: RandomSource + ?Sized>(&self, size: u64, rng: &mut R) -> Result<u64> {
        if size == 0 {
            return Err(DomainError::ZeroPopulationSize)
        }

        let count = match *self {
            Self::NeutralDrift { runs, generations } => {
                let parameters = SingleLocusParameters {
                    population_size: size,
                    selection_coefficient: 0.,
                    starting_frequency: 0.5,
                    generations,
                    runs,
                };
                let ensemble = run_many(&parameters, rng)?;

                let run = rng.index(runs);
                let generation = rng.index(generations);
                ensemble
                    .get(run, generation)
                    .map(|population| population.allele_count())
                    .ok_or(DomainError::ZeroCount("runs"))?
            },
            Self::Fixed(count) => count,
            Self::Frequency(f) => {
                if !(0. ..=1.).contains(&f) {
                    return Err(DomainError::FrequencyOutOfRange(f))
                }
                (f * size as f64).round() as u64
            },
        };

        if count > size {
            return Err(DomainError::AlleleCountOutOfRange { count, size })
        }
        Ok(count)
    }
}

fn parse_count<T: FromStr>(value: &str) -> std::result::Result<T, String> {
    value.parse::<T>().map_err(|_| format!("Error: could not parse '{}' as a non-negative integer", value))
}

impl TryFrom<String> for SeedingStrategy {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, String> {
        Self::parse(&value)
    }
}

impl From<SeedingStrategy> for String {
    fn from(strategy: SeedingStrategy) -> String {
        strategy.to_arg()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededSource;

    #[test]
    fn drift_seeding_stays_in_range() {
        let mut rng = SeededSource::from_seed(42);
        let strategy = SeedingStrategy::NeutralDrift { runs: 20, generations: 20 };
        for _ in 0..20 {
            let count = strategy.sample_starting_count(30, &mut rng).unwrap();
            assert!(count <= 30);
        }
    }

    #[test]
    fn drift_seeding_is_reproducible() {
        let strategy = SeedingStrategy::default();
        let a = strategy.sample_starting_count(50, &mut SeededSource::from_seed(8)).unwrap();
        let b = strategy.sample_starting_count(50, &mut SeededSource::from_seed(8)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn drift_seeding_rejects_empty_ensembles() {
        let strategy = SeedingStrategy::NeutralDrift { runs: 0, generations: 10 };
        let mut rng = SeededSource::from_seed(1);
        assert_eq!(strategy.sample_starting_count(10, &mut rng), Err(DomainError::ZeroCount("runs")));
    }

    #[test]
    fn fixed_and_frequency_strategies() {
        let mut rng = SeededSource::from_seed(1);
        assert_eq!(SeedingStrategy::Fixed(7).sample_starting_count(10, &mut rng), Ok(7));
        assert_eq!(SeedingStrategy::Frequency(0.25).sample_starting_count(40, &mut rng), Ok(10));
        assert_eq!(
            SeedingStrategy::Fixed(11).sample_starting_count(10, &mut rng),
            Err(DomainError::AlleleCountOutOfRange { count: 11, size: 10 })
        );
        assert!(SeedingStrategy::Frequency(1.5).sample_starting_count(10, &mut rng).is_err());
    }

    #[test]
    fn parses_command_line_strategies() {
        assert_eq!(SeedingStrategy::parse("drift"), Ok(SeedingStrategy::default()));
        assert_eq!(
            SeedingStrategy::parse("drift:10:20"),
            Ok(SeedingStrategy::NeutralDrift { runs: 10, generations: 20 })
        );
        assert_eq!(SeedingStrategy::parse("fixed:5"), Ok(SeedingStrategy::Fixed(5)));
        assert_eq!(SeedingStrategy::parse("frequency:0.3"), Ok(SeedingStrategy::Frequency(0.3)));
        assert!(SeedingStrategy::parse("uniform").is_err());
        assert!(SeedingStrategy::parse("fixed:x").is_err());
    }

    #[test]
    fn counts_must_be_non_negative_integers() {
        assert!(SeedingStrategy::parse("fixed:-3").is_err());
        assert!(SeedingStrategy::parse("drift:2.5:10").is_err());
        assert!(SeedingStrategy::parse("drift:10:-1").is_err());
        assert!(SeedingStrategy::parse("frequency:half").is_err());
    }

    #[test]
    fn argument_form_is_read_back() {
        for strategy in [
            SeedingStrategy::default(),
            SeedingStrategy::NeutralDrift { runs: 3, generations: 7 },
            SeedingStrategy::Fixed(12),
            SeedingStrategy::Frequency(0.35),
        ] {
            assert_eq!(SeedingStrategy::parse(&strategy.to_arg()), Ok(strategy));
        }
        assert_eq!(SeedingStrategy::default().to_arg(), "drift:100:100");
    }
}

//! Error types for the simulation engines

use std::{error, fmt};

/// Invalid parameter combination detected by one of the engines.
///
/// These errors are deterministic given the parameters, so they are always
/// returned to the caller and never retried or clamped.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Population size must be positive
    ZeroPopulationSize,

    /// An allele count outside `[0, size]`
    AlleleCountOutOfRange { count: u64, size: u64 },

    /// A starting frequency outside `[0, 1]` (or not finite)
    FrequencyOutOfRange(f64),

    /// The selection-adjusted sampling probability left `[0, 1]`
    ProbabilityOutOfRange(f64),

    /// Selection-adjusted haplotype weights summed to a non-positive value
    NonPositiveNormalization(f64),

    /// A recombination rate outside `[0, 1]`
    InvalidRecombinationRate(f64),

    /// The requested singleton layout produces a negative haplotype count
    InvalidHaplotypeLayout { size: u64, quant_a: u64, singleton: &'static str },

    /// A run, generation or replicate count of zero where a positive value is required
    ZeroCount(&'static str),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPopulationSize => write!(f, "population size must be positive"),
            Self::AlleleCountOutOfRange { count, size } => {
                write!(f, "allele count {count} outside [0, {size}]")
            }
            Self::FrequencyOutOfRange(p) => write!(f, "frequency {p} outside [0, 1]"),
            Self::ProbabilityOutOfRange(p) => {
                write!(f, "selection-adjusted sampling probability {p} outside [0, 1]")
            }
            Self::NonPositiveNormalization(sum) => write!(
                f,
                "selection-adjusted haplotype weights sum to {sum}; the selection coefficient is too large for the haplotype frequencies"
            ),
            Self::InvalidRecombinationRate(r) => {
                write!(f, "recombination rate {r} outside [0, 1]")
            }
            Self::InvalidHaplotypeLayout { size, quant_a, singleton } => write!(
                f,
                "cannot place singleton {singleton} with {quant_a} copies of A in a population of {size}"
            ),
            Self::ZeroCount(what) => write!(f, "number of {what} must be positive"),
        }
    }
}

impl error::Error for DomainError {}

/// Shorthand for results carrying a [`DomainError`]
pub type Result<T> = std::result::Result<T, DomainError>;

//! Library module containing all modules required by the program
//!
//! Stochastic Wright-Fisher simulation of allele and haplotype frequency
//! trajectories under drift, selection and, for two loci, recombination.

pub mod errors;
pub mod random;
pub mod population;
pub mod ensemble;
pub mod seeder;
pub mod haplotype;
pub mod termination;
pub mod two_locus;
pub mod model;

pub use errors::DomainError;
pub use random::{RandomSource, SeededSource};
pub use population::{Population, Trajectory};
pub use ensemble::{Ensemble, FailurePolicy, SingleLocusParameters};
pub use seeder::SeedingStrategy;
pub use haplotype::{Haplotype, HaplotypeMap};
pub use termination::{Cancellation, Termination};
pub use two_locus::{HaplotypePopulation, TwoLocusParameters, TwoLocusRun};
pub use model::SimulationModel;

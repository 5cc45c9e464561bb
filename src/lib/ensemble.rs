//! Ensemble module
//!
//! Runs many independent single-locus lineages with the same parameters.
//! Every run gets its own random source, seeded from the caller's source
//! before any run starts, so the result does not depend on how rayon
//! schedules the runs.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, Result};
use crate::population::{simulate_time_points, Population, Trajectory};
use crate::random::{RandomSource, SeededSource};

/// Parameters shared by all the runs of an ensemble
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SingleLocusParameters {
    pub population_size: u64,
    pub selection_coefficient: f64,
    pub starting_frequency: f64,
    pub generations: usize,
    pub runs: usize,
}

impl SingleLocusParameters {
    /// Checks the parameters before any run is started
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(DomainError::ZeroCount("runs"))
        }
        if self.generations == 0 {
            return Err(DomainError::ZeroCount("generations"))
        }
        Population::new(self.population_size, self.selection_coefficient, self.starting_frequency)?
            .sampling_probability()?;
        Ok(())
    }
}

/// What to do with a run whose generation step failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Abandon the whole ensemble and return the first error (in run order)
    Abort,
    /// Drop the failed runs and count them in [`Ensemble::skipped`]
    Skip,
}

/// Set of independent trajectories, run-major then generation-minor
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ensemble {
    parameters: SingleLocusParameters,
    trajectories: Vec<Trajectory>,
    skipped: usize,
}

/// Statistics of an ensemble at one generation
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub mean_frequency: f64,
    pub variance_frequency: f64,
    pub fraction_fixed: f64,
    pub fraction_lost: f64,
}

impl Ensemble {
    pub fn parameters(&self) -> &SingleLocusParameters {
        &self.parameters
    }

    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    /// Number of runs dropped under [`FailurePolicy::Skip`]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of completed runs
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Gets the snapshot of run `run` at generation `generation`
    ///
    /// # Arguments:
    /// * `run` run index
    /// * `generation` generation index
    pub fn get(&self, run: usize, generation: usize) -> Option<&Population> {
        self.trajectories.get(run)?.get(generation)
    }

    /// Summarises the ensemble at every generation
    pub fn summary(&self) -> Vec<GenerationSummary> {
        if self.trajectories.is_empty() {
            return vec![]
        }

        let n = self.trajectories.len() as f64;
        (0..self.parameters.generations)
            .map(|t| {
                let frequencies: Vec<f64> = self.trajectories.iter().map(|run| run[t].frequency()).collect();
                let mean = frequencies.iter().sum::<f64>() / n;
                let mean2 = frequencies.iter().map(|f| f * f).sum::<f64>() / n;
                let fixed = self.trajectories.iter().filter(|run| run[t].is_fixed()).count();
                let lost = self.trajectories.iter().filter(|run| run[t].is_lost()).count();

                GenerationSummary {
                    generation: t,
                    mean_frequency: mean,
                    variance_frequency: mean2 - mean * mean,
                    fraction_fixed: fixed as f64 / n,
                    fraction_lost: lost as f64 / n,
                }
            })
            .collect()
    }
}

/// Runs the ensemble, abandoning it at the first failed run
///
/// # Arguments:
/// * `parameters` ensemble parameters
/// * `rng` parent random source, one seed is drawn from it per run
pub fn run_many<R: RandomSource + ?Sized>(parameters: &SingleLocusParameters, rng: &mut R) -> Result<Ensemble> {
    run_many_with_policy(parameters, FailurePolicy::Abort, rng)
}

/// Runs the ensemble with an explicit policy for failed runs
///
/// # Arguments:
/// * `parameters` ensemble parameters
/// * `policy` what to do with failed runs
/// * `rng` parent random source, one seed is drawn from it per run
pub fn run_many_with_policy<R: RandomSource + ?Sized>(parameters: &SingleLocusParameters, policy: FailurePolicy, rng: &mut R) -> Result<Ensemble> {
    if parameters.runs == 0 {
        return Err(DomainError::ZeroCount("runs"))
    }

    let seeds: Vec<u64> = (0..parameters.runs).map(|_| rng.next_seed()).collect();

    let results: Vec<Result<Trajectory>> = seeds
        .into_par_iter()
        .map(|seed| {
            let mut local_rng = SeededSource::from_seed(seed);
            let initial = Population::new(
                parameters.population_size,
                parameters.selection_coefficient,
                parameters.starting_frequency,
            )?;
            simulate_time_points(initial, parameters.generations, &mut local_rng)
        })
        .collect();

    let mut trajectories = Vec::with_capacity(results.len());
    let mut skipped = 0;
    for result in results {
        match (result, policy) {
            (Ok(trajectory), _)            => trajectories.push(trajectory),
            (Err(e), FailurePolicy::Abort) => return Err(e),
            (Err(_), FailurePolicy::Skip)  => skipped += 1,
        }
    }

    Ok(Ensemble {
        parameters: parameters.clone(),
        trajectories,
        skipped,
    })
}

//! Run termination module

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use serde::Serialize;

use crate::errors::{DomainError, Result};
use crate::two_locus::HaplotypePopulation;

/// Reason a two-locus run stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// One of the loci reached frequency 0 or 1
    Fixed,
    /// The maximum generation was reached before any fixation
    GenerationCap,
    /// The run was cancelled or timed out at a generation boundary
    Cancelled,
}

impl Termination {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fixed         => "fixed",
            Self::GenerationCap => "generation_cap",
            Self::Cancelled     => "cancelled",
        }
    }
}

/// Cooperative cancellation signal, checked once per generation
///
/// Clones share the same flag, so one handle can be given to the run and
/// another kept by whoever wants to stop it.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Creates a signal that only fires when [`Cancellation::cancel`] is called
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a signal that also fires once `timeout` has elapsed
    ///
    /// # Arguments:
    /// * `timeout` time allowed from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Requests cancellation of every run holding this signal
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Checks if cancellation was requested or the deadline passed
    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None           => false,
        }
    }
}

/// End conditions of a two-locus run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StopRule {
    max_generations: usize,
}

impl StopRule {
    /// Creates the stop rule of a run
    ///
    /// # Arguments:
    /// * `max_generations` last generation to simulate, must be positive
    pub fn new(max_generations: usize) -> Result<Self> {
        if max_generations == 0 {
            return Err(DomainError::ZeroCount("generations"))
        }
        Ok(Self { max_generations })
    }

    pub fn max_generations(&self) -> usize {
        self.max_generations
    }

    /// Checks if the run finished after producing `population`, returning the reason
    ///
    /// Fixation is checked before the cap, so a run that fixes exactly at the
    /// last generation reports [`Termination::Fixed`].
    ///
    /// # Arguments:
    /// * `population` latest generation of the run
    pub fn finished(&self, population: &HaplotypePopulation) -> Option<Termination> {
        if population.is_fixed() {
            Some(Termination::Fixed)
        } else if population.generation() >= self.max_generations {
            Some(Termination::GenerationCap)
        } else {
            None
        }
    }
}

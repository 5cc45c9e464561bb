//! Two-locus population module
//!
//! A [`HaplotypePopulation`] is one immutable generation of a haploid
//! population with two biallelic loci. A single individual carries a novel
//! mutation at locus B (the singleton) and selection acts on locus B only,
//! favouring the allele the singleton carries. Every generation each
//! individual is drawn from the selection-adjusted haplotype distribution of
//! the previous generation and may then recombine, in which case one of its
//! loci is redrawn from the previous generation's allele frequency at that
//! locus.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, Result};
use crate::termination::{Cancellation, StopRule, Termination};
use crate::haplotype::{Haplotype, HaplotypeMap};
use crate::random::{RandomSource, SeededSource};
use crate::seeder::SeedingStrategy;

/// Maximum number of generations of a two-locus run unless stated otherwise
pub const DEFAULT_MAX_GENERATIONS: usize = 100;

fn default_max_generations() -> usize {
    DEFAULT_MAX_GENERATIONS
}

/// Parameters of a two-locus run
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TwoLocusParameters {
    pub population_size: u64,
    pub selection_coefficient: f64,
    /// Recombination threshold: an individual recombines when its uniform
    /// draw is greater than or equal to this value, so `1.0` never recombines
    /// and `0.0` always does
    pub recombination_rate: f64,
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    #[serde(default)]
    pub seeding: SeedingStrategy,
}

impl TwoLocusParameters {
    /// Creates parameters with the default generation cap and seeding strategy
    ///
    /// # Arguments:
    /// * `population_size` population size
    /// * `selection_coefficient` selective advantage of the singleton's allele at locus B
    /// * `recombination_rate` recombination threshold
    pub fn new(population_size: u64, selection_coefficient: f64, recombination_rate: f64) -> Self {
        Self {
            population_size,
            selection_coefficient,
            recombination_rate,
            max_generations: DEFAULT_MAX_GENERATIONS,
            seeding: SeedingStrategy::default(),
        }
    }

    /// Checks the parameters that do not depend on the random seeding
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(DomainError::ZeroPopulationSize)
        }
        if !(0. ..=1.).contains(&self.recombination_rate) {
            return Err(DomainError::InvalidRecombinationRate(self.recombination_rate))
        }
        if self.max_generations == 0 {
            return Err(DomainError::ZeroCount("generations"))
        }
        Ok(())
    }
}

/// One generation of a two-locus population
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HaplotypePopulation {
    size: u64,
    generation: usize,
    haplotype_counts: HaplotypeMap<u64>,
    selection_coefficient: f64,
    recombination_rate: f64,
    singleton: Haplotype,
    selection_probabilities: HaplotypeMap<f64>,
}

impl HaplotypePopulation {
    /// Creates the generation 0 population of a new run
    ///
    /// The number of `A` alleles is drawn with the seeding strategy and the
    /// singleton is drawn uniformly among the haplotypes that can be placed
    /// next to that many `A` alleles.
    ///
    /// # Arguments:
    /// * `parameters` run parameters
    /// * `rng` random source of this run
    pub fn initialize<R: RandomSource + ?Sized>(parameters: &TwoLocusParameters, rng: &mut R) -> Result<Self> {
        parameters.validate()?;

        let size = parameters.population_size;
        let quant_a = parameters.seeding.sample_starting_count(size, rng)?;

        let candidates: Vec<Haplotype> = Haplotype::ALL
            .iter()
            .copied()
            .filter(|&singleton| haplotype_layout(size, quant_a, singleton).is_ok())
            .collect();
        let singleton = candidates[rng.index(candidates.len())];

        Self::initialize_with(size, parameters.selection_coefficient, parameters.recombination_rate, quant_a, singleton)
    }

    /// Creates a generation 0 population from an explicit layout
    ///
    /// One individual carries `singleton`, every other individual carries the
    /// opposite allele at locus B, and `quant_a` individuals in total carry `A`.
    ///
    /// # Arguments:
    /// * `size` population size
    /// * `selection_coefficient` selective advantage of the singleton's allele at locus B
    /// * `recombination_rate` recombination threshold
    /// * `quant_a` number of `A` alleles
    /// * `singleton` haplotype carrying the novel mutation
    pub fn initialize_with(size: u64, selection_coefficient: f64, recombination_rate: f64, quant_a: u64, singleton: Haplotype) -> Result<Self> {
        if size == 0 {
            return Err(DomainError::ZeroPopulationSize)
        }
        if !(0. ..=1.).contains(&recombination_rate) {
            return Err(DomainError::InvalidRecombinationRate(recombination_rate))
        }

        let mut population = Self {
            size,
            generation: 0,
            haplotype_counts: haplotype_layout(size, quant_a, singleton)?,
            selection_coefficient,
            recombination_rate,
            singleton,
            selection_probabilities: HaplotypeMap::splat(0.),
        };
        // generation 0 has no predecessor and uses its own counts
        population.selection_probabilities = population.selection_probabilities()?;
        Ok(population)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn haplotype_counts(&self) -> &HaplotypeMap<u64> {
        &self.haplotype_counts
    }

    pub fn selection_coefficient(&self) -> f64 {
        self.selection_coefficient
    }

    pub fn recombination_rate(&self) -> f64 {
        self.recombination_rate
    }

    pub fn singleton(&self) -> Haplotype {
        self.singleton
    }

    /// Probabilities this generation was sampled with, computed from the
    /// previous generation (or from itself for generation 0)
    pub fn sampling_probabilities(&self) -> &HaplotypeMap<f64> {
        &self.selection_probabilities
    }

    /// Current number of copies of the singleton haplotype
    pub fn singleton_count(&self) -> u64 {
        self.haplotype_counts[self.singleton]
    }

    /// Current frequency of the singleton haplotype
    pub fn singleton_frequency(&self) -> f64 {
        self.singleton_count() as f64 / self.size as f64
    }

    /// Frequencies of the dominant alleles `A` and `B`
    pub fn allele_frequencies(&self) -> (f64, f64) {
        let c = &self.haplotype_counts;
        let size = self.size as f64;
        (
            (c[Haplotype::AB] + c[Haplotype::Ab]) as f64 / size,
            (c[Haplotype::AB] + c[Haplotype::aB]) as f64 / size,
        )
    }

    /// Linkage disequilibrium `D = f(AB) f(ab) - f(Ab) f(aB)`
    pub fn linkage_disequilibrium(&self) -> f64 {
        let f = self.haplotype_counts.map(|_, count| count as f64 / self.size as f64);
        f[Haplotype::AB] * f[Haplotype::ab] - f[Haplotype::Ab] * f[Haplotype::aB]
    }

    /// Checks if either locus is fixed or lost
    pub fn is_fixed(&self) -> bool {
        let (freq_a, freq_b) = self.allele_frequencies();
        freq_a == 0. || freq_a == 1. || freq_b == 0. || freq_b == 1.
    }

    /// Selection-adjusted haplotype probabilities computed from this
    /// generation's counts
    ///
    /// The selection coefficient is added to the frequency of every haplotype
    /// carrying the singleton's allele at locus B and subtracted from the
    /// others, then the weights are normalised. Haplotypes absent from the
    /// population keep weight zero and adjusted weights are floored at zero.
    pub fn selection_probabilities(&self) -> Result<HaplotypeMap<f64>> {
        let favoured_b = self.singleton.dominant_b();
        let size = self.size as f64;
        let s = self.selection_coefficient;

        let weights = self.haplotype_counts.map(|haplotype, count| {
            if count == 0 {
                return 0.
            }
            let frequency = count as f64 / size;
            let adjusted = if haplotype.dominant_b() == favoured_b { frequency + s } else { frequency - s };
            adjusted.max(0.)
        });

        let sum: f64 = weights.values().iter().sum();
        if !(sum > 0.) || !sum.is_finite() {
            return Err(DomainError::NonPositiveNormalization(sum))
        }
        Ok(weights.map(|_, w| w / sum))
    }

    /// Executes a generation of selection, reproduction and recombination
    /// and returns the next generation
    ///
    /// # Arguments:
    /// * `rng` random source of this run
    pub fn next_generation<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<HaplotypePopulation> {
        let selection_probabilities = self.selection_probabilities()?;
        let (freq_a, freq_b) = self.allele_frequencies();

        let mut haplotype_counts = HaplotypeMap::splat(0u64);
        for _ in 0..self.size {
            let drawn = select_haplotype(&selection_probabilities, rng.open_uniform());

            let haplotype = if rng.uniform() >= self.recombination_rate {
                recombine(drawn, freq_a, freq_b, rng)
            } else {
                drawn
            };
            haplotype_counts[haplotype] += 1;
        }

        Ok(HaplotypePopulation {
            generation: self.generation + 1,
            haplotype_counts,
            selection_probabilities,
            ..self.clone()
        })
    }
}

/// Initial haplotype counts for a singleton placed next to `quant_a` copies of `A`
///
/// # Arguments:
/// * `size` population size
/// * `quant_a` number of `A` alleles, the singleton included
/// * `singleton` haplotype carrying the novel mutation
pub fn haplotype_layout(size: u64, quant_a: u64, singleton: Haplotype) -> Result<HaplotypeMap<u64>> {
    let invalid = DomainError::InvalidHaplotypeLayout { size, quant_a, singleton: singleton.label() };
    if quant_a > size {
        return Err(DomainError::AlleleCountOutOfRange { count: quant_a, size })
    }

    // every other individual carries the opposite allele at locus B
    let background_b = !singleton.dominant_b();
    let (background_upper_a, background_lower_a) = if singleton.dominant_a() {
        (quant_a.checked_sub(1).ok_or(invalid)?, size - quant_a)
    } else {
        (quant_a, (size - quant_a).checked_sub(1).ok_or(invalid)?)
    };

    let mut counts = HaplotypeMap::splat(0u64);
    counts[singleton] = 1;
    counts[Haplotype::from_alleles(true, background_b)] = background_upper_a;
    counts[Haplotype::from_alleles(false, background_b)] = background_lower_a;
    Ok(counts)
}

/// Picks a haplotype by inverse-CDF selection over AB, aB, Ab, ab
///
/// Returns the first haplotype whose cumulative upper bound is greater than
/// or equal to `draw`. A draw above the accumulated total (rounding) falls to
/// the last haplotype with positive probability.
///
/// # Arguments:
/// * `probabilities` haplotype probabilities
/// * `draw` uniform draw in (0, 1)
pub fn select_haplotype(probabilities: &HaplotypeMap<f64>, draw: f64) -> Haplotype {
    let mut upper = 0.;
    let mut last_positive = Haplotype::ab;
    for (haplotype, &p) in probabilities.iter() {
        if p > 0. {
            upper += p;
            last_positive = haplotype;
            if draw <= upper {
                return haplotype
            }
        }
    }
    last_positive
}

/// Redraws one locus of `haplotype`, chosen uniformly, from the allele
/// frequency at that locus
///
/// # Arguments:
/// * `haplotype` haplotype drawn for the individual
/// * `freq_a` frequency of `A` in the previous generation
/// * `freq_b` frequency of `B` in the previous generation
/// * `rng` random source of this run
pub fn recombine<R: RandomSource + ?Sized>(haplotype: Haplotype, freq_a: f64, freq_b: f64, rng: &mut R) -> Haplotype {
    if rng.index(2) == 0 {
        haplotype.with_b(rng.uniform() < freq_b)
    } else {
        haplotype.with_a(rng.uniform() < freq_a)
    }
}

/// Generations of a two-locus run and the reason it stopped
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TwoLocusRun {
    generations: Vec<HaplotypePopulation>,
    termination: Termination,
}

impl TwoLocusRun {
    /// Every generation, generation 0 first
    pub fn generations(&self) -> &[HaplotypePopulation] {
        &self.generations
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Last generation produced
    pub fn final_population(&self) -> &HaplotypePopulation {
        // a run always holds at least generation 0
        &self.generations[self.generations.len() - 1]
    }

    /// Generation at which a locus fixed, if it did
    pub fn fixation_generation(&self) -> Option<usize> {
        match self.termination {
            Termination::Fixed => Some(self.final_population().generation()),
            _ => None,
        }
    }
}

/// Simulates a two-locus population until a locus fixes or the generation
/// cap is reached
///
/// At least one generation is always simulated. Both stop conditions are
/// checked after every generation, and the cancellation signal before every
/// generation; a cancelled run keeps the generations completed so far.
///
/// # Arguments:
/// * `parameters` run parameters
/// * `rng` random source of this run
/// * `cancellation` cancellation signal
pub fn simulate<R: RandomSource + ?Sized>(parameters: &TwoLocusParameters, rng: &mut R, cancellation: &Cancellation) -> Result<TwoLocusRun> {
    let initial = HaplotypePopulation::initialize(parameters, rng)?;
    simulate_from(initial, parameters.max_generations, rng, cancellation)
}

/// Simulates from a given generation 0, see [`simulate`]
///
/// # Arguments:
/// * `initial` generation 0
/// * `max_generations` generation cap
/// * `rng` random source of this run
/// * `cancellation` cancellation signal
pub fn simulate_from<R: RandomSource + ?Sized>(initial: HaplotypePopulation, max_generations: usize, rng: &mut R, cancellation: &Cancellation) -> Result<TwoLocusRun> {
    let stop = StopRule::new(max_generations)?;
    let mut generations = vec![initial];

    let termination = loop {
        if cancellation.is_cancelled() {
            break Termination::Cancelled
        }

        let next = generations[generations.len() - 1].next_generation(rng)?;
        let finished = stop.finished(&next);
        generations.push(next);

        if let Some(termination) = finished {
            break termination
        }
    };

    Ok(TwoLocusRun { generations, termination })
}

/// Runs independent two-locus simulations in parallel
///
/// One seed per replicate is drawn from `rng` before any replicate starts.
/// A failed replicate aborts the whole batch.
///
/// # Arguments:
/// * `parameters` run parameters
/// * `replicates` number of runs
/// * `rng` parent random source
/// * `cancellation` cancellation signal shared by all the runs
pub fn simulate_replicates<R: RandomSource + ?Sized>(parameters: &TwoLocusParameters, replicates: usize, rng: &mut R, cancellation: &Cancellation) -> Result<Vec<TwoLocusRun>> {
    if replicates == 0 {
        return Err(DomainError::ZeroCount("replicates"))
    }
    parameters.validate()?;

    let seeds: Vec<u64> = (0..replicates).map(|_| rng.next_seed()).collect();
    seeds
        .into_par_iter()
        .map(|seed| simulate(parameters, &mut SeededSource::from_seed(seed), cancellation))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn counts(population: &HaplotypePopulation) -> [u64; 4] {
        *population.haplotype_counts().values()
    }

    #[test]
    fn layouts_place_exactly_one_singleton() {
        let size = 20;
        let quant_a = 8;
        assert_eq!(haplotype_layout(size, quant_a, Haplotype::AB).unwrap().values(), &[1, 0, 7, 12]);
        assert_eq!(haplotype_layout(size, quant_a, Haplotype::aB).unwrap().values(), &[0, 1, 8, 11]);
        assert_eq!(haplotype_layout(size, quant_a, Haplotype::Ab).unwrap().values(), &[7, 12, 1, 0]);
        assert_eq!(haplotype_layout(size, quant_a, Haplotype::ab).unwrap().values(), &[8, 11, 0, 1]);
    }

    #[test]
    fn impossible_layouts_are_rejected() {
        assert!(haplotype_layout(10, 0, Haplotype::AB).is_err());
        assert!(haplotype_layout(10, 0, Haplotype::Ab).is_err());
        assert!(haplotype_layout(10, 10, Haplotype::aB).is_err());
        assert!(haplotype_layout(10, 10, Haplotype::ab).is_err());
        assert!(haplotype_layout(10, 11, Haplotype::AB).is_err());
        assert!(haplotype_layout(10, 0, Haplotype::aB).is_ok());
        assert!(haplotype_layout(10, 10, Haplotype::AB).is_ok());
    }

    #[test]
    fn initialize_with_is_deterministic() {
        for singleton in Haplotype::ALL {
            let a = HaplotypePopulation::initialize_with(30, 0., 0.5, 12, singleton).unwrap();
            let b = HaplotypePopulation::initialize_with(30, 0., 0.5, 12, singleton).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.singleton_count(), 1);
            assert_eq!(counts(&a).iter().sum::<u64>(), 30);
            assert_eq!(a.generation(), 0);
        }
    }

    #[test]
    fn invalid_recombination_rate_is_rejected() {
        assert_eq!(
            HaplotypePopulation::initialize_with(10, 0., 1.5, 5, Haplotype::AB),
            Err(DomainError::InvalidRecombinationRate(1.5))
        );
        let mut parameters = TwoLocusParameters::new(10, 0., -0.1);
        assert!(parameters.validate().is_err());
        parameters.recombination_rate = 0.5;
        parameters.max_generations = 0;
        assert_eq!(parameters.validate(), Err(DomainError::ZeroCount("generations")));
    }

    #[test]
    fn neutral_selection_probabilities_are_the_frequencies() {
        let population = HaplotypePopulation::initialize_with(20, 0., 0.5, 8, Haplotype::AB).unwrap();
        let p = population.selection_probabilities().unwrap();
        assert!((p[Haplotype::AB] - 0.05).abs() < 1e-12);
        assert_eq!(p[Haplotype::aB], 0.);
        assert!((p[Haplotype::Ab] - 0.35).abs() < 1e-12);
        assert!((p[Haplotype::ab] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn selection_favours_the_singleton_allele() {
        // counts 1, 0, 7, 12 with B favoured: weights 0.15, 0, 0.25, 0.5
        let population = HaplotypePopulation::initialize_with(20, 0.1, 0.5, 8, Haplotype::AB).unwrap();
        let p = population.selection_probabilities().unwrap();
        assert!((p[Haplotype::AB] - 0.15 / 0.9).abs() < 1e-12);
        assert_eq!(p[Haplotype::aB], 0.);
        assert!((p[Haplotype::Ab] - 0.25 / 0.9).abs() < 1e-12);
        assert!((p[Haplotype::ab] - 0.5 / 0.9).abs() < 1e-12);

        // singleton b: the b haplotypes gain
        let population = HaplotypePopulation::initialize_with(20, 0.1, 0.5, 8, Haplotype::ab).unwrap();
        let p = population.selection_probabilities().unwrap();
        assert!(p[Haplotype::ab] > 0.05);
    }

    #[test]
    fn selection_probabilities_form_a_simplex() {
        for &s in &[0., 0.01, 0.1, -0.05, 0.3] {
            for singleton in Haplotype::ALL {
                let population = HaplotypePopulation::initialize_with(40, s, 0.5, 17, singleton).unwrap();
                let p = population.selection_probabilities().unwrap();
                assert!((p.values().iter().sum::<f64>() - 1.).abs() < 1e-9);
                assert!(p.values().iter().all(|&x| x >= 0.));
            }
        }
    }

    #[test]
    fn overwhelming_selection_is_an_error() {
        // B lost while selection favours it: every remaining weight drops below zero
        let population = HaplotypePopulation::initialize_with(4, 0., 0.5, 2, Haplotype::AB).unwrap();
        let extreme = HaplotypePopulation {
            haplotype_counts: HaplotypeMap::new([0, 0, 2, 2]),
            selection_coefficient: 1.,
            ..population
        };
        assert!(matches!(extreme.selection_probabilities(), Err(DomainError::NonPositiveNormalization(_))));
    }

    #[test]
    fn inverse_cdf_takes_the_first_bucket() {
        let p = HaplotypeMap::new([0.25, 0.25, 0.25, 0.25]);
        assert_eq!(select_haplotype(&p, 0.1), Haplotype::AB);
        assert_eq!(select_haplotype(&p, 0.25), Haplotype::AB);
        assert_eq!(select_haplotype(&p, 0.26), Haplotype::aB);
        assert_eq!(select_haplotype(&p, 0.75), Haplotype::Ab);
        assert_eq!(select_haplotype(&p, 0.999), Haplotype::ab);

        let p = HaplotypeMap::new([0., 0.5, 0.5, 0.]);
        assert_eq!(select_haplotype(&p, 1e-12), Haplotype::aB);
        assert_eq!(select_haplotype(&p, 1. - 1e-16), Haplotype::Ab);
        assert_eq!(select_haplotype(&HaplotypeMap::new([0.3, 0.3, 0.3, 0.]), 0.95), Haplotype::Ab);
    }

    #[test]
    fn counts_always_sum_to_the_size() {
        let mut rng = SeededSource::from_seed(42);
        let mut population = HaplotypePopulation::initialize_with(60, 0.05, 0.3, 25, Haplotype::aB).unwrap();
        for t in 1..=30 {
            population = population.next_generation(&mut rng).unwrap();
            assert_eq!(population.generation(), t);
            assert_eq!(counts(&population).iter().sum::<u64>(), 60);
            let p = population.sampling_probabilities();
            assert!((p.values().iter().sum::<f64>() - 1.).abs() < 1e-9);
        }
    }

    #[test]
    fn successor_carries_the_lineage_fields() {
        let mut rng = SeededSource::from_seed(3);
        let population = HaplotypePopulation::initialize_with(30, 0.02, 0.4, 10, Haplotype::Ab).unwrap();
        let next = population.next_generation(&mut rng).unwrap();
        assert_eq!(next.size(), 30);
        assert_eq!(next.singleton(), Haplotype::Ab);
        assert_eq!(next.selection_coefficient(), 0.02);
        assert_eq!(next.recombination_rate(), 0.4);
        assert_eq!(next.sampling_probabilities(), &population.selection_probabilities().unwrap());
    }

    #[test]
    fn fixation_detection() {
        let fixed_a = HaplotypePopulation::initialize_with(10, 0., 0.5, 10, Haplotype::AB).unwrap();
        assert!(fixed_a.is_fixed());
        assert_eq!(fixed_a.allele_frequencies(), (1., 0.1));

        let segregating = HaplotypePopulation::initialize_with(10, 0., 0.5, 5, Haplotype::AB).unwrap();
        assert!(!segregating.is_fixed());
    }

    #[test]
    fn linkage_disequilibrium_of_the_initial_layout() {
        // counts 1, 0, 7, 12 out of 20
        let population = HaplotypePopulation::initialize_with(20, 0., 0.5, 8, Haplotype::AB).unwrap();
        let expected = 0.05 * 0.6 - 0.35 * 0.;
        assert!((population.linkage_disequilibrium() - expected).abs() < 1e-12);
    }

    #[test]
    fn simulate_stops_at_fixation_or_cap() {
        let mut rng = SeededSource::from_seed(7);
        let parameters = TwoLocusParameters::new(40, 0.01, 0.5);
        for _ in 0..10 {
            let run = simulate(&parameters, &mut rng, &Cancellation::new()).unwrap();
            let last = run.final_population();
            assert!(run.generations().len() >= 2);
            assert!(last.generation() <= parameters.max_generations);
            match run.termination() {
                Termination::Fixed => {
                    assert!(last.is_fixed());
                    assert_eq!(run.fixation_generation(), Some(last.generation()));
                    assert!(run.generations()[1..run.generations().len() - 1].iter().all(|p| !p.is_fixed()));
                },
                Termination::GenerationCap => assert_eq!(last.generation(), parameters.max_generations),
                Termination::Cancelled => panic!("run was never cancelled"),
            }
        }
    }

    #[test]
    fn cancelled_runs_keep_completed_generations() {
        let mut rng = SeededSource::from_seed(7);
        let cancellation = Cancellation::new();
        cancellation.cancel();
        let run = simulate(&TwoLocusParameters::new(40, 0., 0.5), &mut rng, &cancellation).unwrap();
        assert_eq!(run.termination(), Termination::Cancelled);
        assert_eq!(run.generations().len(), 1);
        assert_eq!(run.fixation_generation(), None);
    }

    #[test]
    fn replicates_are_reproducible() {
        let mut parameters = TwoLocusParameters::new(30, 0.02, 0.5);
        parameters.seeding = SeedingStrategy::NeutralDrift { runs: 10, generations: 10 };
        let a = simulate_replicates(&parameters, 4, &mut SeededSource::from_seed(5), &Cancellation::new()).unwrap();
        let b = simulate_replicates(&parameters, 4, &mut SeededSource::from_seed(5), &Cancellation::new()).unwrap();
        assert_eq!(a.len(), 4);
        assert_eq!(a, b);
        assert!(simulate_replicates(&parameters, 0, &mut SeededSource::from_seed(5), &Cancellation::new()).is_err());
    }
}

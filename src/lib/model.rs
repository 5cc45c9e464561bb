//! Simulation model module

use serde::{Deserialize, Serialize};
use clap::{Command, Arg, ArgMatches, value_parser, ValueHint};
use std::{fs, path::Path};

use crate::ensemble::SingleLocusParameters;
use crate::errors::{DomainError, Result};
use crate::seeder::SeedingStrategy;
use crate::two_locus::{TwoLocusParameters, DEFAULT_MAX_GENERATIONS};

/// Two-locus runs sharing every parameter but the recombination rate
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TwoLocusBatch {
    pub population_size: u64,
    pub selection_coefficient: f64,
    pub recombination_rates: Vec<f64>,
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    #[serde(default = "default_replicates")]
    pub replicates: usize,
    #[serde(default)]
    pub seeding: SeedingStrategy,
}

fn default_max_generations() -> usize {
    DEFAULT_MAX_GENERATIONS
}

fn default_replicates() -> usize {
    1
}

impl TwoLocusBatch {
    /// Gets the run parameters for each recombination rate, in the order given
    pub fn parameters(&self) -> Vec<TwoLocusParameters> {
        self.recombination_rates
            .iter()
            .map(|&recombination_rate| TwoLocusParameters {
                population_size: self.population_size,
                selection_coefficient: self.selection_coefficient,
                recombination_rate,
                max_generations: self.max_generations,
                seeding: self.seeding.clone(),
            })
            .collect()
    }
}

/// Stores the information about a simulation model and its parameters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SimulationModel {
    SingleLocus(SingleLocusParameters),
    TwoLocus(TwoLocusBatch),
}

impl SimulationModel {
    /// Gets a long description of the simulation model
    pub fn long_description(&self) -> String {
        match self {
            Self::SingleLocus(p) => format!(
                "Single-locus Wright-Fisher model\npopulation size: {}\nselection coefficient: {}\nstarting frequency: {}\ngenerations: {}\nruns: {}",
                p.population_size, p.selection_coefficient, p.starting_frequency, p.generations, p.runs
            ),
            Self::TwoLocus(b) => format!(
                "Two-locus Wright-Fisher model with recombination\npopulation size: {}\nselection coefficient: {}\nrecombination rates: {:?}\nmaximum generation: {}\nreplicates: {}\nseeding: {}",
                b.population_size, b.selection_coefficient, b.recombination_rates, b.max_generations, b.replicates, b.seeding.short_description()
            ),
        }
    }

    /// Gets a short description of the simulation model, containing no whitespace. Useful for
    /// inclusion, e.g., in a file name.
    pub fn short_description(&self) -> String {
        match self {
            Self::SingleLocus(p) => format!(
                "single_N{}_s{}_f{}_G{}", p.population_size, p.selection_coefficient, p.starting_frequency, p.generations
            ),
            Self::TwoLocus(b) => format!(
                "twolocus_N{}_s{}_T{}", b.population_size, b.selection_coefficient, b.max_generations
            ),
        }
    }

    /// Gets the name of the model, as used for the subcommands
    pub fn name(&self) -> String {
        match self {
            Self::SingleLocus(_) => "single",
            Self::TwoLocus(_)    => "two-locus",
        }.to_string()
    }

    /// Gets the population size of the model
    pub fn population_size(&self) -> u64 {
        match self {
            Self::SingleLocus(p) => p.population_size,
            Self::TwoLocus(b)    => b.population_size,
        }
    }

    /// Checks the model parameters before any simulation starts
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::SingleLocus(p) => p.validate(),
            Self::TwoLocus(b) => {
                if b.recombination_rates.is_empty() {
                    return Err(DomainError::ZeroCount("recombination rates"))
                }
                if b.replicates == 0 {
                    return Err(DomainError::ZeroCount("replicates"))
                }
                b.parameters().iter().try_for_each(|p| p.validate())
            },
        }
    }

    /// Gets the clap subcommands that allow the user to input the model information
    pub fn get_subcommands() -> [Command<'static>; 2] {[
        Command::new("single")
            .about("Single-locus drift with selection, run for a fixed number of generations")
            .allow_negative_numbers(true)
            .args([
                Arg::new("size")
                    .short('N')
                    .long("size")
                    .help("Population size")
                    .default_value("100")
                    .value_name("population_size")
                    .value_parser(value_parser!(u64)),
                Arg::new("selection")
                    .short('s')
                    .long("selection")
                    .help("Selection coefficient of the focal allele")
                    .default_value("0")
                    .value_name("s")
                    .value_parser(value_parser!(f64)),
                Arg::new("frequency")
                    .short('f')
                    .long("frequency")
                    .help("Starting frequency of the focal allele")
                    .default_value("0.5")
                    .value_name("f")
                    .value_parser(value_parser!(f64)),
                Arg::new("generations")
                    .short('g')
                    .long("generations")
                    .help("Number of generations per run (generation 0 included)")
                    .default_value("100")
                    .value_name("generations")
                    .value_parser(value_parser!(usize)),
                Arg::new("replicates")
                    .short('c')
                    .long("replicates")
                    .help("Number of independent runs")
                    .default_value("10")
                    .value_name("number_of_replicates")
                    .value_parser(value_parser!(usize)),
            ]),
        Command::new("two-locus")
            .about("Two loci with a singleton mutation, run until a locus fixes or the maximum generation")
            .allow_negative_numbers(true)
            .args([
                Arg::new("size")
                    .short('N')
                    .long("size")
                    .help("Population size")
                    .default_value("100")
                    .value_name("population_size")
                    .value_parser(value_parser!(u64)),
                Arg::new("selection")
                    .short('s')
                    .long("selection")
                    .help("Selection coefficient of the singleton's allele at locus B")
                    .default_value("0")
                    .value_name("s")
                    .value_parser(value_parser!(f64)),
                Arg::new("recombination_rates")
                    .short('r')
                    .long("recombination_rates")
                    .help("List of recombination thresholds (separated by comma); an individual recombines when its uniform draw is >= the threshold")
                    .default_value("0.1")
                    .value_name("rate")
                    .takes_value(true)
                    .multiple_values(true)
                    .use_value_delimiter(true)
                    .value_parser(value_parser!(f64)),
                Arg::new("max_generation")
                    .short('t')
                    .long("max_generation")
                    .help("Maximum generation")
                    .default_value("100")
                    .value_name("max_generation")
                    .value_parser(value_parser!(usize)),
                Arg::new("replicates")
                    .short('c')
                    .long("replicates")
                    .help("Number of replicates per recombination rate")
                    .default_value("1")
                    .value_name("number_of_replicates")
                    .value_parser(value_parser!(usize)),
                Arg::new("seeding")
                    .long("seeding")
                    .help("How the number of A alleles is chosen: drift, drift:<runs>:<generations>, fixed:<count> or frequency:<f>")
                    .default_value("drift")
                    .value_name("strategy")
                    .value_parser(value_parser!(String)),
            ]),
    ]}

    /// Reads the model information from a clap argument match
    pub fn from_args(matches: &ArgMatches) -> std::result::Result<Self, String> {
        if let Some(single) = matches.subcommand_matches("single") {
            Ok(SimulationModel::SingleLocus(SingleLocusParameters {
                population_size: *single.get_one("size").unwrap(),
                selection_coefficient: *single.get_one("selection").unwrap(),
                starting_frequency: *single.get_one("frequency").unwrap(),
                generations: *single.get_one("generations").unwrap(),
                runs: *single.get_one("replicates").unwrap(),
            }))
        } else if let Some(two_locus) = matches.subcommand_matches("two-locus") {
            let seeding = SeedingStrategy::parse(two_locus.get_one::<String>("seeding").unwrap())?;
            Ok(SimulationModel::TwoLocus(TwoLocusBatch {
                population_size: *two_locus.get_one("size").unwrap(),
                selection_coefficient: *two_locus.get_one("selection").unwrap(),
                recombination_rates: two_locus.get_many::<f64>("recombination_rates").unwrap().copied().collect(),
                max_generations: *two_locus.get_one("max_generation").unwrap(),
                replicates: *two_locus.get_one("replicates").unwrap(),
                seeding,
            }))
        } else {
            Err(String::from("Error: model not recognized"))
        }
    }

    /// Gets the clap argument pointing to a model configuration file
    pub fn config_arg() -> Arg<'static> {
        Arg::new("model_configuration")
            .long("model_conf")
            .help("TOML file describing the model; overrides the model given on the command line")
            .value_name("file")
            .value_hint(ValueHint::FilePath)
            .value_parser(value_parser!(String))
    }

    /// Reads a model from a TOML file
    ///
    /// # Arguments:
    /// * `filename` path of the TOML file
    pub fn from_toml_file<P: AsRef<Path>>(filename: P) -> std::result::Result<Self, String> {
        let filename = filename.as_ref();
        let contents = fs::read_to_string(filename)
            .map_err(|e| format!("Error: could not read file `{}`: {}", filename.display(), e))?;
        Self::from_toml_str(&contents)
            .map_err(|e| format!("Error: could not parse model in `{}`: {}", filename.display(), e))
    }

    /// Reads a model from a TOML string
    ///
    /// # Arguments:
    /// * `contents` TOML document
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Writes the model as a TOML document
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

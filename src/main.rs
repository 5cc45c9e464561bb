//! # wfsim
//! Discrete-generation **W**right-**F**isher simulations of allele and
//! haplotype frequencies under drift, selection and recombination
//!
//! Two models are available as subcommands: `single`, an ensemble of
//! single-locus trajectories, and `two-locus`, haplotype populations seeded
//! with a singleton mutation and run until a locus fixes.

pub mod output;

use clap::{Arg, Command, ArgMatches, value_parser};
use std::time::{Duration, Instant};

use wfsim::{
    ensemble::{run_many_with_policy, FailurePolicy},
    model::SimulationModel,
    random::SeededSource,
    termination::Cancellation,
    two_locus::simulate_replicates,
};
use output::{Output, validate_identifier};


fn main() -> Result<(), String> {
    ///////////////////////////////////////////////////////////////////////////////////////////////
    // configure and read command line parameters
    let matches = get_command_line_matches();

    let empty_string = String::new();
    let identifier = matches.get_one::<String>("identifier").unwrap_or(&empty_string);
    validate_identifier(identifier)?;

    let model = match matches.get_one::<String>("model_configuration") {
        Some(filename) => {
            if matches.subcommand_name().is_some() {
                println!("Warning: the model read from `{}` overrides the command-line model.", filename);
            }
            SimulationModel::from_toml_file(filename)?
        },
        None => SimulationModel::from_args(&matches)?,
    };
    model.validate().map_err(|e| format!("Error: {}", e))?;

    let mut rng = match matches.get_one::<u64>("seed") {
        Some(&seed) => SeededSource::from_seed(seed),
        None        => SeededSource::from_entropy(),
    };

    let cancellation = match matches.get_one::<u64>("timeout") {
        Some(&seconds) => Cancellation::with_timeout(Duration::from_secs(seconds)),
        None           => Cancellation::new(),
    };

    let policy = if *matches.get_one::<bool>("skip_failed").unwrap_or(&false) {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };
    ///////////////////////////////////////////////////////////////////////////////////////////////

    ///////////////////////////////////////////////////////////////////////////////////////////////
    // open files to save data
    let mut output = Output::from_args(&matches, &model, identifier)?;
    ///////////////////////////////////////////////////////////////////////////////////////////////

    println!("{}", model.long_description());
    let start = Instant::now();

    ///////////////////////////////////////////////////////////////////////////////////////////////
    // Main loop
    match &model {
        SimulationModel::SingleLocus(parameters) => {
            let ensemble = run_many_with_policy(parameters, policy, &mut rng)
                .map_err(|e| format!("Error: {}", e))?;
            if ensemble.skipped() > 0 {
                println!("Warning: {} of {} runs failed and were skipped.", ensemble.skipped(), parameters.runs);
            }
            output.save_ensemble(&ensemble)?;
            println!("{} runs of {} generations completed", ensemble.len(), parameters.generations);
        },
        SimulationModel::TwoLocus(batch) => {
            // run the populations for all the recombination rates listed by the user
            for parameters in batch.parameters() {
                let runs = simulate_replicates(&parameters, batch.replicates, &mut rng, &cancellation)
                    .map_err(|e| format!("Error: {}", e))?;

                for (replicate, run) in runs.iter().enumerate() {
                    output.save_two_locus_run(parameters.recombination_rate, replicate, run)?;
                    match run.fixation_generation() {
                        Some(t) => println!("r = {}, replicate {}: fixed at generation {}", parameters.recombination_rate, replicate, t),
                        None    => println!("r = {}, replicate {}: {} at generation {}", parameters.recombination_rate, replicate, run.termination().label(), run.final_population().generation()),
                    }
                }
            }
        },
    }
    ///////////////////////////////////////////////////////////////////////////////////////////////

    output.flush()?;
    println!("Run {} finished in {:.3?}", output.run_index(), start.elapsed());

    Ok(())
}


/// Defines the command line arguments and returns their matches
fn get_command_line_matches() -> ArgMatches {
    Command::new("wfsim")
        .version("1.0")
        .about("Wright-Fisher simulations of drift, selection and recombination")
        .subcommands(SimulationModel::get_subcommands())
        .args([
            SimulationModel::config_arg(),
            Arg::new("seed")
                .long("seed")
                .help("Seed of the random number generator; drawn from the system if missing")
                .value_name("seed")
                .global(true)
                .value_parser(value_parser!(u64)),
            Arg::new("identifier")
                .long("id")
                .help("Identifier appended to the output file names")
                .value_name("identifier")
                .global(true)
                .value_parser(value_parser!(String)),
            Arg::new("output_configuration")
                .short('o')
                .long("output_conf")
                .help("TOML file with the output configuration")
                .default_value("default")
                .value_name("file")
                .global(true)
                .value_parser(value_parser!(String)),
            Arg::new("output_directory")
                .short('d')
                .long("directory")
                .help("Root folder of the output files")
                .default_value("data")
                .value_name("directory")
                .global(true)
                .value_parser(value_parser!(String)),
            Arg::new("timeout")
                .long("timeout")
                .help("Stops two-locus runs after this many seconds")
                .value_name("seconds")
                .global(true)
                .value_parser(value_parser!(u64)),
            Arg::new("skip_failed")
                .long("skip_failed")
                .help("Drops failed single-locus runs instead of aborting the ensemble")
                .takes_value(false)
                .global(true)
                .action(clap::ArgAction::SetTrue),
        ])
        .get_matches()
}

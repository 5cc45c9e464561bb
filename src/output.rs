//! Output module

use wfsim::{
    ensemble::Ensemble,
    haplotype::Haplotype,
    model::SimulationModel,
    two_locus::TwoLocusRun,
};

use clap::ArgMatches;
use glob::glob;
use regex::Regex;
use toml::Value;

use std::{
    io::{Write, ErrorKind},
    fs,
    path::{Path, PathBuf},
};
type BufferedFile = std::io::BufWriter<std::fs::File>;

///////////////////////////////////////////////////////////////////////////////////////////////////
// auxiliary functions to write to files and read the output configuration
fn open_file(filename: &Path) -> Result<BufferedFile, String> {
    match fs::File::create(filename) {
        Err(why) => Err(format!("Error: couldn't create {}: {}", filename.display(), why)),
        Ok(file) => Ok(std::io::BufWriter::new(file)),
    }
}

fn write_to_file(file: &mut BufferedFile, contents: &str) -> Result<(), String> {
    file.write_all(contents.as_bytes())
        .map_err(|why| format!("Error: couldn't write data to file: {}", why))
}

/// Checks that a run identifier can be used inside a file name
///
/// # Arguments:
/// * `identifier` run identifier given by the user
pub fn validate_identifier(identifier: &str) -> Result<(), String> {
    let allowed = Regex::new(r"^[A-Za-z0-9_.-]*$").map_err(|e| e.to_string())?;
    if allowed.is_match(identifier) {
        Ok(())
    } else {
        Err(format!("Error: invalid identifier '{}'. Only letters, digits, '_', '-' and '.' are allowed.", identifier))
    }
}

/// Settings of one output section read from the configuration file
#[derive(Clone, Debug, PartialEq)]
struct Section {
    save: bool,
    period: usize,
    raw: bool,
    filename: Option<String>,
}

impl Section {
    /// Reads section `name`, falling back to the given defaults
    ///
    /// # Arguments:
    /// * `config` parsed configuration file, if any
    /// * `name` section name
    /// * `save` default value of the save flag
    fn read(config: Option<&Value>, name: &str, save: bool) -> Result<Self, String> {
        let mut section = Section { save, period: 1, raw: false, filename: None };

        let table = match config.and_then(|c| c.get(name)) {
            Some(table) => table,
            None        => return Ok(section),
        };

        if let Some(save) = table.get("save") {
            section.save = save.as_bool().unwrap_or(false);
        }
        if let Some(raw) = table.get("raw") {
            section.raw = raw.as_bool().unwrap_or(false);
        }
        // Checks if a period is defined and reads it
        if let Some(p) = table.get("period") {
            match p.as_integer() {
                Some(p) if p > 0 => section.period = p as usize,
                // If it is defined and cannot be read as a positive integer warn the user
                _ => println!("Warning: could not recognize a period for section [{}]. Period set to 1.", name),
            }
        }
        if let Some(filename) = table.get("output_filename") {
            match filename.as_str() {
                Some(f) => section.filename = Some(f.to_string()),
                None    => return Err(format!("Error: output_filename of section [{}] is not a string", name)),
            }
        }
        Ok(section)
    }
}

/// Stores the output settings and the output files
pub struct Output {
    directory: PathBuf,
    run_index: usize,
    trajectory_period: usize,
    haplotype_period: usize,
    file_trajectories:  Option<BufferedFile>,
    file_summary:       Option<BufferedFile>,
    file_haplotypes:    Option<BufferedFile>,
    file_final:         Option<BufferedFile>,
    file_raw:           Option<BufferedFile>,
}

impl Output {
    /// Checks if a directory exists and creates it in case it does not
    ///
    /// # Arguments:
    /// * `dir` directory to create
    pub fn create_dir(dir: &Path) -> Result<(), String> {
        // create_dir_all succeeds on folders that already exist
        fs::create_dir_all(dir).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => format!("Error: permission to create directory \"{}\" denied.", dir.display()),
            _ => format!("Error: failed to create directory \"{}\": {}", dir.display(), e),
        })
    }

    fn generate_filename(name: &str, model: &SimulationModel, identifier: &str, run_index: usize) -> String {
        name.replace("%m",  &model.name())
            .replace("%M",  &model.short_description())
            .replace("%N",  &model.population_size().to_string())
            .replace("%id", identifier)
            .replace("%r",  &run_index.to_string())
    }

    /// Counts the runs of the same model already saved under `directory`, so a
    /// new run does not overwrite them
    ///
    /// # Arguments:
    /// * `directory` output root
    /// * `model` simulation model
    /// * `identifier` identifier string
    pub fn existing_runs(directory: &Path, model: &SimulationModel, identifier: &str) -> usize {
        let pattern = directory.join("parameters").join(format!("{}_*{}.toml", model.short_description(), identifier));
        match glob(&pattern.to_string_lossy()) {
            Ok(paths) => paths.filter_map(|p| p.ok()).count(),
            Err(_)    => 0,
        }
    }

    /// Opens the file of one section, writing its header
    fn open_section(&self, section: &Section, folder: &str, model: &SimulationModel, identifier: &str, extension: &str, header: Option<&str>) -> Result<Option<BufferedFile>, String> {
        if !section.save {
            return Ok(None)
        }

        let dir = self.directory.join(folder);
        Self::create_dir(&dir)?;

        // Define the default file name, replaced if an alternative name is given
        let filename = match &section.filename {
            Some(name) => Self::generate_filename(name, model, identifier, self.run_index),
            None if identifier.is_empty() => format!("{}_{}.{}", model.short_description(), self.run_index, extension),
            None => format!("{}_{}_{}.{}", model.short_description(), self.run_index, identifier, extension),
        };

        let mut file = open_file(&dir.join(filename))?;
        if let Some(header) = header {
            write_to_file(&mut file, header)?;
        }
        Ok(Some(file))
    }

    /// Creates an Output struct from the command-line arguments
    ///
    /// # Arguments:
    /// * `matches` matches to the command-line arguments
    /// * `model` simulation model
    /// * `identifier` identifier string
    pub fn from_args(matches: &ArgMatches, model: &SimulationModel, identifier: &str) -> Result<Output, String> {
        let directory = PathBuf::from(matches.get_one::<String>("output_directory").map(String::as_str).unwrap_or("data"));
        let configuration_filename = matches.get_one::<String>("output_configuration").map(String::as_str).unwrap_or("default");

        let configuration = if configuration_filename == "default" {
            None
        } else {
            let file = fs::read_to_string(configuration_filename)
                .map_err(|_| format!("Error: could not read file `{}`", configuration_filename))?;
            Some(file.parse::<Value>().map_err(|e| format!("Error: could not parse `{}`: {}", configuration_filename, e))?)
        };

        Self::new(&directory, configuration.as_ref(), model, identifier)
    }

    /// Creates an Output struct writing under `directory`
    ///
    /// # Arguments:
    /// * `directory` output root
    /// * `configuration` parsed output configuration, `None` for the defaults
    /// * `model` simulation model
    /// * `identifier` identifier string
    pub fn new(directory: &Path, configuration: Option<&Value>, model: &SimulationModel, identifier: &str) -> Result<Output, String> {
        validate_identifier(identifier)?;
        Self::create_dir(directory)?;

        let single_locus = matches!(model, SimulationModel::SingleLocus(_));

        let parameters   = Section::read(configuration, "parameters", true)?;
        let trajectories = Section::read(configuration, "trajectories", single_locus)?;
        let summary      = Section::read(configuration, "summary", single_locus)?;
        let haplotypes   = Section::read(configuration, "haplotypes", !single_locus)?;
        let final_state  = Section::read(configuration, "final", !single_locus)?;

        let mut output = Output {
            directory: directory.to_path_buf(),
            run_index: Self::existing_runs(directory, model, identifier),
            trajectory_period: trajectories.period,
            haplotype_period: haplotypes.period,
            file_trajectories: None,
            file_summary: None,
            file_haplotypes: None,
            file_final: None,
            file_raw: None,
        };

        // The parameters file is always written, it also reserves the run index
        let parameters = Section { save: true, ..parameters };
        if let Some(mut file) = output.open_section(&parameters, "parameters", model, identifier, "toml", None)? {
            let contents = model.to_toml_string().map_err(|e| format!("Error: could not serialize the model: {}", e))?;
            write_to_file(&mut file, &format!("# {}\n", model.long_description().replace('\n', "\n# ")))?;
            write_to_file(&mut file, &contents)?;
        }

        if single_locus {
            output.file_trajectories = output.open_section(&trajectories, "trajectories", model, identifier, "dat", Some(
                "#run\tgeneration\tpopulation_size\tselection_coefficient\tstarting_frequency\tallele_count\tfrequency\n"
            ))?;
            output.file_summary = output.open_section(&summary, "summary", model, identifier, "dat", Some(
                "#generation\tmean_frequency\tvariance_frequency\tfraction_fixed\tfraction_lost\n"
            ))?;
            if trajectories.raw {
                output.file_raw = output.open_section(&trajectories, "raw", model, identifier, "bin", None)?;
            }
        } else {
            output.file_haplotypes = output.open_section(&haplotypes, "haplotypes", model, identifier, "dat", Some(
                "#recombination_rate\treplicate\tgeneration\tpopulation_size\tselection_coefficient\tsingleton\tAB\taB\tAb\tab\tp_AB\tp_aB\tp_Ab\tp_ab\tfreq_A\tfreq_B\tsingleton_count\tsingleton_frequency\tlinkage_disequilibrium\n"
            ))?;
            output.file_final = output.open_section(&final_state, "final", model, identifier, "dat", Some(
                "#recombination_rate\treplicate\ttermination\tfinal_generation\tfreq_A\tfreq_B\tsingleton_count\tsingleton_frequency\n"
            ))?;
            if haplotypes.raw {
                output.file_raw = output.open_section(&haplotypes, "raw", model, identifier, "bin", None)?;
            }
        }

        Ok(output)
    }

    /// Index of this run among the runs of the same model
    pub fn run_index(&self) -> usize {
        self.run_index
    }

    /// Saves every trajectory of a single-locus ensemble and its summary
    /// (options [trajectories] and [summary])
    ///
    /// # Arguments:
    /// * `ensemble`
    pub fn save_ensemble(&mut self, ensemble: &Ensemble) -> Result<(), String> {
        if let Some(file) = self.file_trajectories.as_mut() {
            for (run, trajectory) in ensemble.trajectories().iter().enumerate() {
                for population in trajectory.iter().filter(|p| p.generation() % self.trajectory_period == 0) {
                    let line = format!(
                        "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                        run, population.generation(), population.size(), population.selection_coefficient(),
                        population.starting_frequency(), population.allele_count(), population.frequency()
                    );
                    write_to_file(file, &line)?;
                }
            }
        }

        if let Some(file) = self.file_summary.as_mut() {
            for row in ensemble.summary() {
                let line = format!(
                    "{}\t{}\t{}\t{}\t{}\n",
                    row.generation, row.mean_frequency, row.variance_frequency, row.fraction_fixed, row.fraction_lost
                );
                write_to_file(file, &line)?;
            }
        }

        if let Some(file) = self.file_raw.as_mut() {
            bincode::serialize_into(file, ensemble).map_err(|e| format!("Error: could not save the raw ensemble: {}", e))?;
        }
        Ok(())
    }

    /// Saves the generations and the final state of a two-locus run
    /// (options [haplotypes] and [final])
    ///
    /// # Arguments:
    /// * `recombination_rate` recombination threshold of the batch
    /// * `replicate` replicate index
    /// * `run` completed run
    pub fn save_two_locus_run(&mut self, recombination_rate: f64, replicate: usize, run: &TwoLocusRun) -> Result<(), String> {
        if let Some(file) = self.file_haplotypes.as_mut() {
            for population in run.generations().iter().filter(|p| p.generation() % self.haplotype_period == 0) {
                let counts = population.haplotype_counts();
                let probabilities = population.sampling_probabilities();
                let (freq_a, freq_b) = population.allele_frequencies();

                let mut line = format!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    recombination_rate, replicate, population.generation(), population.size(),
                    population.selection_coefficient(), population.singleton().label()
                );
                for h in Haplotype::ALL {
                    line += &format!("\t{}", counts[h]);
                }
                for h in Haplotype::ALL {
                    line += &format!("\t{}", probabilities[h]);
                }
                line += &format!(
                    "\t{}\t{}\t{}\t{}\t{}\n",
                    freq_a, freq_b, population.singleton_count(), population.singleton_frequency(),
                    population.linkage_disequilibrium()
                );
                write_to_file(file, &line)?;
            }
        }

        if let Some(file) = self.file_final.as_mut() {
            let last = run.final_population();
            let (freq_a, freq_b) = last.allele_frequencies();
            let line = format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                recombination_rate, replicate, run.termination().label(), last.generation(),
                freq_a, freq_b, last.singleton_count(), last.singleton_frequency()
            );
            write_to_file(file, &line)?;
        }

        if let Some(file) = self.file_raw.as_mut() {
            bincode::serialize_into(file, run).map_err(|e| format!("Error: could not save the raw run: {}", e))?;
        }
        Ok(())
    }

    /// Flushes every open file
    pub fn flush(&mut self) -> Result<(), String> {
        for file in [
            self.file_trajectories.as_mut(),
            self.file_summary.as_mut(),
            self.file_haplotypes.as_mut(),
            self.file_final.as_mut(),
            self.file_raw.as_mut(),
        ].into_iter().flatten() {
            file.flush().map_err(|e| format!("Error: could not flush output: {}", e))?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wfsim::{
        ensemble::{run_many, SingleLocusParameters},
        termination::Cancellation,
        model::TwoLocusBatch,
        random::SeededSource,
        seeder::SeedingStrategy,
        two_locus::simulate,
    };

    fn single_model() -> SimulationModel {
        SimulationModel::SingleLocus(SingleLocusParameters {
            population_size: 20,
            selection_coefficient: 0.,
            starting_frequency: 0.5,
            generations: 5,
            runs: 3,
        })
    }

    fn read_dir_file(dir: &Path) -> String {
        let entry = fs::read_dir(dir).unwrap().next().unwrap().unwrap();
        fs::read_to_string(entry.path()).unwrap()
    }

    #[test]
    fn identifiers_are_checked() {
        assert!(validate_identifier("").is_ok());
        assert!(validate_identifier("run_1.b-2").is_ok());
        assert!(validate_identifier("../escape").is_err());
        assert!(validate_identifier("with space").is_err());
    }

    #[test]
    fn existing_directories_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("summary");
        Output::create_dir(&nested).unwrap();
        Output::create_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn sections_read_the_configuration() {
        let config: Value = "[trajectories]\nsave = false\nperiod = 10\n[summary]\noutput_filename = \"%m_%N_%id.dat\"\n"
            .parse()
            .unwrap();
        let trajectories = Section::read(Some(&config), "trajectories", true).unwrap();
        assert_eq!(trajectories, Section { save: false, period: 10, raw: false, filename: None });

        let summary = Section::read(Some(&config), "summary", true).unwrap();
        assert!(summary.save);
        assert_eq!(
            Output::generate_filename(summary.filename.as_deref().unwrap(), &single_model(), "x", 0),
            "single_20_x.dat"
        );
        assert_eq!(Section::read(None, "final", false).unwrap().save, false);
    }

    #[test]
    fn single_locus_output_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let model = single_model();
        let mut output = Output::new(dir.path(), None, &model, "").unwrap();
        assert_eq!(output.run_index(), 0);

        let parameters = match &model { SimulationModel::SingleLocus(p) => p.clone(), _ => unreachable!() };
        let ensemble = run_many(&parameters, &mut SeededSource::from_seed(1)).unwrap();
        output.save_ensemble(&ensemble).unwrap();
        output.flush().unwrap();

        let trajectories = read_dir_file(&dir.path().join("trajectories"));
        let lines: Vec<&str> = trajectories.lines().collect();
        assert!(lines[0].starts_with("#run"));
        assert_eq!(lines.len(), 1 + 3 * 5);

        let summary = read_dir_file(&dir.path().join("summary"));
        assert_eq!(summary.lines().count(), 1 + 5);

        let saved = read_dir_file(&dir.path().join("parameters"));
        let reloaded = SimulationModel::from_toml_str(&saved).unwrap();
        assert_eq!(reloaded, model);

        // a second run of the same model gets the next index
        let second = Output::new(dir.path(), None, &model, "").unwrap();
        assert_eq!(second.run_index(), 1);
    }

    #[test]
    fn two_locus_output_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let batch = TwoLocusBatch {
            population_size: 20,
            selection_coefficient: 0.,
            recombination_rates: vec![0.5],
            max_generations: 5,
            replicates: 1,
            seeding: SeedingStrategy::default(),
        };
        let model = SimulationModel::TwoLocus(batch.clone());
        let mut output = Output::new(dir.path(), None, &model, "test").unwrap();

        let run = simulate(&batch.parameters()[0], &mut SeededSource::from_seed(2), &Cancellation::new()).unwrap();
        output.save_two_locus_run(0.5, 0, &run).unwrap();
        output.flush().unwrap();

        let haplotypes = read_dir_file(&dir.path().join("haplotypes"));
        assert_eq!(haplotypes.lines().count(), 1 + run.generations().len());
        let final_state = read_dir_file(&dir.path().join("final"));
        let saved = read_dir_file(&dir.path().join("parameters"));
        assert_eq!(SimulationModel::from_toml_str(&saved).unwrap(), model);
        assert_eq!(final_state.lines().count(), 2);
        assert!(final_state.lines().nth(1).unwrap().contains(run.termination().label()));
    }
}

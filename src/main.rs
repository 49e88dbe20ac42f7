//! Command-line entry point: load an MKP instance, run the algorithm, write the report.

use clap::Parser;
use log::{error, info};
use mkp_ga::config::{wall_clock_seed, Config};
use mkp_ga::problem::{load_instances, select_instance};
use mkp_ga::EvolutionaryAlgorithm;
use std::path::PathBuf;
use std::process::ExitCode;

/// Evolutionary algorithm for the 0/1 Multidimensional Knapsack Problem.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Number of individuals in the population
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    population_size: u64,

    /// Evaluation budget; a negative value runs until the optimum or the time limit
    #[arg(allow_negative_numbers = true)]
    max_function_evaluations: i64,

    /// Probability of skipping recombination
    crossover_probability: f64,

    /// Per-bit mutation probability
    mutation_probability: f64,

    /// Index of the instance within the instance file
    problem_index: usize,

    /// Random seed (defaults to the current time in milliseconds)
    random_seed: Option<u64>,

    /// Instance file in OR-Library mknap format
    #[arg(long = "instances", env = "MKP_FILE_PATH")]
    instances: PathBuf,

    /// Path of the JSON report
    #[arg(long = "output", env = "RESULTS_FILE_PATH")]
    output: PathBuf,
}

impl Cli {
    fn config(&self) -> Config {
        Config::new()
            .with_population_size(self.population_size as usize)
            .with_max_function_evaluations(self.max_function_evaluations)
            .with_crossover_probability(self.crossover_probability)
            .with_mutation_probability(self.mutation_probability)
            .with_random_seed(self.random_seed.unwrap_or_else(wall_clock_seed))
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.config();
    config.validate()?;

    info!("Loading instances from: {}", cli.instances.display());
    let instances = load_instances(&cli.instances)?;
    let problem = select_instance(instances, cli.problem_index)?;
    info!(
        "Loaded instance {}: {} items, {} constraints, optimum {}",
        cli.problem_index, problem.number_items, problem.number_constraints, problem.optimal_value
    );

    let optimal_value = problem.optimal_value;
    let mut algorithm = EvolutionaryAlgorithm::new(problem, config)?;
    let best = algorithm.run()?;
    println!("Best Solution: {}", best);

    let report = algorithm.report(cli.problem_index)?;
    println!("{}", report.summary(optimal_value));

    report.write_to(&cli.output)?;
    info!("Report written to: {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

//! Basic example of using the MKP-GA library.

use mkp_ga::config::Config;
use mkp_ga::problem::{load_instances, select_instance};
use mkp_ga::utils::{describe_solution, format_duration};
use mkp_ga::EvolutionaryAlgorithm;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get instance path and index from command line or use defaults
    let args: Vec<String> = env::args().collect();
    let instance_path = if args.len() > 1 {
        &args[1]
    } else {
        "instances/mknap1.txt"
    };
    let problem_index = match args.get(2) {
        Some(index) => index.parse()?,
        None => 0,
    };

    // Load problem
    println!("Loading instances from: {}", instance_path);
    let problem = select_instance(load_instances(instance_path)?, problem_index)?;
    println!(
        "Loaded instance {}: {} items, {} constraints, optimum {}",
        problem_index, problem.number_items, problem.number_constraints, problem.optimal_value
    );

    // Configure algorithm
    let config = Config::new()
        .with_population_size(100)
        .with_max_function_evaluations(10_000)
        .with_crossover_probability(0.2)
        .with_mutation_probability(1.0 / problem.number_items as f64)
        .with_random_seed(42);

    // Create and run algorithm
    let mut algorithm = EvolutionaryAlgorithm::new(problem.clone(), config)?;
    let best_solution = algorithm.run()?;

    // Print results
    println!(
        "Search completed in {} ({} evaluations, {} generations)",
        format_duration(algorithm.run_time()),
        algorithm.function_evaluations(),
        algorithm.generations()
    );
    println!("{}", describe_solution(&best_solution, &problem));

    Ok(())
}

//! Integration tests for the full evolutionary algorithm.

use mkp_ga::config::Config;
use mkp_ga::error::{Error, Result};
use mkp_ga::genetic::Crossover;
use mkp_ga::individual::Individual;
use mkp_ga::problem::{MultidimensionalKnapsack, Onemax, Problem};
use mkp_ga::stopping::MaxFunctionEvaluations;
use mkp_ga::EvolutionaryAlgorithm;
use rand::RngCore;
use std::time::Duration;

/// Creates a moderate knapsack instance with 20 items and 3 constraints.
fn create_moderate_problem() -> MultidimensionalKnapsack {
    let items = 20;
    let profits = (0..items).map(|i| 10.0 + (i * 7 % 13) as f64).collect();
    let constraints = (0..3)
        .map(|c| {
            (0..items)
                .map(|i| 1.0 + ((i * (c + 3) + c) % 9) as f64)
                .collect()
        })
        .collect();
    let capacities = vec![40.0, 45.0, 50.0];

    MultidimensionalKnapsack::new(1000.0, profits, constraints, capacities).unwrap()
}

fn base_config() -> Config {
    Config::new()
        .with_population_size(20)
        .with_max_function_evaluations(2000)
        .with_crossover_probability(0.2)
        .with_mutation_probability(0.05)
        .with_random_seed(42)
}

#[test]
fn test_algorithm_initialization() {
    let config = base_config();
    let mut algorithm = EvolutionaryAlgorithm::new(create_moderate_problem(), config).unwrap();
    algorithm.initialize().unwrap();

    // Generation 0 evaluates the whole population
    assert_eq!(algorithm.population().len(), 20);
    assert_eq!(algorithm.function_evaluations(), 20);
    assert_eq!(algorithm.generations(), 0);
    assert!(algorithm.population().iter().all(Individual::is_evaluated));

    // The recorded best is the first individual with the highest fitness
    let best = algorithm.best_solution().unwrap();
    let max_fitness = algorithm
        .population()
        .iter()
        .filter_map(Individual::fitness)
        .fold(f64::MIN, f64::max);
    assert_eq!(best.fitness(), Some(max_fitness));
    let first_best = algorithm
        .population()
        .iter()
        .find(|i| i.fitness() == Some(max_fitness))
        .unwrap();
    assert_eq!(best.chromosome(), first_best.chromosome());
}

#[test]
fn test_algorithm_respects_evaluation_budget() {
    let config = base_config().with_max_function_evaluations(500);
    let mut algorithm = EvolutionaryAlgorithm::new(create_moderate_problem(), config).unwrap();
    algorithm.run().unwrap();

    assert_eq!(algorithm.function_evaluations(), 500);
    assert_eq!(algorithm.generations(), 480);
    assert_eq!(algorithm.population().len(), 20);
}

#[test]
fn test_budget_smaller_than_population() {
    // The initial population is always evaluated in full
    let config = base_config().with_max_function_evaluations(5);
    let mut algorithm = EvolutionaryAlgorithm::new(create_moderate_problem(), config).unwrap();
    algorithm.run().unwrap();

    assert_eq!(algorithm.function_evaluations(), 20);
    assert_eq!(algorithm.generations(), 0);
}

#[test]
fn test_algorithm_is_deterministic() {
    let problem = create_moderate_problem();

    let mut first = EvolutionaryAlgorithm::new(problem.clone(), base_config()).unwrap();
    let best1 = first.run().unwrap();

    let mut second = EvolutionaryAlgorithm::new(problem, base_config()).unwrap();
    let best2 = second.run().unwrap();

    assert_eq!(best1, best2);
    assert_eq!(first.function_evaluations(), second.function_evaluations());
    assert_eq!(first.generations(), second.generations());
    assert_eq!(first.population(), second.population());
    assert_eq!(
        first.metrics().generation_best(),
        second.metrics().generation_best()
    );
}

#[test]
fn test_different_seeds_explore_differently() {
    let problem = create_moderate_problem();

    let mut first = EvolutionaryAlgorithm::new(problem.clone(), base_config()).unwrap();
    first.initialize().unwrap();

    let mut second =
        EvolutionaryAlgorithm::new(problem, base_config().with_random_seed(43)).unwrap();
    second.initialize().unwrap();

    assert_ne!(first.population(), second.population());
}

#[test]
fn test_best_fitness_is_monotonic() {
    let mut algorithm =
        EvolutionaryAlgorithm::new(create_moderate_problem(), base_config()).unwrap();
    let best = algorithm.run().unwrap();

    let trace = algorithm.metrics().generation_best();
    assert!(!trace.is_empty());
    for pair in trace.windows(2) {
        assert!(pair[0].generation_number < pair[1].generation_number);
        assert!(pair[0].best_individual_fitness <= pair[1].best_individual_fitness);
    }

    let last = trace.last().unwrap();
    assert_eq!(last.generation_number, algorithm.generations());
    assert_eq!(Some(last.best_individual_fitness), best.fitness());

    // The best ever found is never worse than what survives in the population
    let population_best = algorithm
        .population()
        .iter()
        .filter_map(Individual::fitness)
        .fold(f64::MIN, f64::max);
    assert!(best.fitness().unwrap() >= population_best);
}

#[test]
fn test_second_run_starts_a_fresh_trace() {
    let config = Config::new()
        .with_population_size(4)
        .with_max_function_evaluations(200)
        .with_crossover_probability(0.2)
        .with_mutation_probability(0.05)
        .with_random_seed(1);
    let mut algorithm = EvolutionaryAlgorithm::new(Onemax::new(30), config).unwrap();

    algorithm.run().unwrap();
    let best = algorithm.run().unwrap();

    let trace = algorithm.metrics().generation_best();
    let restarts = trace.iter().filter(|r| r.generation_number == 0).count();
    assert_eq!(restarts, 1);
    assert_eq!(trace[0].generation_number, 0);
    for pair in trace.windows(2) {
        assert!(pair[0].generation_number < pair[1].generation_number);
        assert!(pair[0].best_individual_fitness <= pair[1].best_individual_fitness);
    }
    assert_eq!(trace.last().unwrap().generation_number, algorithm.generations());
    assert_eq!(
        Some(trace.last().unwrap().best_individual_fitness),
        best.fitness()
    );
}

#[test]
fn test_algorithm_improves_on_initial_population() {
    let problem = create_moderate_problem();

    let mut initial = EvolutionaryAlgorithm::new(problem.clone(), base_config()).unwrap();
    initial.initialize().unwrap();
    let initial_best = initial.best_solution().unwrap().fitness().unwrap();

    let mut algorithm = EvolutionaryAlgorithm::new(problem.clone(), base_config()).unwrap();
    let best = algorithm.run().unwrap();

    assert!(best.fitness().unwrap() >= initial_best);
    assert!(best.fitness().unwrap() > 0.0);
    assert!(problem.is_feasible(&best));
}

#[test]
fn test_skip_crossover_without_mutation_cannot_improve() {
    // Crossover probability 1.0 always returns the first parent unchanged
    let config = Config::new()
        .with_population_size(4)
        .with_max_function_evaluations(10)
        .with_crossover_probability(1.0)
        .with_mutation_probability(0.0)
        .with_random_seed(7);

    let mut initial = EvolutionaryAlgorithm::new(Onemax::new(5), config.clone()).unwrap();
    initial.initialize().unwrap();
    let initial_population = initial.population().to_vec();
    let initial_best = initial.best_solution().unwrap().fitness().unwrap();

    let mut algorithm = EvolutionaryAlgorithm::new(Onemax::new(5), config).unwrap();
    let best = algorithm.run().unwrap();

    assert_eq!(algorithm.function_evaluations(), 10);
    assert_eq!(algorithm.generations(), 6);
    assert!(best.fitness().unwrap() <= initial_best);
    assert_eq!(best.fitness(), Some(initial_best));

    // Every survivor is a copy of an initial individual
    for individual in algorithm.population() {
        assert!(initial_population
            .iter()
            .any(|i| i.chromosome() == individual.chromosome()));
    }
}

#[test]
fn test_optimum_seeking_mode_stops_at_optimum() {
    let config = Config::new()
        .with_population_size(20)
        .with_max_function_evaluations(-1)
        .with_crossover_probability(0.1)
        .with_mutation_probability(0.1)
        .with_random_seed(3)
        .with_time_limit(Duration::from_secs(30));

    let mut algorithm = EvolutionaryAlgorithm::new(Onemax::new(10), config).unwrap();
    let best = algorithm.run().unwrap();

    assert_eq!(best.fitness(), Some(10.0));
    assert_eq!(best.chromosome(), &[1; 10]);
    assert!(algorithm.run_time() < Duration::from_secs(30));
}

#[test]
fn test_optimum_seeking_mode_stops_at_time_limit() {
    let time_limit = Duration::from_millis(200);
    let config = base_config()
        .with_max_function_evaluations(-1)
        .with_time_limit(time_limit);

    // The recorded optimum is unreachable
    let mut algorithm = EvolutionaryAlgorithm::new(create_moderate_problem(), config).unwrap();
    algorithm.run().unwrap();

    assert!(algorithm.run_time() >= time_limit);
    assert!(algorithm.function_evaluations() > 20);
}

#[test]
fn test_invalid_config_rejected() {
    let config = base_config().with_crossover_probability(1.5);
    assert!(matches!(
        EvolutionaryAlgorithm::new(create_moderate_problem(), config),
        Err(Error::InvalidParameter { .. })
    ));

    let config = base_config().with_population_size(0);
    assert!(EvolutionaryAlgorithm::new(create_moderate_problem(), config).is_err());
}

/// A problem that produces individuals of the wrong length.
struct BrokenProblem;

impl Problem for BrokenProblem {
    fn number_items(&self) -> usize {
        4
    }

    fn evaluate(&self, individual: &Individual) -> Result<f64> {
        individual.ensure_length(self.number_items())?;
        Ok(0.0)
    }

    fn generate_random_individual(&self, _rng: &mut dyn RngCore) -> Individual {
        Individual::new(vec![1; 3])
    }

    fn optimal_value(&self) -> f64 {
        1.0
    }
}

#[test]
fn test_invariant_violation_aborts_run() {
    let mut algorithm = EvolutionaryAlgorithm::new(BrokenProblem, base_config()).unwrap();
    assert!(matches!(
        algorithm.run(),
        Err(Error::ChromosomeLengthMismatch {
            expected: 4,
            found: 3
        })
    ));
}

/// Always returns a copy of the second parent.
struct SecondParentCrossover;

impl Crossover for SecondParentCrossover {
    fn apply(
        &self,
        _parent1: &Individual,
        parent2: &Individual,
        _rng: &mut dyn RngCore,
    ) -> Result<Individual> {
        Ok(Individual::new(parent2.chromosome().to_vec()))
    }
}

#[test]
fn test_operators_are_swappable() {
    let mut algorithm = EvolutionaryAlgorithm::new(create_moderate_problem(), base_config())
        .unwrap()
        .with_crossover(Box::new(SecondParentCrossover))
        .with_stopping_criterion(Box::new(MaxFunctionEvaluations::new(50)));

    algorithm.run().unwrap();

    assert_eq!(algorithm.function_evaluations(), 50);
    assert_eq!(algorithm.generations(), 30);
}

#[test]
fn test_report_written_as_json() {
    let mut algorithm =
        EvolutionaryAlgorithm::new(create_moderate_problem(), base_config()).unwrap();
    let best = algorithm.run().unwrap();

    let report = algorithm.report(3).unwrap();
    assert_eq!(report.number_of_evaluations, 2000);
    assert_eq!(report.number_of_generations, 1980);
    assert_eq!(Some(report.best_individual.fitness), best.fitness());
    assert!(report.summary(1000.0).starts_with("Best Individual: "));
    assert!(!report.summary(1000.0).contains("(Optimum)"));
    assert!(report.summary(0.0).contains("(Optimum)"));

    let path = std::env::temp_dir().join(format!("mkp_ga_report_{}.json", std::process::id()));
    report.write_to(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["bestIndividual"]["fitness"], best.fitness().unwrap());
    assert_eq!(json["bestIndividual"]["chromosome"].as_array().unwrap().len(), 20);
    assert_eq!(json["numberOfEvaluations"], 2000);
    assert_eq!(json["parameters"]["problemIndex"], 3);
    assert_eq!(json["parameters"]["crossoverProbability"], 0.2);
    assert_eq!(json["parameters"]["populationSize"], 20);
    assert_eq!(json["problem"]["optimalValue"], 1000.0);
    assert!(json["generationBestIndividuals"].as_array().unwrap().len() >= 1);
}

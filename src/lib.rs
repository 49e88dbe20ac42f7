//! # MKP-GA
//!
//! A generational evolutionary algorithm for the 0/1 Multidimensional Knapsack
//! Problem (MKP).
//!
//! Each generation selects two parents by binary tournament, recombines them
//! with single-point crossover, applies bit-flip mutation to the child,
//! evaluates it and folds it into the population with elitist replacement.
//! Infeasible solutions score zero. The run stops on an evaluation budget, or
//! when the known optimum is reached or the time limit expires.

pub mod config;
pub mod error;
pub mod genetic;
pub mod individual;
pub mod metrics;
pub mod population;
pub mod problem;
pub mod stopping;
pub mod utils;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::genetic::{BitFlipMutation, Crossover, Mutation, SinglePointCrossover};
use crate::individual::Individual;
use crate::metrics::{MetricsCollector, ReportIndividual, ReportParameters, RunReport};
use crate::population::{BinaryTournament, ElitistReplacement, Replacement, Selection};
use crate::problem::Problem;
use crate::stopping::{criterion_for, RunState, StoppingCriterion};

use log::{debug, info, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::Duration;

/// The main algorithm structure that drives the generational loop.
pub struct EvolutionaryAlgorithm<P: Problem> {
    pub problem: P,
    pub config: Config,
    population: Vec<Individual>,
    best_solution: Option<Individual>,
    function_evaluations: u64,
    generations: u64,
    run_time: Duration,
    rng: ChaCha8Rng,
    selection: Box<dyn Selection>,
    crossover: Box<dyn Crossover>,
    mutation: Box<dyn Mutation>,
    replacement: Box<dyn Replacement>,
    stopping_criterion: Box<dyn StoppingCriterion>,
    metrics: MetricsCollector,
}

impl<P: Problem> EvolutionaryAlgorithm<P> {
    /// Create a new instance with the default operators for `config`.
    pub fn new(problem: P, config: Config) -> Result<Self> {
        config.validate()?;

        let crossover = SinglePointCrossover::new(config.crossover_probability)?;
        let mutation = BitFlipMutation::new(config.mutation_probability)?;
        let stopping_criterion = criterion_for(&config, problem.optimal_value());

        Ok(EvolutionaryAlgorithm {
            rng: ChaCha8Rng::seed_from_u64(config.random_seed),
            population: Vec::with_capacity(config.population_size + 1),
            problem,
            config,
            best_solution: None,
            function_evaluations: 0,
            generations: 0,
            run_time: Duration::ZERO,
            selection: Box::new(BinaryTournament),
            crossover: Box::new(crossover),
            mutation: Box::new(mutation),
            replacement: Box::new(ElitistReplacement),
            stopping_criterion,
            metrics: MetricsCollector::new(),
        })
    }

    /// Replace the parent selection strategy.
    pub fn with_selection(mut self, selection: Box<dyn Selection>) -> Self {
        self.selection = selection;
        self
    }

    /// Replace the crossover operator.
    pub fn with_crossover(mut self, crossover: Box<dyn Crossover>) -> Self {
        self.crossover = crossover;
        self
    }

    /// Replace the mutation operator.
    pub fn with_mutation(mut self, mutation: Box<dyn Mutation>) -> Self {
        self.mutation = mutation;
        self
    }

    /// Replace the survivor replacement strategy.
    pub fn with_replacement(mut self, replacement: Box<dyn Replacement>) -> Self {
        self.replacement = replacement;
        self
    }

    /// Replace the stopping criterion chosen from the config.
    pub fn with_stopping_criterion(mut self, criterion: Box<dyn StoppingCriterion>) -> Self {
        self.stopping_criterion = criterion;
        self
    }

    /// Generate and evaluate the initial population (generation 0).
    pub fn initialize(&mut self) -> Result<()> {
        self.population.clear();
        self.best_solution = None;
        self.function_evaluations = 0;
        self.generations = 0;
        self.metrics.clear_generations();

        for _ in 0..self.config.population_size {
            let individual = self.problem.generate_random_individual(&mut self.rng);
            self.population.push(individual);
        }

        let mut population = std::mem::take(&mut self.population);
        for individual in population.iter_mut() {
            self.evaluate(individual)?;
        }
        self.population = population;

        self.record_generation()?;
        Ok(())
    }

    /// Run the algorithm until the stopping criterion is satisfied.
    ///
    /// Returns a copy of the best individual found.
    pub fn run(&mut self) -> Result<Individual> {
        info!(
            "Starting run: population {}, budget {}, seed {}",
            self.config.population_size,
            self.config.max_function_evaluations,
            self.config.random_seed
        );
        self.metrics.start_timer();

        self.initialize()?;

        while !self.stopping_criterion.is_satisfied(&*self) {
            self.step()?;
        }

        self.metrics.stop_timer();
        self.run_time = self.metrics.execution_time();

        let best = self.best_solution.clone().ok_or(Error::EmptyPopulation)?;
        info!(
            "Run finished after {} evaluations and {} generations in {}: best fitness {}",
            self.function_evaluations,
            self.generations,
            utils::format_duration(self.run_time),
            best.fitness().unwrap_or_default()
        );
        Ok(best)
    }

    /// Perform one generation: select, recombine, mutate, evaluate, replace.
    fn step(&mut self) -> Result<()> {
        let parent1 = self.selection.select_parent(&self.population, &mut self.rng)?;
        let parent2 = self.selection.select_parent(&self.population, &mut self.rng)?;

        let child = self.crossover.apply(parent1, parent2, &mut self.rng)?;
        let mut child = self.mutation.apply(&child, &mut self.rng);

        self.evaluate(&mut child)?;

        let population = std::mem::take(&mut self.population);
        self.population = self.replacement.replace(population, vec![child])?;

        self.generations += 1;
        self.record_generation()
    }

    /// Score an individual, count the evaluation and track the best so far.
    fn evaluate(&mut self, individual: &mut Individual) -> Result<()> {
        let fitness = self.problem.evaluate(individual)?;
        individual.set_fitness(fitness);
        self.function_evaluations += 1;

        // Strictly greater: ties keep the earlier solution
        let improved = match &self.best_solution {
            Some(best) => fitness > best.evaluated_fitness()?,
            None => true,
        };
        if improved {
            debug!(
                "New best fitness {} after {} evaluations",
                fitness, self.function_evaluations
            );
            self.best_solution = Some(individual.clone());
        }
        Ok(())
    }

    fn record_generation(&mut self) -> Result<()> {
        let best = self
            .best_solution
            .as_ref()
            .ok_or(Error::EmptyPopulation)?
            .evaluated_fitness()?;
        trace!("Generation {}: best fitness {}", self.generations, best);
        self.metrics.record_generation(self.generations, best);
        Ok(())
    }

    /// The current population.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// The best individual found so far.
    pub fn best_solution(&self) -> Option<&Individual> {
        self.best_solution.as_ref()
    }

    /// Number of fitness evaluations performed.
    pub fn function_evaluations(&self) -> u64 {
        self.function_evaluations
    }

    /// Number of generations after the initial population.
    pub fn generations(&self) -> u64 {
        self.generations
    }

    /// Wall-clock duration of the last completed run.
    pub fn run_time(&self) -> Duration {
        self.run_time
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }
}

impl<P: Problem + Serialize> EvolutionaryAlgorithm<P> {
    /// Build the report of a finished run.
    pub fn report(&self, problem_index: usize) -> Result<RunReport> {
        let best = self.best_solution.as_ref().ok_or(Error::EmptyPopulation)?;

        Ok(RunReport {
            best_individual: ReportIndividual {
                fitness: best.evaluated_fitness()?,
                chromosome: best.chromosome().to_vec(),
            },
            execution_time: self.metrics.execution_time().as_millis() as u64,
            number_of_evaluations: self.function_evaluations,
            number_of_generations: self.generations,
            problem: serde_json::to_value(&self.problem)?,
            parameters: ReportParameters {
                config: self.config.clone(),
                problem_index,
            },
            generation_best_individuals: self.metrics.generation_best().to_vec(),
        })
    }
}

impl<P: Problem> RunState for EvolutionaryAlgorithm<P> {
    fn function_evaluations(&self) -> u64 {
        self.function_evaluations
    }

    fn best_fitness(&self) -> Option<f64> {
        self.best_solution.as_ref().and_then(Individual::fitness)
    }

    fn elapsed(&self) -> Duration {
        self.metrics.execution_time()
    }
}

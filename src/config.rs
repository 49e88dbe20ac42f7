//! Configuration parameters for the evolutionary algorithm.

use crate::error::{check_probability, Error, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock ceiling used when the algorithm runs until the optimum is found.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(60_000);

/// Configuration settings for the evolutionary algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Number of individuals kept in the population
    pub population_size: usize,
    /// Evaluation budget; a negative value means "run to the optimum or the time limit"
    pub max_function_evaluations: i64,
    /// Probability of *skipping* recombination and returning the first parent
    pub crossover_probability: f64,
    /// Per-bit flip probability
    pub mutation_probability: f64,
    /// Seed of the run's random number generator
    pub random_seed: u64,
    /// Time limit used by the optimum-seeking stopping criterion
    #[serde(with = "duration_millis")]
    pub time_limit: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            population_size: 100,
            max_function_evaluations: 10_000,
            crossover_probability: 0.2,
            mutation_probability: 0.01,
            random_seed: wall_clock_seed(),
            time_limit: DEFAULT_TIME_LIMIT,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the evaluation budget. Negative values select optimum-seeking mode.
    pub fn with_max_function_evaluations(mut self, evaluations: i64) -> Self {
        self.max_function_evaluations = evaluations;
        self
    }

    /// Set the probability of skipping recombination.
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability;
        self
    }

    /// Set the per-bit mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    /// Set the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = duration;
        self
    }

    /// Whether the evaluation budget is unbounded.
    pub fn seeks_optimum(&self) -> bool {
        self.max_function_evaluations < 0
    }

    /// Reject configurations the algorithm cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::invalid("population_size", "must be greater than 0"));
        }
        check_probability("crossover_probability", self.crossover_probability)?;
        check_probability("mutation_probability", self.mutation_probability)?;
        Ok(())
    }
}

/// Milliseconds since the Unix epoch, used when no seed is given.
pub fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

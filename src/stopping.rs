//! Stopping criteria evaluated once per generation against the live run state.

use crate::config::Config;
use std::time::Duration;

/// Read-only view of a running algorithm.
pub trait RunState {
    /// Number of fitness evaluations performed so far.
    fn function_evaluations(&self) -> u64;
    /// Fitness of the best individual found so far.
    fn best_fitness(&self) -> Option<f64>;
    /// Wall-clock time since the run started.
    fn elapsed(&self) -> Duration;
}

/// Predicate deciding when the run terminates.
pub trait StoppingCriterion {
    fn is_satisfied(&self, state: &dyn RunState) -> bool;
}

/// Stops once the evaluation counter reaches the limit.
#[derive(Debug, Clone, Copy)]
pub struct MaxFunctionEvaluations {
    pub limit: u64,
}

impl MaxFunctionEvaluations {
    pub fn new(limit: u64) -> Self {
        MaxFunctionEvaluations { limit }
    }
}

impl StoppingCriterion for MaxFunctionEvaluations {
    fn is_satisfied(&self, state: &dyn RunState) -> bool {
        state.function_evaluations() >= self.limit
    }
}

/// Stops when the best fitness reaches the known optimum or the time limit expires.
#[derive(Debug, Clone, Copy)]
pub struct OptimalSolutionOrTimeLimit {
    pub optimal_value: f64,
    pub time_limit: Duration,
}

impl OptimalSolutionOrTimeLimit {
    pub fn new(optimal_value: f64, time_limit: Duration) -> Self {
        OptimalSolutionOrTimeLimit {
            optimal_value,
            time_limit,
        }
    }
}

impl StoppingCriterion for OptimalSolutionOrTimeLimit {
    fn is_satisfied(&self, state: &dyn RunState) -> bool {
        let optimum_reached = state
            .best_fitness()
            .map_or(false, |fitness| fitness >= self.optimal_value);
        optimum_reached || state.elapsed() >= self.time_limit
    }
}

/// Pick the criterion for a configuration: a non-negative budget counts
/// evaluations, a negative one seeks the optimum under the time limit.
pub fn criterion_for(config: &Config, optimal_value: f64) -> Box<dyn StoppingCriterion> {
    if config.seeks_optimum() {
        Box::new(OptimalSolutionOrTimeLimit::new(
            optimal_value,
            config.time_limit,
        ))
    } else {
        Box::new(MaxFunctionEvaluations::new(
            config.max_function_evaluations as u64,
        ))
    }
}

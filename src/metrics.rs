//! Run metrics and the JSON report written after a run.

use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Best fitness observed at the end of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub generation_number: u64,
    pub best_individual_fitness: f64,
}

/// Collects timing and the best-fitness trace of a run.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    start_time: Option<Instant>,
    end_time: Option<Instant>,
    generation_best: Vec<GenerationRecord>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        MetricsCollector::default()
    }

    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
        self.end_time = None;
    }

    /// Forget the best-fitness trace of an earlier run.
    pub fn clear_generations(&mut self) {
        self.generation_best.clear();
    }

    pub fn stop_timer(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Time between start and stop, or since start while still running.
    pub fn execution_time(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Record the best fitness after `generation`.
    ///
    /// Plateaus are stored as their first and last generation only: when the
    /// two latest records already hold this fitness, the latest one is moved
    /// forward instead of appending.
    pub fn record_generation(&mut self, generation: u64, best_fitness: f64) {
        let record = GenerationRecord {
            generation_number: generation,
            best_individual_fitness: best_fitness,
        };

        if let [.., previous, last] = self.generation_best.as_mut_slice() {
            if previous.best_individual_fitness == best_fitness
                && last.best_individual_fitness == best_fitness
            {
                *last = record;
                return;
            }
        }
        self.generation_best.push(record);
    }

    pub fn generation_best(&self) -> &[GenerationRecord] {
        &self.generation_best
    }
}

/// Best individual as written to the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportIndividual {
    pub fitness: f64,
    pub chromosome: Vec<u8>,
}

/// Run parameters as written to the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParameters {
    #[serde(flatten)]
    pub config: Config,
    pub problem_index: usize,
}

/// Everything known about a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub best_individual: ReportIndividual,
    /// Milliseconds
    pub execution_time: u64,
    pub number_of_evaluations: u64,
    pub number_of_generations: u64,
    pub problem: serde_json::Value,
    pub parameters: ReportParameters,
    pub generation_best_individuals: Vec<GenerationRecord>,
}

impl RunReport {
    /// Write the report as pretty-printed JSON.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// One-line summary, flagging runs that reached `optimal_value`.
    pub fn summary(&self, optimal_value: f64) -> String {
        let optimum = if self.best_individual.fitness >= optimal_value {
            " (Optimum)"
        } else {
            ""
        };
        format!(
            "Best Individual: {}{}, Execution Time: {} ms, Evaluations: {}, Generations: {}",
            self.best_individual.fitness,
            optimum,
            self.execution_time,
            self.number_of_evaluations,
            self.number_of_generations
        )
    }
}

//! Individual representation for the evolutionary algorithm population.

use crate::error::{Error, Result};
use itertools::Itertools;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A binary-encoded candidate solution and its cached fitness.
///
/// The chromosome length is fixed at creation. Operators never modify an
/// individual in place; they return new ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Item inclusion bits, each 0 or 1
    chromosome: Vec<u8>,
    /// Fitness, `None` until evaluated
    fitness: Option<f64>,
}

impl Individual {
    /// Create an unevaluated individual from a chromosome.
    pub fn new(chromosome: Vec<u8>) -> Self {
        Individual {
            chromosome,
            fitness: None,
        }
    }

    /// Create an individual with every bit drawn uniformly from {0, 1}.
    pub fn random(length: usize, rng: &mut dyn RngCore) -> Self {
        let chromosome = (0..length).map(|_| rng.gen_range(0..=1u8)).collect();
        Individual::new(chromosome)
    }

    pub fn chromosome(&self) -> &[u8] {
        &self.chromosome
    }

    pub fn len(&self) -> usize {
        self.chromosome.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosome.is_empty()
    }

    /// The cached fitness, if the individual has been evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// The cached fitness, or [`Error::NotEvaluated`].
    pub fn evaluated_fitness(&self) -> Result<f64> {
        self.fitness.ok_or(Error::NotEvaluated)
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Number of selected items.
    pub fn count_ones(&self) -> usize {
        self.chromosome.iter().filter(|&&bit| bit == 1).count()
    }

    /// Iterate over the indices of selected items.
    pub fn selected_items(&self) -> impl Iterator<Item = usize> + '_ {
        self.chromosome
            .iter()
            .enumerate()
            .filter(|(_, &bit)| bit == 1)
            .map(|(i, _)| i)
    }

    /// Fail unless the chromosome has `expected` bits.
    pub fn ensure_length(&self, expected: usize) -> Result<()> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(Error::ChromosomeLengthMismatch {
                expected,
                found: self.len(),
            })
        }
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fitness {
            Some(fitness) => write!(f, "Individual [fitness={}, ", fitness)?,
            None => write!(f, "Individual [fitness=?, ")?,
        }
        write!(f, "chromosome={}]", self.chromosome.iter().join(""))
    }
}

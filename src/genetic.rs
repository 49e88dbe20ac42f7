//! Genetic operators: recombination and mutation of binary chromosomes.
//!
//! Operators are stateless apart from their parameters. Randomness always comes
//! from the generator passed in by the caller, so a run is reproducible from its
//! seed.

use crate::error::{check_probability, Result};
use crate::individual::Individual;
use rand::{Rng, RngCore};

/// Combines two parents into one child.
pub trait Crossover {
    fn apply(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        rng: &mut dyn RngCore,
    ) -> Result<Individual>;
}

/// Perturbs an individual, returning a new one.
pub trait Mutation {
    fn apply(&self, individual: &Individual, rng: &mut dyn RngCore) -> Individual;
}

/// Single-point crossover.
///
/// Note the direction of the probability: with probability
/// `crossover_probability` recombination is *skipped* and the child is a copy
/// of the first parent. A probability of 1.0 therefore never recombines.
#[derive(Debug, Clone, Copy)]
pub struct SinglePointCrossover {
    crossover_probability: f64,
}

impl SinglePointCrossover {
    pub fn new(crossover_probability: f64) -> Result<Self> {
        check_probability("crossover_probability", crossover_probability)?;
        Ok(SinglePointCrossover {
            crossover_probability,
        })
    }

    pub fn crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    /// Child taking bits `[0, cut_point)` from `parent1` and the rest from `parent2`.
    ///
    /// Both parents must have the same length.
    pub fn recombine(parent1: &Individual, parent2: &Individual, cut_point: usize) -> Individual {
        let mut chromosome = parent1.chromosome().to_vec();
        chromosome[cut_point..].copy_from_slice(&parent2.chromosome()[cut_point..]);
        Individual::new(chromosome)
    }
}

impl Crossover for SinglePointCrossover {
    fn apply(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        rng: &mut dyn RngCore,
    ) -> Result<Individual> {
        parent2.ensure_length(parent1.len())?;

        if rng.gen::<f64>() < self.crossover_probability {
            return Ok(Individual::new(parent1.chromosome().to_vec()));
        }

        // A cut point equal to the length copies parent1 unchanged
        let cut_point = rng.gen_range(0..=parent1.len());
        Ok(Self::recombine(parent1, parent2, cut_point))
    }
}

/// Independent bit-flip mutation.
#[derive(Debug, Clone, Copy)]
pub struct BitFlipMutation {
    mutation_probability: f64,
}

impl BitFlipMutation {
    pub fn new(mutation_probability: f64) -> Result<Self> {
        check_probability("mutation_probability", mutation_probability)?;
        Ok(BitFlipMutation {
            mutation_probability,
        })
    }

    pub fn mutation_probability(&self) -> f64 {
        self.mutation_probability
    }
}

impl Mutation for BitFlipMutation {
    fn apply(&self, individual: &Individual, rng: &mut dyn RngCore) -> Individual {
        // One draw per position, even when nothing can flip
        let chromosome = individual
            .chromosome()
            .iter()
            .map(|&bit| {
                // Anything other than 1 reads as an unselected item
                if rng.gen::<f64>() < self.mutation_probability {
                    u8::from(bit != 1)
                } else {
                    bit
                }
            })
            .collect();
        Individual::new(chromosome)
    }
}

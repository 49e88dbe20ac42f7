//! Population management: parent selection and survivor replacement.

use crate::error::{Error, Result};
use crate::individual::Individual;
use rand::{Rng, RngCore};
use std::cmp::Ordering;

/// Chooses one parent from the population.
pub trait Selection {
    fn select_parent<'a>(
        &self,
        population: &'a [Individual],
        rng: &mut dyn RngCore,
    ) -> Result<&'a Individual>;
}

/// Folds offspring into the population, keeping its size.
pub trait Replacement {
    fn replace(
        &self,
        population: Vec<Individual>,
        offspring: Vec<Individual>,
    ) -> Result<Vec<Individual>>;
}

/// Binary tournament selection.
///
/// Two individuals are drawn uniformly with replacement and the fitter one
/// wins. On equal fitness the second draw wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryTournament;

impl Selection for BinaryTournament {
    fn select_parent<'a>(
        &self,
        population: &'a [Individual],
        rng: &mut dyn RngCore,
    ) -> Result<&'a Individual> {
        if population.is_empty() {
            return Err(Error::EmptyPopulation);
        }

        let first = &population[rng.gen_range(0..population.len())];
        let second = &population[rng.gen_range(0..population.len())];

        if first.evaluated_fitness()? > second.evaluated_fitness()? {
            Ok(first)
        } else {
            Ok(second)
        }
    }
}

/// Elitist truncation: keep the best `population.len()` of population and offspring.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElitistReplacement;

impl Replacement for ElitistReplacement {
    fn replace(
        &self,
        population: Vec<Individual>,
        offspring: Vec<Individual>,
    ) -> Result<Vec<Individual>> {
        let population_size = population.len();

        let mut merged = population;
        merged.extend(offspring);
        for individual in &merged {
            individual.evaluated_fitness()?;
        }

        // Stable sort: on ties current members stay ahead of offspring
        merged.sort_by(|a, b| compare_fitness(b, a));
        merged.truncate(population_size);
        Ok(merged)
    }
}

/// Order individuals by fitness; unevaluated individuals compare as equal.
pub fn compare_fitness(a: &Individual, b: &Individual) -> Ordering {
    match (a.fitness(), b.fitness()) {
        (Some(fa), Some(fb)) => fa.partial_cmp(&fb).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

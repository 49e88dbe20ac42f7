//! Problem definitions: the Multidimensional Knapsack Problem and its instance loader.

use crate::error::{Error, Result};
use crate::individual::Individual;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A fitness model the evolutionary algorithm can optimize.
pub trait Problem {
    /// Chromosome length of every individual for this problem.
    fn number_items(&self) -> usize;

    /// Compute the fitness of an individual.
    fn evaluate(&self, individual: &Individual) -> Result<f64>;

    /// Produce an unevaluated individual with uniformly random bits.
    fn generate_random_individual(&self, rng: &mut dyn RngCore) -> Individual {
        Individual::random(self.number_items(), rng)
    }

    /// The known optimal fitness.
    fn optimal_value(&self) -> f64;
}

/// Represents a 0/1 Multidimensional Knapsack Problem instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultidimensionalKnapsack {
    pub number_items: usize,
    pub number_constraints: usize,
    pub optimal_value: f64,
    pub profits: Vec<f64>,
    /// `number_constraints` rows of `number_items` resource usages
    pub constraints: Vec<Vec<f64>>,
    pub capacities: Vec<f64>,
}

impl MultidimensionalKnapsack {
    /// Create a new MKP instance, checking that all dimensions agree.
    pub fn new(
        optimal_value: f64,
        profits: Vec<f64>,
        constraints: Vec<Vec<f64>>,
        capacities: Vec<f64>,
    ) -> Result<Self> {
        let number_items = profits.len();
        let number_constraints = capacities.len();

        if constraints.len() != number_constraints {
            return Err(Error::invalid(
                "constraints",
                format!(
                    "{} constraint rows for {} capacities",
                    constraints.len(),
                    number_constraints
                ),
            ));
        }
        if let Some((row, weights)) = constraints
            .iter()
            .enumerate()
            .find(|(_, weights)| weights.len() != number_items)
        {
            return Err(Error::invalid(
                "constraints",
                format!(
                    "row {} has {} weights for {} items",
                    row,
                    weights.len(),
                    number_items
                ),
            ));
        }
        if constraints.iter().flatten().any(|&w| w < 0.0) {
            return Err(Error::invalid("constraints", "resource usages must be non-negative"));
        }

        Ok(MultidimensionalKnapsack {
            number_items,
            number_constraints,
            optimal_value,
            profits,
            constraints,
            capacities,
        })
    }

    /// Total profit of the selected items, ignoring capacities.
    pub fn total_profit(&self, individual: &Individual) -> f64 {
        individual.selected_items().map(|i| self.profits[i]).sum()
    }

    /// Resource usage of the selected items, one entry per constraint.
    pub fn resource_usage(&self, individual: &Individual) -> Vec<f64> {
        self.constraints
            .iter()
            .map(|weights| individual.selected_items().map(|i| weights[i]).sum())
            .collect()
    }

    /// Whether every capacity constraint holds.
    pub fn is_feasible(&self, individual: &Individual) -> bool {
        self.resource_usage(individual)
            .iter()
            .zip(&self.capacities)
            .all(|(usage, capacity)| usage <= capacity)
    }
}

impl Problem for MultidimensionalKnapsack {
    fn number_items(&self) -> usize {
        self.number_items
    }

    /// Total profit, or exactly 0.0 as soon as one capacity is exceeded.
    fn evaluate(&self, individual: &Individual) -> Result<f64> {
        individual.ensure_length(self.number_items)?;

        if !self.is_feasible(individual) {
            return Ok(0.0);
        }
        Ok(self.total_profit(individual))
    }

    fn optimal_value(&self) -> f64 {
        self.optimal_value
    }
}

/// Counts set bits. The optimum is a chromosome of all ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Onemax {
    pub length: usize,
}

impl Onemax {
    pub fn new(length: usize) -> Self {
        Onemax { length }
    }
}

impl Problem for Onemax {
    fn number_items(&self) -> usize {
        self.length
    }

    fn evaluate(&self, individual: &Individual) -> Result<f64> {
        individual.ensure_length(self.length)?;
        Ok(individual.count_ones() as f64)
    }

    fn optimal_value(&self) -> f64 {
        self.length as f64
    }
}

/// Load every instance from an OR-Library `mknap` file.
pub fn load_instances<P: AsRef<Path>>(path: P) -> Result<Vec<MultidimensionalKnapsack>> {
    let content = fs::read_to_string(path)?;
    parse_instances(&content)
}

/// Pick the instance at `index`.
pub fn select_instance(
    mut instances: Vec<MultidimensionalKnapsack>,
    index: usize,
) -> Result<MultidimensionalKnapsack> {
    let count = instances.len();
    if index >= count {
        return Err(Error::ProblemIndexOutOfRange { index, count });
    }
    Ok(instances.swap_remove(index))
}

/// Parse instances from text.
///
/// The input starts with the instance count. Each instance is a header
/// `<items> <constraints> <optimum>` followed by the profits, one weight row per
/// constraint and the capacities. Values are whitespace separated and may wrap
/// across lines.
pub fn parse_instances(content: &str) -> Result<Vec<MultidimensionalKnapsack>> {
    let mut tokens = Tokens::new(content);

    let count: usize = tokens.next_value("instance count")?;
    // The count comes from the file, so it is not trusted for preallocation
    let mut instances = Vec::new();

    for _ in 0..count {
        let number_items: usize = tokens.next_value("number of items")?;
        let number_constraints: usize = tokens.next_value("number of constraints")?;
        let optimal_value: f64 = tokens.next_value("optimal value")?;

        let profits = tokens.next_values(number_items, "profits")?;
        let constraints = (0..number_constraints)
            .map(|_| tokens.next_values(number_items, "constraint weights"))
            .collect::<Result<Vec<_>>>()?;
        let capacities = tokens.next_values(number_constraints, "capacities")?;

        instances.push(MultidimensionalKnapsack::new(
            optimal_value,
            profits,
            constraints,
            capacities,
        )?);
    }

    Ok(instances)
}

/// Whitespace tokenizer that remembers line numbers for error messages.
struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        let inner = content
            .lines()
            .enumerate()
            .flat_map(|(i, line)| line.split_whitespace().map(move |token| (i + 1, token)));
        Tokens {
            inner: Box::new(inner),
        }
    }

    fn next_value<T: std::str::FromStr>(&mut self, what: &'static str) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        let (line, token) = self.inner.next().ok_or(Error::UnexpectedEof(what))?;
        token.parse::<T>().map_err(|e| Error::Parse {
            line,
            message: format!("invalid {} `{}`: {}", what, token, e),
        })
    }

    fn next_values(&mut self, count: usize, what: &'static str) -> Result<Vec<f64>> {
        (0..count).map(|_| self.next_value(what)).collect()
    }
}

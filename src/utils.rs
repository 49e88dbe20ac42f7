//! Utility functions for presenting runs and solutions.

use std::time::Duration;

use crate::individual::Individual;
use crate::problem::MultidimensionalKnapsack;

/// Format a duration as hours, minutes, seconds and milliseconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!(
        "{}h {:02}m {:02}s {:03}ms",
        hours,
        minutes,
        seconds,
        duration.subsec_millis()
    )
}

/// Describe a knapsack solution: selected items and the load on every constraint.
pub fn describe_solution(solution: &Individual, problem: &MultidimensionalKnapsack) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Fitness: {}",
        solution
            .fitness()
            .map_or_else(|| "not evaluated".to_string(), |f| f.to_string())
    ));
    lines.push(format!(
        "Profit: {:.2} / optimum {:.2}",
        problem.total_profit(solution),
        problem.optimal_value
    ));
    lines.push(format!(
        "Feasible: {}",
        problem.is_feasible(solution)
    ));
    lines.push(format!(
        "Selected items ({} of {}): {:?}",
        solution.count_ones(),
        problem.number_items,
        solution.selected_items().collect::<Vec<_>>()
    ));

    let usage = problem.resource_usage(solution);
    for (i, (load, capacity)) in usage.iter().zip(&problem.capacities).enumerate() {
        let marker = if load > capacity { " (exceeded)" } else { "" };
        lines.push(format!(
            "  Constraint #{}: {:.2} / {:.2}{}",
            i + 1,
            load,
            capacity,
            marker
        ));
    }

    lines.join("\n")
}

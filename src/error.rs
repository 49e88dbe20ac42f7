//! Error types for the MKP evolutionary algorithm.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring, loading instances for, or running the algorithm.
#[derive(Debug, Error)]
pub enum Error {
    // Configuration errors
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    // Instance loading errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("Problem index {index} out of range ({count} instances loaded)")]
    ProblemIndexOutOfRange { index: usize, count: usize },

    // Invariant violations inside the algorithm
    #[error("Chromosome length mismatch: expected {expected}, found {found}")]
    ChromosomeLengthMismatch { expected: usize, found: usize },

    #[error("Cannot select from an empty population")]
    EmptyPopulation,

    #[error("Individual used before its fitness was evaluated")]
    NotEvaluated,

    // Report errors
    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Check that `value` is a usable probability.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(
            name,
            format!("{} is not a probability in [0, 1]", value),
        ))
    }
}

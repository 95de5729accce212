//! Error types for formula parsing and evaluation.

use thiserror::Error;

/// Result type for formula operations.
pub type FormulaResult<T> = Result<T, FormulaError>;

/// Everything that can go wrong while parsing or evaluating a formula.
///
/// Metric path resolution is deliberately absent here: an unresolvable path
/// on a snapshot is represented as `None`, and only becomes
/// [`FormulaError::InvalidMetricPath`] when a formula references it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// Input ended while a production was still open
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// A token the grammar has no use for at this position
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    /// A specific token type was required and something else appeared
    #[error("Expected {expected}, found {found}")]
    ExpectedToken {
        /// What the grammar required
        expected: &'static str,
        /// What the tokenizer produced
        found: String,
    },

    /// Function name outside the whitelist
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// A `group.field` reference that does not resolve on the current session
    #[error("Invalid metric path: {0}")]
    InvalidMetricPath(String),

    /// A context variable was used without a bound target metric
    #[error("Context variable '{0}' requires a target metric")]
    MissingTargetMetric(String),

    /// A bare identifier that is not a recognized context variable
    #[error("Unknown context variable: {0}")]
    UnknownContextVariable(String),

    /// Evaluation produced NaN or an infinity
    #[error("Formula result is not a finite number")]
    NonFiniteResult,
}

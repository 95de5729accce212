//! Metric expression engine for biomechanical session reports.
//!
//! Lets a report pipeline describe derived values as plain strings —
//! `"leftLeg.peakFlexion"`, `"current - previous"`,
//! `"max(leftLeg.peakFlexion, rightLeg.peakFlexion)"` — and evaluates them
//! safely against structured [`SessionMetrics`] snapshots, with no
//! general-purpose code evaluation anywhere. Every public function is a
//! pure, synchronous computation over its arguments; failures come back as
//! an [`EvaluatedValue`] with `success == false`, never a panic.

pub mod engine;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod path;
pub mod registry;

// Re-export main types
pub use engine::{evaluate_formula, evaluate_metric, resolve_metric_with_unit};
pub use evaluator::{ContextVariable, FormulaError, FormulaEvaluator, FormulaResult};
pub use model::{
    BilateralMetrics, EvaluatedValue, EvaluationContext, LegMetrics, MovementType, SessionMetrics,
};
pub use parser::{Token, Tokenizer, tokenize};
pub use path::{MetricGroup, metric_unit, resolve_metric_value};

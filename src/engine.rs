//! Public evaluation surface consumed by the report-rendering layer.
//!
//! The two expression grammars keep two distinct entry points on purpose:
//! [`evaluate_metric`] treats its input as a plain metric path and
//! [`evaluate_formula`] as arithmetic. There is no auto-detection.
//!
//! This module is the single error boundary of the crate. Every
//! [`FormulaError`] is absorbed here and normalized into an
//! [`EvaluatedValue`] with `success == false`; nothing below panics and
//! nothing propagates to the caller.

use log::debug;

use crate::evaluator::{FormulaError, FormulaEvaluator};
use crate::model::{EvaluatedValue, EvaluationContext};
use crate::path::{metric_unit, resolve_metric_value};

/// Resolve `expr` as a plain metric path against the current session.
///
/// No formula grammar is applied. Failure yields the `"N/A"` placeholder.
pub fn evaluate_metric(expr: &str, context: &EvaluationContext) -> EvaluatedValue {
    match resolve_metric_value(expr, &context.current) {
        Some(value) => EvaluatedValue::success(value, format!("{value:.1}")),
        None => EvaluatedValue::failure("N/A"),
    }
}

/// Tokenize, parse, and evaluate a formula against the context.
///
/// `target_metric`, when given, binds the metric that context variables
/// (`current`, `previous`, ...) resolve. Successful results are formatted
/// as a signed percentage (`"+10.0%"`), which the report layer shows as a
/// change badge; see DESIGN.md for the formatting caveat on
/// non-percentage formulas.
pub fn evaluate_formula(
    formula: &str,
    context: &EvaluationContext,
    target_metric: Option<&str>,
) -> EvaluatedValue {
    match FormulaEvaluator::evaluate(formula, context, target_metric) {
        Ok(value) if value.is_finite() => {
            debug!("formula {formula:?} -> {value}");
            EvaluatedValue::success(value, format!("{value:+.1}%"))
        }
        Ok(value) => {
            debug!("formula {formula:?} -> non-finite {value}");
            EvaluatedValue::failure_with_error("N/A", FormulaError::NonFiniteResult.to_string())
        }
        Err(err) => {
            debug!("formula {formula:?} failed: {err}");
            EvaluatedValue::failure_with_error("Error", err.to_string())
        }
    }
}

/// Like [`evaluate_metric`], with a unit suffix in the display string.
///
/// The unit is the caller's when supplied, otherwise derived from the
/// path's unit tag; score-like metrics stay bare.
pub fn resolve_metric_with_unit(
    expr: &str,
    context: &EvaluationContext,
    unit: Option<&str>,
) -> EvaluatedValue {
    match resolve_metric_value(expr, &context.current) {
        Some(value) => {
            let formatted = match unit.or_else(|| metric_unit(expr)) {
                Some(unit) => format!("{value:.1} {unit}"),
                None => format!("{value:.1}"),
            };
            EvaluatedValue::success(value, formatted)
        }
        None => EvaluatedValue::failure("N/A"),
    }
}

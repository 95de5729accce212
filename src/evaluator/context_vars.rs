//! Context variable resolution.
//!
//! The six symbolic keywords (`current`, `previous`, `baseline`, `average`,
//! `min`, `max`) read the bound target metric across the sessions of an
//! [`EvaluationContext`]. The target is set by the caller before
//! evaluation; it is never parsed out of the formula itself.

use log::trace;

use super::error::{FormulaError, FormulaResult};
use crate::model::EvaluationContext;
use crate::path::resolve_metric_value;

/// The symbolic keywords a formula may use as bare identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextVariable {
    /// Target metric on the current session
    Current,
    /// Target metric on the immediately prior session (0 when absent)
    Previous,
    /// Target metric on the reference session (0 when absent)
    Baseline,
    /// Mean of the target metric across the history
    Average,
    /// Minimum of the target metric across the history
    Min,
    /// Maximum of the target metric across the history
    Max,
}

impl ContextVariable {
    /// Parse a keyword as it appears in formulas.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "current" => Some(Self::Current),
            "previous" => Some(Self::Previous),
            "baseline" => Some(Self::Baseline),
            "average" => Some(Self::Average),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            _ => None,
        }
    }

    /// The keyword spelling of this variable.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Previous => "previous",
            Self::Baseline => "baseline",
            Self::Average => "average",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// Resolve one context variable for the given target metric.
///
/// `current` must resolve or the call fails; `previous`/`baseline` treat an
/// absent session or field as `0`. The aggregates run over the history
/// sessions where the target resolves and fall back to the `current` value
/// when nothing does.
pub fn resolve_context_variable(
    variable: ContextVariable,
    target: &str,
    context: &EvaluationContext,
) -> FormulaResult<f64> {
    let value = match variable {
        ContextVariable::Current => resolve_metric_value(target, &context.current)
            .ok_or_else(|| FormulaError::InvalidMetricPath(target.to_string()))?,
        ContextVariable::Previous => context
            .previous
            .as_ref()
            .and_then(|session| resolve_metric_value(target, session))
            .unwrap_or(0.0),
        ContextVariable::Baseline => context
            .baseline
            .as_ref()
            .and_then(|session| resolve_metric_value(target, session))
            .unwrap_or(0.0),
        ContextVariable::Average => {
            let values = history_values(target, context);
            if values.is_empty() {
                resolve_context_variable(ContextVariable::Current, target, context)?
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        }
        ContextVariable::Min => {
            let values = history_values(target, context);
            if values.is_empty() {
                resolve_context_variable(ContextVariable::Current, target, context)?
            } else {
                values.iter().copied().fold(f64::INFINITY, f64::min)
            }
        }
        ContextVariable::Max => {
            let values = history_values(target, context);
            if values.is_empty() {
                resolve_context_variable(ContextVariable::Current, target, context)?
            } else {
                values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            }
        }
    };
    trace!("context variable {} ({target}) -> {value}", variable.name());
    Ok(value)
}

/// Target metric across the history, keeping only sessions where it
/// resolves. History order is the caller's (ascending by `recorded_at`).
fn history_values(target: &str, context: &EvaluationContext) -> Vec<f64> {
    context
        .history
        .iter()
        .filter_map(|session| resolve_metric_value(target, session))
        .collect()
}

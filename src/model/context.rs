//! Multi-session evaluation context.

use serde::{Deserialize, Serialize};

use super::session::SessionMetrics;

/// The bundle of session snapshots supplied to the evaluator for one
/// rendering pass.
///
/// `history` is assumed sorted ascending by `recorded_at`; the engine never
/// re-sorts it. An empty `history` means no history was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    /// The session being rendered
    pub current: SessionMetrics,
    /// The immediately prior session, when one exists
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous: Option<SessionMetrics>,
    /// The first/reference session, when one exists
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub baseline: Option<SessionMetrics>,
    /// All sessions ascending by `recorded_at`
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub history: Vec<SessionMetrics>,
}

impl EvaluationContext {
    /// Create a context holding only the current session.
    pub fn new(current: SessionMetrics) -> Self {
        Self {
            current,
            previous: None,
            baseline: None,
            history: Vec::new(),
        }
    }

    /// Attach the immediately prior session.
    pub fn with_previous(mut self, previous: SessionMetrics) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Attach the reference session.
    pub fn with_baseline(mut self, baseline: SessionMetrics) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Attach the full session history (caller guarantees ascending order).
    pub fn with_history(mut self, history: Vec<SessionMetrics>) -> Self {
        self.history = history;
        self
    }
}

//! Terminal output type of the engine.

use serde::{Deserialize, Serialize};

/// Result of one evaluation call: the numeric value plus a display string.
///
/// Created fresh per call and never shared or mutated afterward. On failure
/// `value` is `0.0` and `formatted` is the placeholder text the rendering
/// layer shows in place of a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedValue {
    /// The computed number (`0.0` on failure)
    pub value: f64,
    /// Display string for the rendering layer
    pub formatted: String,
    /// Whether evaluation succeeded
    pub success: bool,
    /// Human-readable failure description, when one exists
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl EvaluatedValue {
    /// A successful result.
    pub fn success(value: f64, formatted: impl Into<String>) -> Self {
        Self {
            value,
            formatted: formatted.into(),
            success: true,
            error: None,
        }
    }

    /// A failed result with only placeholder text.
    pub fn failure(formatted: impl Into<String>) -> Self {
        Self {
            value: 0.0,
            formatted: formatted.into(),
            success: false,
            error: None,
        }
    }

    /// A failed result carrying a diagnostic message.
    pub fn failure_with_error(formatted: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            value: 0.0,
            formatted: formatted.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_skips_absent_error() {
        let ok = EvaluatedValue::success(10.0, "+10.0%");
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["formatted"], "+10.0%");

        let failed = EvaluatedValue::failure_with_error("Error", "Unknown function: foo");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], "Unknown function: foo");
        assert_eq!(json["value"], 0.0);
    }
}

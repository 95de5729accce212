//! Session metric snapshots produced by the upstream processing pipeline.
//!
//! These types mirror the JSON shape the dashboard backend emits, hence the
//! camelCase serde renames. The engine only ever borrows them; nothing in
//! this crate mutates a snapshot after construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Movement pattern a session was recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Loaded or bodyweight squat repetitions
    Squat,
    /// Overground or treadmill gait
    Gait,
}

/// Per-leg computed measurements for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegMetrics {
    /// Maximum range of motion across the session (degrees)
    pub max_range_of_motion: f64,
    /// Mean per-repetition range of motion (degrees)
    pub avg_range_of_motion: f64,
    /// Peak flexion angle (degrees)
    pub peak_flexion: f64,
    /// Peak extension angle (degrees)
    pub peak_extension: f64,
    /// Peak angular velocity (degrees per second)
    pub peak_angular_velocity: f64,
    /// Concentric-phase explosiveness score
    pub explosiveness_concentric: f64,
    /// Eccentric-phase explosiveness score
    pub explosiveness_eccentric: f64,
    /// Root-mean-square jerk, a smoothness proxy
    pub rms_jerk: f64,
    /// Coefficient of variation of per-repetition range (percent)
    pub range_cv: f64,
}

impl LegMetrics {
    /// Look up a field by its wire (camelCase) name, as it appears in
    /// metric path expressions.
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "maxRangeOfMotion" => Some(self.max_range_of_motion),
            "avgRangeOfMotion" => Some(self.avg_range_of_motion),
            "peakFlexion" => Some(self.peak_flexion),
            "peakExtension" => Some(self.peak_extension),
            "peakAngularVelocity" => Some(self.peak_angular_velocity),
            "explosivenessConcentric" => Some(self.explosiveness_concentric),
            "explosivenessEccentric" => Some(self.explosiveness_eccentric),
            "rmsJerk" => Some(self.rms_jerk),
            "rangeCv" => Some(self.range_cv),
            _ => None,
        }
    }
}

/// Left/right comparison measurements for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BilateralMetrics {
    /// Limb asymmetry index (percent, positive favors the left leg)
    pub asymmetry_index: f64,
    /// Cross-correlation of the two angle traces
    pub correlation: f64,
    /// Left-vs-right timing offset (milliseconds)
    pub timing_offset: f64,
}

impl BilateralMetrics {
    /// Look up a field by its wire (camelCase) name.
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "asymmetryIndex" => Some(self.asymmetry_index),
            "correlation" => Some(self.correlation),
            "timingOffset" => Some(self.timing_offset),
            _ => None,
        }
    }
}

/// One session's computed measurements, as supplied by the backend query
/// layer. Immutable snapshot owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    /// Left-leg measurements
    pub left_leg: LegMetrics,
    /// Right-leg measurements
    pub right_leg: LegMetrics,
    /// Left/right comparison measurements
    pub bilateral: BilateralMetrics,
    /// Overall performance index, when the pipeline computed one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opi_score: Option<f64>,
    /// Movement pattern of the recording
    pub movement_type: MovementType,
    /// When the session was recorded
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg() -> LegMetrics {
        LegMetrics {
            max_range_of_motion: 120.0,
            avg_range_of_motion: 110.5,
            peak_flexion: 50.0,
            peak_extension: -5.0,
            peak_angular_velocity: 310.0,
            explosiveness_concentric: 7.2,
            explosiveness_eccentric: 6.8,
            rms_jerk: 0.42,
            range_cv: 4.1,
        }
    }

    #[test]
    fn field_lookup_uses_wire_names() {
        let leg = leg();
        assert_eq!(leg.field("peakFlexion"), Some(50.0));
        assert_eq!(leg.field("rangeCv"), Some(4.1));
        // Rust-side names are not part of the expression language
        assert_eq!(leg.field("peak_flexion"), None);
        assert_eq!(leg.field(""), None);
    }

    #[test]
    fn bilateral_field_lookup() {
        let bilateral = BilateralMetrics {
            asymmetry_index: 3.5,
            correlation: 0.97,
            timing_offset: 12.0,
        };
        assert_eq!(bilateral.field("asymmetryIndex"), Some(3.5));
        assert_eq!(bilateral.field("timingOffset"), Some(12.0));
        assert_eq!(bilateral.field("peakFlexion"), None);
    }

    #[test]
    fn session_round_trips_through_json_with_camel_case() {
        let session = SessionMetrics {
            left_leg: leg(),
            right_leg: leg(),
            bilateral: BilateralMetrics {
                asymmetry_index: 3.5,
                correlation: 0.97,
                timing_offset: 12.0,
            },
            opi_score: Some(82.0),
            movement_type: MovementType::Squat,
            recorded_at: Utc::now(),
        };

        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("leftLeg").is_some());
        assert!(json["leftLeg"].get("peakAngularVelocity").is_some());
        assert_eq!(json["movementType"], "squat");

        let back: SessionMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }
}

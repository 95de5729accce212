//! Metric path resolution.
//!
//! A metric path is a two-segment string `group.field` (or the bare literal
//! `opiScore`) identifying one numeric field inside a [`SessionMetrics`]
//! snapshot. Resolution is total: every malformed or unknown path collapses
//! to `None`, never an error. The rest of the engine leans on that.

use crate::model::SessionMetrics;

/// The three addressable metric groups inside a session snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricGroup {
    /// `leftLeg.*` fields
    LeftLeg,
    /// `rightLeg.*` fields
    RightLeg,
    /// `bilateral.*` fields
    Bilateral,
}

impl MetricGroup {
    /// Parse a group name as it appears in path expressions.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "leftLeg" => Some(Self::LeftLeg),
            "rightLeg" => Some(Self::RightLeg),
            "bilateral" => Some(Self::Bilateral),
            _ => None,
        }
    }

    /// The wire name of this group.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LeftLeg => "leftLeg",
            Self::RightLeg => "rightLeg",
            Self::Bilateral => "bilateral",
        }
    }
}

/// Resolve a metric path against one session snapshot.
///
/// `opiScore` reads the optional composite score; anything else must be
/// exactly `group.field` with a known group and field. Invalid input of any
/// shape yields `None`.
pub fn resolve_metric_value(path: &str, metrics: &SessionMetrics) -> Option<f64> {
    if path == "opiScore" {
        return metrics.opi_score;
    }

    let mut segments = path.split('.');
    let (group, field) = match (segments.next(), segments.next(), segments.next()) {
        (Some(group), Some(field), None) => (group, field),
        _ => return None,
    };

    match MetricGroup::from_name(group)? {
        MetricGroup::LeftLeg => metrics.left_leg.field(field),
        MetricGroup::RightLeg => metrics.right_leg.field(field),
        MetricGroup::Bilateral => metrics.bilateral.field(field),
    }
}

/// Display unit for a known metric path, for callers that did not supply
/// their own. Score-like metrics are unitless and yield `None`.
pub fn metric_unit(path: &str) -> Option<&'static str> {
    let field = match path.split_once('.') {
        Some(("leftLeg" | "rightLeg" | "bilateral", field)) => field,
        _ => return None,
    };
    match field {
        "maxRangeOfMotion" | "avgRangeOfMotion" | "peakFlexion" | "peakExtension" => Some("°"),
        "peakAngularVelocity" => Some("°/s"),
        "rmsJerk" => Some("°/s³"),
        "rangeCv" | "asymmetryIndex" => Some("%"),
        "timingOffset" => Some("ms"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BilateralMetrics, LegMetrics, MovementType};
    use chrono::Utc;

    fn session() -> SessionMetrics {
        let leg = LegMetrics {
            max_range_of_motion: 120.0,
            avg_range_of_motion: 110.0,
            peak_flexion: 50.0,
            peak_extension: -5.0,
            peak_angular_velocity: 310.0,
            explosiveness_concentric: 7.2,
            explosiveness_eccentric: 6.8,
            rms_jerk: 0.42,
            range_cv: 4.1,
        };
        SessionMetrics {
            left_leg: leg.clone(),
            right_leg: LegMetrics {
                peak_flexion: 47.5,
                ..leg
            },
            bilateral: BilateralMetrics {
                asymmetry_index: 3.5,
                correlation: 0.97,
                timing_offset: 12.0,
            },
            opi_score: Some(82.0),
            movement_type: MovementType::Squat,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn resolves_known_paths() {
        let metrics = session();
        assert_eq!(
            resolve_metric_value("leftLeg.peakFlexion", &metrics),
            Some(50.0)
        );
        assert_eq!(
            resolve_metric_value("rightLeg.peakFlexion", &metrics),
            Some(47.5)
        );
        assert_eq!(
            resolve_metric_value("bilateral.asymmetryIndex", &metrics),
            Some(3.5)
        );
        assert_eq!(resolve_metric_value("opiScore", &metrics), Some(82.0));
    }

    #[test]
    fn missing_opi_score_resolves_to_none() {
        let mut metrics = session();
        metrics.opi_score = None;
        assert_eq!(resolve_metric_value("opiScore", &metrics), None);
    }

    #[test]
    fn malformed_paths_collapse_to_none() {
        let metrics = session();
        assert_eq!(resolve_metric_value("", &metrics), None);
        assert_eq!(resolve_metric_value("leftLeg", &metrics), None);
        assert_eq!(resolve_metric_value("leftLeg.peakFlexion.extra", &metrics), None);
        assert_eq!(resolve_metric_value("torso.peakFlexion", &metrics), None);
        assert_eq!(resolve_metric_value("leftLeg.bogusField", &metrics), None);
        assert_eq!(resolve_metric_value("leftLeg.", &metrics), None);
        assert_eq!(resolve_metric_value(".peakFlexion", &metrics), None);
    }

    #[test]
    fn unit_table_covers_angular_and_score_fields() {
        assert_eq!(metric_unit("leftLeg.peakFlexion"), Some("°"));
        assert_eq!(metric_unit("rightLeg.peakAngularVelocity"), Some("°/s"));
        assert_eq!(metric_unit("bilateral.timingOffset"), Some("ms"));
        assert_eq!(metric_unit("leftLeg.explosivenessConcentric"), None);
        assert_eq!(metric_unit("opiScore"), None);
        assert_eq!(metric_unit("nonsense"), None);
    }
}

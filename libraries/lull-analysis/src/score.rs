//! Composite calmness score
//!
//! Blends three sub-scores with fixed weights:
//! - variance: short-term loudness stability (`1 - |varianceDB| / 10`)
//! - dynamic range: P95-P5 spread of the 1 s series (`1 - range / 0.5`)
//! - peak: how far the loudest second sticks out (`1 - (ratio - 1) / 5`)
//!
//! Sub-scores are floored at zero but not capped, and the rounded score is not
//! clamped to 100.

use crate::profile::{AmplitudeProfile, RmsProfile};
use serde::Serialize;

/// Weight of the variance sub-score
pub const VARIANCE_WEIGHT: f64 = 0.4;

/// Weight of the dynamic range sub-score
pub const DYNAMIC_RANGE_WEIGHT: f64 = 0.3;

/// Weight of the peak sub-score
pub const PEAK_WEIGHT: f64 = 0.3;

/// Sub-scores feeding the composite
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub variance_score: f64,
    pub dynamic_range_score: f64,
    pub peak_score: f64,
}

/// Calmness score for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalmnessScore {
    /// `round(normalized * 100)`
    pub score: i64,
    /// Weighted blend of the components
    pub normalized: f64,
    pub components: ScoreComponents,
}

impl CalmnessScore {
    /// Score a pair of profiles computed from the same buffer
    pub fn from_profiles(amplitude: &AmplitudeProfile, rms: &RmsProfile) -> Self {
        let amp = amplitude.stats();

        let variance_score = (1.0 - rms.stats().variance_db.abs() / 10.0).max(0.0);
        let dynamic_range_score = (1.0 - amp.dynamic_range / 0.5).max(0.0);
        let peak_score = (1.0 - (amp.peak_ratio - 1.0) / 5.0).max(0.0);

        let normalized = VARIANCE_WEIGHT * variance_score
            + DYNAMIC_RANGE_WEIGHT * dynamic_range_score
            + PEAK_WEIGHT * peak_score;

        Self {
            score: (normalized * 100.0).round() as i64,
            normalized,
            components: ScoreComponents {
                variance_score,
                dynamic_range_score,
                peak_score,
            },
        }
    }
}

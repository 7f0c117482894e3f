//! Human-readable interpretation of scores and metrics

use serde::Serialize;
use std::fmt;

/// Overall suitability of a track for sleep playlists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalmnessVerdict {
    /// Score 80 and above
    VeryCalm,
    /// Score 60-79
    ModeratelyCalm,
    /// Score 40-59
    SomewhatCalm,
    /// Score below 40
    NotCalm,
}

impl CalmnessVerdict {
    /// Classify a 0-100 calmness score
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s >= 80 => Self::VeryCalm,
            s if s >= 60 => Self::ModeratelyCalm,
            s if s >= 40 => Self::SomewhatCalm,
            _ => Self::NotCalm,
        }
    }

    /// One-line description for reports
    pub fn description(&self) -> &'static str {
        match self {
            Self::VeryCalm => "Very calm - Perfect for sleep playlists",
            Self::ModeratelyCalm => "Moderately calm - Good for relaxation",
            Self::SomewhatCalm => "Somewhat calm - May have some variations",
            Self::NotCalm => "Not calm - Not recommended for sleep",
        }
    }
}

impl fmt::Display for CalmnessVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Traffic-light rating for a single metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Good,
    Warning,
    Bad,
}

impl MetricStatus {
    /// Rate short-term variance: |dB| < 3 good, < 6 warning
    pub fn for_variance_db(variance_db: f64) -> Self {
        Self::grade(variance_db.abs(), 3.0, 6.0)
    }

    /// Rate P95-P5 spread: < 0.1 good, < 0.3 warning
    pub fn for_dynamic_range(dynamic_range: f64) -> Self {
        Self::grade(dynamic_range, 0.1, 0.3)
    }

    /// Rate peak prominence: < 2x good, < 4x warning
    pub fn for_peak_ratio(peak_ratio: f64) -> Self {
        Self::grade(peak_ratio, 2.0, 4.0)
    }

    fn grade(value: f64, good_below: f64, warning_below: f64) -> Self {
        if value < good_below {
            Self::Good
        } else if value < warning_below {
            Self::Warning
        } else {
            Self::Bad
        }
    }

    /// Short label for terminal output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Bad => "bad",
        }
    }
}

/// Time ranges flagged by the analysis
use serde::{Deserialize, Serialize};
use std::fmt;

/// A span of the analyzed audio with a severity value
///
/// Severity is the peak loudness of a non-calm run, or the window RMS for the
/// loudest-seconds ranking. Times are in seconds with
/// `0 <= start < end <= duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Loudness value used for ranking (linear RMS)
    pub severity: f64,
}

impl Section {
    /// Create a new section
    pub fn new(start: f64, end: f64, severity: f64) -> Self {
        Self {
            start,
            end,
            severity,
        }
    }

    /// Length of the section in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Playback position to jump to so the listener hears `lead_secs` of
    /// context before the section starts
    pub fn seek_target(&self, lead_secs: f64) -> f64 {
        (self.start - lead_secs).max(0.0)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({:.4})",
            format_time(self.start),
            format_time(self.end),
            self.severity
        )
    }
}

/// Format seconds as `m:ss` (minutes are not wrapped into hours)
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}

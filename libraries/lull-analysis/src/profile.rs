//! Loudness profiles
//!
//! Two views of the same buffer:
//! - [`AmplitudeProfile`]: 1 s back-to-back windows, used for spread/peak
//!   statistics and section extraction
//! - [`RmsProfile`]: 100 ms windows at 50% overlap, used for short-term
//!   variance in dB and the display curve

use crate::error::{AnalysisError, Result};
use crate::window::{LoudnessSeries, WindowSpec};
use lull_core::{power_to_db, SampleBuffer};
use serde::Serialize;
use tracing::debug;

/// Amplitude window length in seconds
pub const AMPLITUDE_WINDOW_SECS: f64 = 1.0;

/// RMS window length in seconds
pub const RMS_WINDOW_SECS: f64 = 0.1;

/// Number of points in the downsampled RMS display curve
pub const DISPLAY_POINTS: usize = 500;

/// Added to the variance before taking the log so silence stays finite
pub const VARIANCE_EPSILON: f64 = 1e-10;

/// Statistics over the 1 s amplitude series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmplitudeStats {
    /// Loudest window
    pub max: f64,
    /// Arithmetic mean of all windows
    pub avg: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Population variance (divides by count)
    pub variance: f64,
    /// P95 - P5 of the sorted series
    pub dynamic_range: f64,
    /// `max / avg`, with a divisor of 1 when the average is exactly zero
    pub peak_ratio: f64,
}

/// Statistics over the 100 ms RMS series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RmsStats {
    /// Arithmetic mean
    pub avg: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Population variance
    pub variance: f64,
    /// `10 * log10(variance + 1e-10)`
    pub variance_db: f64,
}

/// Loudness curve over 1 s windows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmplitudeProfile {
    series: LoudnessSeries,
    stats: AmplitudeStats,
}

impl AmplitudeProfile {
    /// Scan `buffer` with 1 s windows and compute statistics
    ///
    /// # Errors
    /// Returns [`AnalysisError::DegenerateStatistics`] when the buffer is
    /// shorter than one second
    pub fn compute(buffer: &SampleBuffer) -> Result<Self> {
        let window = (f64::from(buffer.sample_rate()) * AMPLITUDE_WINDOW_SECS).floor() as usize;
        let spec = WindowSpec::non_overlapping(window)?;
        let series = spec.scan(buffer.samples(), buffer.sample_rate());

        if series.is_empty() {
            return Err(AnalysisError::DegenerateStatistics {
                profile: "amplitude",
                samples: buffer.len(),
                window,
            });
        }

        let values = series.values();
        let max = values.iter().copied().fold(0.0_f64, f64::max);
        let avg = mean(values);
        let variance = population_variance(values, avg);

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let dynamic_range = percentile(&sorted, 0.95) - percentile(&sorted, 0.05);

        let divisor = if avg == 0.0 { 1.0 } else { avg };

        debug!(
            windows = values.len(),
            max, avg, dynamic_range, "Amplitude profile computed"
        );

        Ok(Self {
            stats: AmplitudeStats {
                max,
                avg,
                std_dev: variance.sqrt(),
                variance,
                dynamic_range,
                peak_ratio: max / divisor,
            },
            series,
        })
    }

    /// The 1 s loudness series
    pub fn series(&self) -> &LoudnessSeries {
        &self.series
    }

    /// Values for plotting (1 s windows are already coarse, so this is the series itself)
    pub fn display_values(&self) -> &[f64] {
        self.series.values()
    }

    /// Descriptive statistics
    pub fn stats(&self) -> &AmplitudeStats {
        &self.stats
    }
}

/// Short-term loudness curve over 100 ms windows with 50% overlap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RmsProfile {
    #[serde(skip_serializing)]
    series: LoudnessSeries,
    display: Vec<f64>,
    stats: RmsStats,
}

impl RmsProfile {
    /// Scan `buffer` with 100 ms windows and compute statistics
    ///
    /// # Errors
    /// Returns [`AnalysisError::DegenerateStatistics`] when the buffer is
    /// shorter than 100 ms
    pub fn compute(buffer: &SampleBuffer) -> Result<Self> {
        let window = (f64::from(buffer.sample_rate()) * RMS_WINDOW_SECS).floor() as usize;
        let spec = WindowSpec::overlapping(window, window / 2)?;
        let series = spec.scan(buffer.samples(), buffer.sample_rate());

        if series.is_empty() {
            return Err(AnalysisError::DegenerateStatistics {
                profile: "rms",
                samples: buffer.len(),
                window,
            });
        }

        let values = series.values();
        let avg = mean(values);
        let variance = population_variance(values, avg);
        let variance_db = power_to_db(variance, VARIANCE_EPSILON);

        debug!(windows = values.len(), avg, variance_db, "RMS profile computed");

        Ok(Self {
            display: downsample(values, DISPLAY_POINTS),
            stats: RmsStats {
                avg,
                std_dev: variance.sqrt(),
                variance,
                variance_db,
            },
            series,
        })
    }

    /// Full-resolution series
    pub fn series(&self) -> &LoudnessSeries {
        &self.series
    }

    /// At most [`DISPLAY_POINTS`] bucket averages of the series
    pub fn display_values(&self) -> &[f64] {
        &self.display
    }

    /// Descriptive statistics
    pub fn stats(&self) -> &RmsStats {
        &self.stats
    }
}

/// Reduce `values` to `target` bucket averages
///
/// Bucket `i` covers `[floor(i * step), floor((i + 1) * step))` with
/// `step = len / target`, so boundaries may fall between samples. Series no
/// longer than `target` are returned unchanged.
pub fn downsample(values: &[f64], target: usize) -> Vec<f64> {
    if target == 0 || values.len() <= target {
        return values.to_vec();
    }

    let step = values.len() as f64 / target as f64;
    (0..target)
        .map(|i| {
            let start = (i as f64 * step).floor() as usize;
            let end = (((i + 1) as f64 * step).floor() as usize).min(values.len());
            let bucket = &values[start..end];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Nearest-rank value at `floor(fraction * n)`, clamped to the last index
/// (for small `n`, `floor(0.95 * n)` can reach `n`)
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let index = (sorted.len() as f64 * fraction).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

//! Fixed and overlapping window scanning
//!
//! Turns a sample buffer into a [`LoudnessSeries`]: one RMS value per window.
//! Window and hop lengths are validated when the [`WindowSpec`] is built, so a
//! scan itself cannot fail.

use crate::error::{AnalysisError, Result};
use serde::Serialize;

/// How successive windows are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Windows start every `hop` samples and only complete windows are emitted:
    /// `floor((N - window) / hop) + 1` windows
    Overlapping,
    /// Back-to-back windows with `hop == window`: `floor(N / window)` windows
    NonOverlapping,
}

/// Window layout in samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    window: usize,
    hop: usize,
    mode: WindowMode,
}

impl WindowSpec {
    /// Windows of `window` samples starting every `hop` samples
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidWindow`] unless `0 < hop <= window`
    pub fn overlapping(window: usize, hop: usize) -> Result<Self> {
        if window == 0 || hop == 0 || hop > window {
            return Err(AnalysisError::InvalidWindow { window, hop });
        }

        Ok(Self {
            window,
            hop,
            mode: WindowMode::Overlapping,
        })
    }

    /// Back-to-back windows of `window` samples
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidWindow`] if `window` is zero
    pub fn non_overlapping(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(AnalysisError::InvalidWindow { window, hop: window });
        }

        Ok(Self {
            window,
            hop: window,
            mode: WindowMode::NonOverlapping,
        })
    }

    /// Window length in samples
    pub fn window(&self) -> usize {
        self.window
    }

    /// Hop length in samples
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Layout mode
    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    /// Number of windows a buffer of `samples` samples yields
    pub fn window_count(&self, samples: usize) -> usize {
        match self.mode {
            WindowMode::NonOverlapping => samples / self.window,
            WindowMode::Overlapping => {
                if samples < self.window {
                    0
                } else {
                    (samples - self.window) / self.hop + 1
                }
            }
        }
    }

    /// Compute the RMS of every window
    ///
    /// # Arguments
    /// * `samples` - Mono samples
    /// * `sample_rate` - Used only to record window/hop durations on the series
    pub fn scan(&self, samples: &[f32], sample_rate: u32) -> LoudnessSeries {
        let count = self.window_count(samples.len());
        let mut values = Vec::with_capacity(count);

        for i in 0..count {
            let start = i * self.hop;
            let end = (start + self.window).min(samples.len());
            values.push(rms(&samples[start..end]));
        }

        let rate = f64::from(sample_rate);
        LoudnessSeries {
            values,
            window_secs: self.window as f64 / rate,
            hop_secs: self.hop as f64 / rate,
        }
    }
}

/// Root-mean-square of a non-empty slice, accumulated in f64
fn rms(samples: &[f32]) -> f64 {
    let sum_squares: f64 = samples
        .iter()
        .map(|&s| {
            let s = f64::from(s);
            s * s
        })
        .sum();
    (sum_squares / samples.len() as f64).sqrt()
}

/// One loudness value per analysis window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoudnessSeries {
    values: Vec<f64>,
    window_secs: f64,
    hop_secs: f64,
}

impl LoudnessSeries {
    /// Per-window RMS values, in window order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of windows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no window fit in the buffer
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Window length in seconds
    pub fn window_secs(&self) -> f64 {
        self.window_secs
    }

    /// Hop length in seconds
    pub fn hop_secs(&self) -> f64 {
        self.hop_secs
    }

    /// Map a window index onto the buffer timeline: `(index / len) * duration`
    pub fn time_at(&self, index: usize, duration: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        (index as f64 / self.values.len() as f64) * duration
    }
}

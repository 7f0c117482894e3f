//! Analysis pipeline orchestration
//!
//! ```text
//! SampleBuffer ─► AmplitudeProfile ─┬─► CalmnessScore
//!             └─► RmsProfile ───────┘
//!                 AmplitudeProfile ───► non-calm sections, top RMS sections
//! ```
//!
//! A session owns its buffer and a cancellation flag, and nothing else: two
//! runs over the same buffer produce identical results.

use crate::error::{AnalysisError, Result};
use crate::profile::{AmplitudeProfile, AmplitudeStats, RmsProfile, RmsStats};
use crate::score::CalmnessScore;
use crate::sections::{find_non_calm_sections, find_top_rms_sections};
use crate::verdict::CalmnessVerdict;
use lull_core::{SampleBuffer, Section};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Everything one analysis run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Buffer duration in seconds
    pub duration: f64,
    /// Buffer sample rate in Hz
    pub sample_rate: u32,
    pub amplitude: AmplitudeProfile,
    pub rms: RmsProfile,
    pub calmness: CalmnessScore,
    /// Runs above `avg + std_dev`, worst first, unbounded
    pub non_calm_sections: Vec<Section>,
    /// The five loudest 1 s windows, loudest first
    pub top_rms_sections: Vec<Section>,
}

impl AnalysisResult {
    /// Statistics of the 1 s amplitude series
    pub fn amplitude_stats(&self) -> &AmplitudeStats {
        self.amplitude.stats()
    }

    /// Statistics of the 100 ms RMS series
    pub fn rms_stats(&self) -> &RmsStats {
        self.rms.stats()
    }

    /// Verdict for the rounded score
    pub fn verdict(&self) -> CalmnessVerdict {
        CalmnessVerdict::from_score(self.calmness.score)
    }

    /// The `count` worst non-calm sections
    pub fn worst_sections(&self, count: usize) -> &[Section] {
        &self.non_calm_sections[..count.min(self.non_calm_sections.len())]
    }
}

/// One analysis over one buffer
///
/// # Example
///
/// ```rust
/// use lull_analysis::AnalysisSession;
/// use lull_core::SampleBuffer;
///
/// let buffer = SampleBuffer::new(vec![0.25; 8000 * 3], 8000)?;
/// let result = AnalysisSession::new(buffer).run()?;
///
/// assert_eq!(result.amplitude.series().len(), 3);
/// assert_eq!(result.top_rms_sections.len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct AnalysisSession {
    buffer: SampleBuffer,
    cancelled: Arc<AtomicBool>,
}

impl AnalysisSession {
    /// Create a session over a validated buffer
    pub fn new(buffer: SampleBuffer) -> Self {
        Self {
            buffer,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that, once set, makes [`run`](Self::run) stop at the next stage boundary
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// The analyzed buffer
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Run the full pipeline
    ///
    /// # Errors
    /// - [`AnalysisError::DegenerateStatistics`] if the buffer is shorter than
    ///   one amplitude window (1 s)
    /// - [`AnalysisError::Cancelled`] if the cancel flag was set
    pub fn run(&self) -> Result<AnalysisResult> {
        let duration = self.buffer.duration_secs();

        self.checkpoint()?;
        let amplitude = AmplitudeProfile::compute(&self.buffer)?;

        self.checkpoint()?;
        let rms = RmsProfile::compute(&self.buffer)?;

        self.checkpoint()?;
        let calmness = CalmnessScore::from_profiles(&amplitude, &rms);
        let non_calm_sections = find_non_calm_sections(&amplitude, duration);
        let top_rms_sections = find_top_rms_sections(&amplitude, duration);

        info!(
            duration,
            score = calmness.score,
            non_calm = non_calm_sections.len(),
            "Analysis complete"
        );

        Ok(AnalysisResult {
            duration,
            sample_rate: self.buffer.sample_rate(),
            amplitude,
            rms,
            calmness,
            non_calm_sections,
            top_rms_sections,
        })
    }

    fn checkpoint(&self) -> Result<()> {
        if self.cancelled.load(Ordering::Acquire) {
            return Err(AnalysisError::Cancelled);
        }
        Ok(())
    }
}

/// Analyze a buffer on the calling thread
pub fn analyze(buffer: SampleBuffer) -> Result<AnalysisResult> {
    AnalysisSession::new(buffer).run()
}

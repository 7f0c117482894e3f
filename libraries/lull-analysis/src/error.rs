//! Error types for calmness analysis

use lull_core::CoreError;
use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur during calmness analysis
///
/// Every variant is terminal for the run that raised it: no partial result is
/// returned alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The sample buffer itself was rejected (empty, bad sample rate, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoreError),

    /// Window/hop combination cannot be scanned
    #[error("Invalid window: {window} samples with hop {hop} (need 0 < hop <= window)")]
    InvalidWindow {
        /// Window length in samples
        window: usize,
        /// Hop length in samples
        hop: usize,
    },

    /// Windowing produced no values, so averages would be undefined
    #[error("{profile} profile has no windows: {samples} samples is shorter than one {window}-sample window")]
    DegenerateStatistics {
        /// Which profile failed ("amplitude" or "rms")
        profile: &'static str,
        /// Samples in the buffer
        samples: usize,
        /// Window length in samples
        window: usize,
    },

    /// The run was abandoned because newer input replaced it
    #[error("Analysis cancelled")]
    Cancelled,

    /// The background task died before reporting an outcome
    #[error("Analysis worker failed: {0}")]
    WorkerFailed(String),
}

//! Calmness analysis for Lull
//!
//! This crate provides:
//! - Windowed RMS scanning (fixed 1 s windows and 100 ms windows at 50% overlap)
//! - Amplitude and RMS profile statistics
//! - A 0-100 calmness score with per-metric ratings
//! - Ranked problem sections (non-calm runs and the loudest seconds)
//! - A background worker that keeps only the latest run alive
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌────────────────┐
//! │ SampleBuffer │ ──► │ AnalysisSession  │ ──► │ AnalysisResult │
//! └──────────────┘     └──────────────────┘     └────────────────┘
//!                        │ AmplitudeProfile (1 s)
//!                        │ RmsProfile (100 ms / 50 ms hop)
//!                        │ CalmnessScore
//!                        └ non-calm + top RMS sections
//!
//! In an async application:
//! ┌──────────────┐     ┌──────────────────┐     ┌────────────────┐
//! │ new input    │ ──► │ AnalysisWorker   │ ──► │ AnalysisTicket │
//! └──────────────┘     │ (blocking pool)  │     │   .wait()      │
//!                      └──────────────────┘     └────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use lull_analysis::{analyze, CalmnessVerdict};
//! use lull_core::SampleBuffer;
//!
//! // Ten seconds of quiet with one loud second in the middle
//! let mut samples = vec![0.0_f32; 8000 * 10];
//! samples[8000 * 5..8000 * 6].fill(0.9);
//! let result = analyze(SampleBuffer::new(samples, 8000)?)?;
//!
//! assert_eq!(result.non_calm_sections.len(), 1);
//! println!("{} ({})", result.calmness.score, result.verdict());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod error;
mod profile;
mod score;
mod sections;
mod session;
mod verdict;
mod window;
mod worker;

pub use config::{AnalysisConfig, DEFAULT_REPORT_SECTIONS};
pub use error::{AnalysisError, Result};
pub use profile::{
    downsample, AmplitudeProfile, AmplitudeStats, RmsProfile, RmsStats, AMPLITUDE_WINDOW_SECS,
    DISPLAY_POINTS, RMS_WINDOW_SECS, VARIANCE_EPSILON,
};
pub use score::{
    CalmnessScore, ScoreComponents, DYNAMIC_RANGE_WEIGHT, PEAK_WEIGHT, VARIANCE_WEIGHT,
};
pub use sections::{find_non_calm_sections, find_top_rms_sections, MIN_SECTION_SECS, TOP_RMS_COUNT};
pub use session::{analyze, AnalysisResult, AnalysisSession};
pub use verdict::{CalmnessVerdict, MetricStatus};
pub use window::{LoudnessSeries, WindowMode, WindowSpec};
pub use worker::{AnalysisTicket, AnalysisWorker};

/// Seconds a player jumps back before a section when seeking to it
pub const SEEK_LEAD_SECS: f64 = 3.0;

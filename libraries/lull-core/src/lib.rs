//! Lull Core
//!
//! Shared building blocks for the Lull calmness analyzer and the adaptive
//! noise-masking controller.
//!
//! This crate provides:
//! - **Sample buffers**: a validated, read-only mono view over decoded audio
//! - **Decibel helpers**: amplitude/power to dB and back
//! - **Sections**: time ranges with a severity value, plus `m:ss` formatting
//! - **Processing presets**: the scalar parameter sets handed to external
//!   compressor/filter/stereo stages
//!
//! # Example
//!
//! ```rust
//! use lull_core::{ChannelSelection, SampleBuffer};
//!
//! let left = vec![0.5_f32; 44_100];
//! let right = vec![0.25_f32; 44_100];
//! let buffer = SampleBuffer::from_channels(&[left, right], 44_100, ChannelSelection::Mix)?;
//!
//! assert_eq!(buffer.len(), 44_100);
//! assert!((buffer.duration_secs() - 1.0).abs() < 1e-9);
//! # Ok::<(), lull_core::CoreError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod decibel;
pub mod error;
pub mod types;

pub use decibel::{amplitude_to_db, db_to_linear, power_to_db};
pub use error::{CoreError, Result};
pub use types::{
    format_time, ChannelSelection, ProcessingPreset, ProcessingSettings, SampleBuffer, Section,
    MAX_SAMPLE_RATE, MIN_SAMPLE_RATE,
};

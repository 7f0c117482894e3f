//! Error types for sample buffer construction

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building the inputs the analysis consumes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// No samples were provided
    #[error("Sample buffer is empty")]
    EmptyBuffer,

    /// Sample rate outside the supported range
    #[error("Invalid sample rate: {0} Hz (must be between 8000 and 384000)")]
    InvalidSampleRate(u32),

    /// A sample is NaN or infinite
    #[error("Sample {index} is not a finite number")]
    NonFiniteSample {
        /// Position of the first bad sample
        index: usize,
    },

    /// A multi-channel buffer was given with no channels at all
    #[error("No audio channels provided")]
    NoChannels,

    /// Channels of a multi-channel buffer differ in length
    #[error("Channel {channel} has {found} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Index of the offending channel
        channel: usize,
        /// Length of channel 0
        expected: usize,
        /// Length of the offending channel
        found: usize,
    },

    /// Unknown processing preset name
    #[error("Unknown processing preset: {0}")]
    UnknownPreset(String),
}

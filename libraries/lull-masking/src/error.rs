//! Error types for the masking controller

use thiserror::Error;

/// Result type for masking operations
pub type Result<T> = std::result::Result<T, MaskingError>;

/// Errors that can occur while configuring or driving the controller
///
/// Tick-time problems (no loudness snapshot) are not errors: the controller
/// holds its gain and tries again on the next tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaskingError {
    /// A setting is out of range
    #[error("Invalid setting {name}: {value}")]
    InvalidSetting {
        /// Setting name as it appears in configuration
        name: &'static str,
        /// Rejected value
        value: f32,
    },

    /// The masking loop has already shut down
    #[error("Masking loop is not running")]
    LoopStopped,
}

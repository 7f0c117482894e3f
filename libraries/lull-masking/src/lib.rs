//! Adaptive noise masking for Lull
//!
//! Fades a background-noise layer in when the music gets quiet and out when
//! it gets loud again, so sudden silences are covered without the noise
//! sitting on top of loud passages.
//!
//! This crate provides:
//! - [`MaskingSettings`]: volume, quiet threshold, anticipation band, fade times
//! - [`NoiseController`]: a deterministic per-tick step function
//! - [`MaskingLoop`]: a cancellable Tokio task that ticks the controller and
//!   hands each gain to a [`GainSink`]
//!
//! # Modes
//!
//! | enabled | dynamic | gain                                     |
//! |---------|---------|------------------------------------------|
//! | no      | -       | 0, immediately                           |
//! | yes     | no      | `volume/100 * 0.1`, immediately          |
//! | yes     | yes     | follows loudness, ≤ `volume/100 * 0.15`  |
//!
//! # Example
//!
//! ```ignore
//! use lull_masking::{MaskingLoop, MaskingSettings};
//!
//! let handle = MaskingLoop::spawn(settings, analyser_tap, noise_gain_node)?;
//! // ...
//! handle.update_settings(MaskingSettings { volume: 50.0, ..settings })?;
//! // ...
//! handle.stop().await;
//! ```

#![forbid(unsafe_code)]

mod controller;
mod error;
mod reading;
mod scheduler;
mod settings;

pub use controller::{
    approach, compute_target_gain, NoiseController, NoiseControllerState, TickInput,
    HISTORY_CAPACITY, IDLE_DECAY_STEP, TREND_ACTIVATION, TREND_FULL_SCALE, TREND_SPAN,
};
pub use error::{MaskingError, Result};
pub use reading::{LoudnessReading, BIN_FULL_SCALE, READING_EPSILON};
pub use scheduler::{GainSink, LoudnessSource, MaskingHandle, MaskingLoop};
pub use settings::{
    MaskingSettings, DEFAULT_TICK_RATE, DYNAMIC_GAIN_CEILING, STATIC_GAIN_CEILING, TICK_RATE_RANGE,
};

//! Masking configuration
//!
//! Fade times are given in seconds and converted to per-tick gain steps using
//! the loop's tick rate. The conversion assumes the loop really runs at
//! `tick_rate` Hz; a host that ticks slower gets proportionally slower fades.

use crate::error::{MaskingError, Result};
use serde::{Deserialize, Serialize};

/// Dynamic-mode gain at 100% volume
pub const DYNAMIC_GAIN_CEILING: f32 = 0.15;

/// Static-mode gain at 100% volume
pub const STATIC_GAIN_CEILING: f32 = 0.1;

/// Nominal control-loop frequency (one tick per display frame)
pub const DEFAULT_TICK_RATE: f32 = 60.0;

/// Accepted tick rates in Hz; the upper bound keeps the period at 1 ms or more
pub const TICK_RATE_RANGE: std::ops::RangeInclusive<f32> = 1.0..=1000.0;

/// Background-noise masking settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingSettings {
    /// Master switch
    pub enabled: bool,
    /// Noise volume in percent (0-100)
    pub volume: f32,
    /// Follow the music's loudness instead of playing at a fixed level
    pub dynamic_mode: bool,
    /// dB below which masking runs at full gain
    pub quiet_threshold: f32,
    /// Seconds to ramp from 0 to full gain
    pub fade_in_time: f32,
    /// Seconds to ramp from full gain to 0
    pub fade_out_time: f32,
    /// dB above the threshold in which a falling level pre-arms masking
    pub anticipation: f32,
    /// Control ticks per second
    pub tick_rate: f32,
}

impl Default for MaskingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            volume: 30.0,
            dynamic_mode: false,
            quiet_threshold: -50.0,
            fade_in_time: 0.8,
            fade_out_time: 2.0,
            anticipation: 10.0,
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl MaskingSettings {
    /// Check every field is usable
    ///
    /// # Errors
    /// Returns [`MaskingError::InvalidSetting`] naming the first bad field
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.volume) {
            return Err(invalid("volume", self.volume));
        }
        if !self.quiet_threshold.is_finite() {
            return Err(invalid("quiet_threshold", self.quiet_threshold));
        }
        if !TICK_RATE_RANGE.contains(&self.tick_rate) {
            return Err(invalid("tick_rate", self.tick_rate));
        }

        let positive = [
            ("fade_in_time", self.fade_in_time),
            ("fade_out_time", self.fade_out_time),
            ("anticipation", self.anticipation),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(name, value));
            }
        }

        Ok(())
    }

    /// Gain ceiling in dynamic mode: `volume / 100 * 0.15`
    pub fn max_dynamic_gain(&self) -> f32 {
        self.volume * DYNAMIC_GAIN_CEILING / 100.0
    }

    /// Fixed gain in static mode: `volume / 100 * 0.1`
    pub fn static_gain(&self) -> f32 {
        self.volume * STATIC_GAIN_CEILING / 100.0
    }

    /// Upper bound on the gain the controller may output with these settings
    pub fn max_gain(&self) -> f32 {
        match (self.enabled, self.dynamic_mode) {
            (false, _) => 0.0,
            (true, true) => self.max_dynamic_gain(),
            (true, false) => self.static_gain(),
        }
    }

    /// Per-tick increase while fading in
    pub fn fade_in_step(&self) -> f32 {
        1.0 / (self.fade_in_time * self.tick_rate)
    }

    /// Per-tick decrease while fading out
    pub fn fade_out_step(&self) -> f32 {
        1.0 / (self.fade_out_time * self.tick_rate)
    }

    /// Time between ticks in seconds
    pub fn tick_period_secs(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

fn invalid(name: &'static str, value: f32) -> MaskingError {
    MaskingError::InvalidSetting { name, value }
}

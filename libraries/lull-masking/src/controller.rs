//! Adaptive noise gain controller
//!
//! A pure step function over explicit state: each tick takes the playback
//! state and an optional loudness reading and returns the gain to apply to
//! the masking noise. Scheduling lives in [`crate::scheduler`].
//!
//! ```text
//!             playing + reading
//! history ◄── push dB (FIFO, 10) ──► trend = mean(oldest 3) - mean(newest 3)
//!                                        │
//!            db, trend, settings ──► target gain ──► approach ──► gain
//! ```

use crate::error::Result;
use crate::reading::LoudnessReading;
use crate::settings::MaskingSettings;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Readings kept for the trend estimate
pub const HISTORY_CAPACITY: usize = 10;

/// Readings averaged at each end of the history
pub const TREND_SPAN: usize = 3;

/// Minimum falling trend (dB) before anticipation kicks in
pub const TREND_ACTIVATION: f32 = 2.0;

/// Trend (dB) at which anticipation reaches full strength
pub const TREND_FULL_SCALE: f32 = 5.0;

/// Per-tick gain decrease while playback is stopped
pub const IDLE_DECAY_STEP: f32 = 0.05;

/// Mutable controller state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoiseControllerState {
    current_gain: f32,
    target_gain: f32,
    history: VecDeque<f32>,
}

impl NoiseControllerState {
    /// Fresh state: zero gain, empty history
    pub fn new() -> Self {
        Self {
            current_gain: 0.0,
            target_gain: 0.0,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Recent dB readings, oldest first
    pub fn history(&self) -> &VecDeque<f32> {
        &self.history
    }

    /// `mean(oldest 3) - mean(newest 3)`; positive while loudness falls
    ///
    /// With fewer than six readings the two spans overlap. Below three
    /// readings the trend is zero.
    pub fn trend(&self) -> f32 {
        let len = self.history.len();
        if len < TREND_SPAN {
            return 0.0;
        }

        let oldest: f32 = self.history.iter().take(TREND_SPAN).sum();
        let newest: f32 = self.history.iter().skip(len - TREND_SPAN).sum();
        (oldest - newest) / TREND_SPAN as f32
    }

    /// Gain applied on the last tick
    pub fn current_gain(&self) -> f32 {
        self.current_gain
    }

    /// Gain the controller is moving toward
    pub fn target_gain(&self) -> f32 {
        self.target_gain
    }

    fn push(&mut self, db: f32) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(db);
    }
}

/// Target gain for a reading
///
/// - below `quiet_threshold`: full dynamic gain
/// - within `anticipation` dB above it and falling faster than 2 dB: a
///   partial gain scaled by closeness to the threshold and by the trend
/// - otherwise: zero
pub fn compute_target_gain(db: f32, trend: f32, settings: &MaskingSettings) -> f32 {
    let max_gain = settings.max_dynamic_gain();

    if db < settings.quiet_threshold {
        max_gain
    } else if db < settings.quiet_threshold + settings.anticipation && trend > TREND_ACTIVATION {
        let proximity = 1.0 - (db - settings.quiet_threshold) / settings.anticipation;
        let trend_factor = (trend / TREND_FULL_SCALE).min(1.0);
        max_gain * proximity * trend_factor
    } else {
        0.0
    }
}

/// Move `current` toward `target` without overshooting
///
/// `rise` is used when below the target, `fall` when above.
pub fn approach(current: f32, target: f32, rise: f32, fall: f32) -> f32 {
    if current < target {
        (current + rise).min(target)
    } else if current > target {
        (current - fall).max(target)
    } else {
        current
    }
}

/// What the host observed this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Whether music is playing
    pub playing: bool,
    /// Live loudness, `None` when no snapshot was available
    pub reading: Option<LoudnessReading>,
}

impl TickInput {
    /// A playing tick with a reading
    pub fn playing(reading: LoudnessReading) -> Self {
        Self {
            playing: true,
            reading: Some(reading),
        }
    }

    /// A tick while playback is stopped
    pub fn stopped() -> Self {
        Self {
            playing: false,
            reading: None,
        }
    }
}

/// Noise gain controller
///
/// # Example
///
/// ```rust
/// use lull_masking::{LoudnessReading, MaskingSettings, NoiseController, TickInput};
///
/// let settings = MaskingSettings {
///     enabled: true,
///     dynamic_mode: true,
///     ..Default::default()
/// };
/// let mut controller = NoiseController::new(settings)?;
///
/// // Very quiet passage: fade toward full masking
/// let gain = controller.step(TickInput::playing(LoudnessReading::from_db(-60.0)));
/// assert!(gain > 0.0 && gain <= settings.max_dynamic_gain());
/// # Ok::<(), lull_masking::MaskingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct NoiseController {
    settings: MaskingSettings,
    state: NoiseControllerState,
}

impl NoiseController {
    /// Create a controller with validated settings
    ///
    /// # Errors
    /// Returns [`crate::MaskingError::InvalidSetting`] for out-of-range settings
    pub fn new(settings: MaskingSettings) -> Result<Self> {
        settings.validate()?;
        let mut controller = Self {
            settings,
            state: NoiseControllerState::new(),
        };
        controller.apply_mode();
        Ok(controller)
    }

    /// Advance one tick and return the gain to apply
    pub fn step(&mut self, input: TickInput) -> f32 {
        if !self.settings.enabled || !self.settings.dynamic_mode {
            self.apply_mode();
            return self.state.current_gain;
        }

        if !input.playing {
            self.state.target_gain = 0.0;
            self.state.current_gain = (self.state.current_gain - IDLE_DECAY_STEP).max(0.0);
            return self.state.current_gain;
        }

        let Some(reading) = input.reading else {
            warn!(
                gain = self.state.current_gain,
                "No loudness snapshot while playing, holding gain"
            );
            return self.state.current_gain;
        };

        self.state.push(reading.db());
        let trend = self.state.trend();
        let target = compute_target_gain(reading.db(), trend, &self.settings);

        self.state.target_gain = target;
        self.state.current_gain = approach(
            self.state.current_gain,
            target,
            self.settings.fade_in_step(),
            self.settings.fade_out_step(),
        )
        .clamp(0.0, self.settings.max_dynamic_gain());

        self.state.current_gain
    }

    /// Turn masking on or off
    ///
    /// Either transition starts from a fresh state, so re-enabling fades in
    /// from silence with an empty history.
    pub fn set_enabled(&mut self, enabled: bool) {
        let settings = MaskingSettings {
            enabled,
            ..self.settings
        };
        self.replace_settings(settings);
    }

    /// Switch between loudness-following and fixed-level masking
    pub fn set_dynamic_mode(&mut self, dynamic_mode: bool) {
        let settings = MaskingSettings {
            dynamic_mode,
            ..self.settings
        };
        self.replace_settings(settings);
    }

    /// Replace all settings
    ///
    /// # Errors
    /// Returns [`crate::MaskingError::InvalidSetting`] and keeps the old
    /// settings if the new ones are out of range
    pub fn update_settings(&mut self, settings: MaskingSettings) -> Result<()> {
        settings.validate()?;
        self.replace_settings(settings);
        Ok(())
    }

    /// Drop gain and history
    pub fn reset(&mut self) {
        self.state = NoiseControllerState::new();
        self.apply_mode();
    }

    /// Gain applied on the last tick
    pub fn gain(&self) -> f32 {
        self.state.current_gain
    }

    /// Current settings
    pub fn settings(&self) -> &MaskingSettings {
        &self.settings
    }

    /// Current state
    pub fn state(&self) -> &NoiseControllerState {
        &self.state
    }

    fn replace_settings(&mut self, settings: MaskingSettings) {
        let previous = std::mem::replace(&mut self.settings, settings);

        if previous.enabled != settings.enabled {
            debug!(enabled = settings.enabled, "Masking toggled");
            self.state = NoiseControllerState::new();
        } else if previous.dynamic_mode != settings.dynamic_mode {
            debug!(dynamic = settings.dynamic_mode, "Masking mode changed");
            self.state.history.clear();
            self.state.target_gain = 0.0;
        }

        self.state.current_gain = self.state.current_gain.min(settings.max_gain());
        self.apply_mode();
    }

    /// Static and disabled modes take effect without ramping
    fn apply_mode(&mut self) {
        if !self.settings.enabled {
            self.state.current_gain = 0.0;
            self.state.target_gain = 0.0;
        } else if !self.settings.dynamic_mode {
            let gain = self.settings.static_gain();
            self.state.current_gain = gain;
            self.state.target_gain = gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamic() -> MaskingSettings {
        MaskingSettings {
            enabled: true,
            dynamic_mode: true,
            ..Default::default()
        }
    }

    /// Dynamic settings whose fade-in reaches any target in one tick
    fn fast() -> MaskingSettings {
        MaskingSettings {
            fade_in_time: 0.01,
            ..dynamic()
        }
    }

    fn reading(db: f32) -> TickInput {
        TickInput::playing(LoudnessReading::from_db(db))
    }

    #[test]
    fn test_history_is_bounded_fifo() {
        let mut state = NoiseControllerState::new();
        for i in 0..15 {
            state.push(i as f32);
        }
        assert_eq!(state.history().len(), HISTORY_CAPACITY);
        assert_eq!(state.history().front(), Some(&5.0));
        assert_eq!(state.history().back(), Some(&14.0));
    }

    #[test]
    fn test_trend_needs_three_readings() {
        let mut state = NoiseControllerState::new();
        state.push(-30.0);
        state.push(-40.0);
        assert_eq!(state.trend(), 0.0);

        // three readings: both spans are the whole history
        state.push(-50.0);
        assert_eq!(state.trend(), 0.0);

        state.push(-60.0);
        // oldest [-30, -40, -50] vs newest [-40, -50, -60]
        assert!((state.trend() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_target_gain_regions() {
        let settings = dynamic();
        let max = settings.max_dynamic_gain();

        assert_eq!(compute_target_gain(-55.0, 0.0, &settings), max);
        assert_eq!(compute_target_gain(-45.0, 1.0, &settings), 0.0);
        assert_eq!(compute_target_gain(-35.0, 10.0, &settings), 0.0);

        // halfway into the anticipation band, trend at full scale
        let partial = compute_target_gain(-45.0, 5.0, &settings);
        assert!((partial - max * 0.5).abs() < 1e-7);

        // weaker trend scales down
        let weaker = compute_target_gain(-45.0, 2.5, &settings);
        assert!((weaker - max * 0.25).abs() < 1e-7);
    }

    #[test]
    fn test_approach_never_overshoots() {
        assert_eq!(approach(0.0, 0.1, 0.3, 0.3), 0.1);
        assert_eq!(approach(0.1, 0.0, 0.3, 0.3), 0.0);
        assert!((approach(0.0, 1.0, 0.25, 0.5) - 0.25).abs() < 1e-7);
        assert!((approach(1.0, 0.0, 0.25, 0.5) - 0.5).abs() < 1e-7);
        assert_eq!(approach(0.2, 0.2, 0.25, 0.5), 0.2);
    }

    #[test]
    fn test_static_mode_is_immediate() {
        let settings = MaskingSettings {
            enabled: true,
            dynamic_mode: false,
            volume: 30.0,
            ..Default::default()
        };
        let mut controller = NoiseController::new(settings).unwrap();

        assert!((controller.gain() - 0.03).abs() < 1e-7);
        assert!((controller.step(reading(-20.0)) - 0.03).abs() < 1e-7);
        assert!((controller.step(TickInput::stopped()) - 0.03).abs() < 1e-7);
    }

    #[test]
    fn test_disabled_outputs_zero() {
        let mut controller = NoiseController::new(MaskingSettings::default()).unwrap();
        assert_eq!(controller.step(reading(-80.0)), 0.0);
        assert!(controller.state().history().is_empty());
    }

    #[test]
    fn test_fade_in_rate() {
        let settings = dynamic();
        let mut controller = NoiseController::new(settings).unwrap();

        // 1/48 per tick toward 0.045
        let first = controller.step(reading(-70.0));
        assert!((first - 1.0 / 48.0).abs() < 1e-7);
        let second = controller.step(reading(-70.0));
        assert!((second - 2.0 / 48.0).abs() < 1e-6);
        let third = controller.step(reading(-70.0));
        assert_eq!(third, settings.max_dynamic_gain());
    }

    #[test]
    fn test_slow_fade_out() {
        let settings = MaskingSettings {
            volume: 100.0,
            fade_in_time: 0.1,
            ..dynamic()
        };
        let mut controller = NoiseController::new(settings).unwrap();

        controller.step(reading(-70.0));
        assert_eq!(controller.gain(), 0.15);

        // loud again: drops by 1/120 per tick
        let gain = controller.step(reading(-10.0));
        assert!((gain - (0.15 - 1.0 / 120.0)).abs() < 1e-6);
    }

    #[test]
    fn test_idle_decay_keeps_history() {
        let settings = MaskingSettings {
            volume: 100.0,
            fade_in_time: 0.1,
            ..dynamic()
        };
        let mut controller = NoiseController::new(settings).unwrap();
        controller.step(reading(-70.0));
        let history = controller.state().history().clone();

        let gain = controller.step(TickInput::stopped());
        assert!((gain - 0.10).abs() < 1e-6);
        assert_eq!(controller.state().history(), &history);

        for _ in 0..3 {
            controller.step(TickInput::stopped());
        }
        assert_eq!(controller.gain(), 0.0);
    }

    #[test]
    fn test_missing_reading_holds_gain() {
        let mut controller = NoiseController::new(dynamic()).unwrap();
        let gain = controller.step(reading(-70.0));
        let held = controller.step(TickInput {
            playing: true,
            reading: None,
        });

        assert_eq!(held, gain);
        assert_eq!(controller.state().history().len(), 1);
    }

    #[test]
    fn test_reenable_starts_fresh() {
        let mut controller = NoiseController::new(dynamic()).unwrap();
        controller.step(reading(-70.0));
        controller.step(reading(-70.0));

        controller.set_enabled(false);
        assert_eq!(controller.gain(), 0.0);

        controller.set_enabled(true);
        assert_eq!(controller.gain(), 0.0);
        assert!(controller.state().history().is_empty());
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut controller = NoiseController::new(dynamic()).unwrap();
        controller.step(reading(-70.0));
        controller.reset();
        assert_eq!(controller.gain(), 0.0);
        assert!(controller.state().history().is_empty());

        let mut fixed = NoiseController::new(MaskingSettings {
            dynamic_mode: false,
            ..dynamic()
        })
        .unwrap();
        fixed.reset();
        assert!((fixed.gain() - 0.03).abs() < 1e-7);
    }

    #[test]
    fn test_mode_switch_clears_history() {
        let mut controller = NoiseController::new(dynamic()).unwrap();
        controller.step(reading(-70.0));

        controller.set_dynamic_mode(false);
        assert!(controller.state().history().is_empty());
        assert!((controller.gain() - 0.03).abs() < 1e-7);

        // back to dynamic: keeps the static level and ramps from there
        controller.set_dynamic_mode(true);
        assert!((controller.gain() - 0.03).abs() < 1e-7);
    }

    #[test]
    fn test_volume_drop_clamps_gain() {
        let mut controller = NoiseController::new(fast()).unwrap();
        controller.step(reading(-70.0));
        assert_eq!(controller.gain(), fast().max_dynamic_gain());

        let quieter = MaskingSettings {
            volume: 10.0,
            ..fast()
        };
        controller.update_settings(quieter).unwrap();
        assert!((controller.gain() - 0.015).abs() < 1e-7);
    }

    #[test]
    fn test_invalid_update_keeps_settings() {
        let mut controller = NoiseController::new(dynamic()).unwrap();
        let bad = MaskingSettings {
            fade_in_time: 0.0,
            ..dynamic()
        };
        assert!(controller.update_settings(bad).is_err());
        assert_eq!(controller.settings(), &dynamic());
    }
}

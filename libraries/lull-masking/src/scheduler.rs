//! Periodic masking loop
//!
//! Drives a [`NoiseController`] from a Tokio interval. The loop task is the
//! only writer of controller state; settings changes reach it through a
//! `watch` channel and are applied at the start of the next tick.

use crate::controller::{NoiseController, TickInput};
use crate::error::{MaskingError, Result};
use crate::reading::LoudnessReading;
use crate::settings::MaskingSettings;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Provides playback state and live loudness once per tick
pub trait LoudnessSource: Send + 'static {
    /// Whether music is currently playing
    fn is_playing(&self) -> bool;

    /// Current loudness, or `None` if no snapshot is available this tick
    fn snapshot(&mut self) -> Option<LoudnessReading>;
}

/// Receives the gain computed on each tick
pub trait GainSink: Send + 'static {
    /// Apply a linear gain to the masking noise
    fn apply_gain(&mut self, gain: f32);
}

/// Spawns masking loops
pub struct MaskingLoop;

impl MaskingLoop {
    /// Start ticking at `settings.tick_rate` Hz on the current Tokio runtime
    ///
    /// # Errors
    /// Returns [`MaskingError::InvalidSetting`] before spawning anything if
    /// the settings are out of range
    pub fn spawn<S, G>(settings: MaskingSettings, source: S, sink: G) -> Result<MaskingHandle>
    where
        S: LoudnessSource,
        G: GainSink,
    {
        let controller = NoiseController::new(settings)?;
        let (settings_tx, settings_rx) = watch::channel(settings);
        let stopped = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(run_loop(
            controller,
            source,
            sink,
            settings_rx,
            Arc::clone(&stopped),
        ));

        info!(tick_rate = settings.tick_rate, "Masking loop started");

        Ok(MaskingHandle {
            task: Some(task),
            settings_tx,
            stopped,
        })
    }
}

async fn run_loop<S, G>(
    mut controller: NoiseController,
    mut source: S,
    mut sink: G,
    mut settings_rx: watch::Receiver<MaskingSettings>,
    stopped: Arc<AtomicBool>,
) where
    S: LoudnessSource,
    G: GainSink,
{
    let mut ticker = ticker_for(controller.settings());

    loop {
        ticker.tick().await;
        if stopped.load(Ordering::Acquire) {
            break;
        }

        if settings_rx.has_changed().unwrap_or(false) {
            let settings = *settings_rx.borrow_and_update();
            let old_rate = controller.settings().tick_rate;
            // validated by the handle before sending
            if controller.update_settings(settings).is_ok() && settings.tick_rate != old_rate {
                debug!(tick_rate = settings.tick_rate, "Masking tick rate changed");
                ticker = restart_ticker(&settings);
            }
        }

        let input = TickInput {
            playing: source.is_playing(),
            reading: source.snapshot(),
        };
        sink.apply_gain(controller.step(input));
    }

    debug!("Masking loop exited");
}

fn tick_period(settings: &MaskingSettings) -> Duration {
    Duration::from_secs_f32(settings.tick_period_secs())
}

fn ticker_for(settings: &MaskingSettings) -> Interval {
    let mut ticker = interval(tick_period(settings));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Replacement ticker whose first tick is one full period away, so a rate
/// change never fires two steps back to back
fn restart_ticker(settings: &MaskingSettings) -> Interval {
    let period = tick_period(settings);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Control handle for a running masking loop
///
/// Dropping the handle stops the loop.
#[derive(Debug)]
pub struct MaskingHandle {
    task: Option<JoinHandle<()>>,
    settings_tx: watch::Sender<MaskingSettings>,
    stopped: Arc<AtomicBool>,
}

impl MaskingHandle {
    /// Stop the loop and wait for the task to finish
    ///
    /// No tick runs after this returns.
    pub async fn stop(mut self) {
        self.stopped.store(true, Ordering::Release);
        if let Some(task) = self.task.take() {
            task.abort();
            // a cancelled JoinError is the expected outcome here
            let _ = task.await;
        }
        info!("Masking loop stopped");
    }

    /// Send new settings to the loop
    ///
    /// # Errors
    /// - [`MaskingError::InvalidSetting`] if the settings are out of range
    /// - [`MaskingError::LoopStopped`] if the loop is gone
    pub fn update_settings(&self, settings: MaskingSettings) -> Result<()> {
        settings.validate()?;
        if !self.is_running() {
            return Err(MaskingError::LoopStopped);
        }
        self.settings_tx
            .send(settings)
            .map_err(|_| MaskingError::LoopStopped)
    }

    /// Whether the loop task is still alive
    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for MaskingHandle {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

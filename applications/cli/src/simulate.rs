/// Offline masking controller simulation
///
/// Feeds the controller a linear dB ramp, one reading per tick, to show how
/// target and applied gain respond to a fading passage.
use crate::error::Result;
use lull_masking::{LoudnessReading, MaskingSettings, NoiseController, TickInput};
use serde::Serialize;
use std::fmt::Write;

/// Controller output for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulatedTick {
    pub tick: usize,
    pub db: f32,
    pub trend: f32,
    pub target: f32,
    pub gain: f32,
}

/// Run `ticks` readings ramping from `from_db` to `to_db`
///
/// Masking is forced on in dynamic mode; everything else comes from `settings`.
pub fn simulate_ramp(
    settings: MaskingSettings,
    from_db: f32,
    to_db: f32,
    ticks: usize,
) -> Result<Vec<SimulatedTick>> {
    let settings = MaskingSettings {
        enabled: true,
        dynamic_mode: true,
        ..settings
    };
    let mut controller = NoiseController::new(settings)?;

    let step = if ticks > 1 {
        (to_db - from_db) / (ticks - 1) as f32
    } else {
        0.0
    };

    let mut out = Vec::with_capacity(ticks);
    for tick in 0..ticks {
        let db = from_db + step * tick as f32;
        let gain = controller.step(TickInput::playing(LoudnessReading::from_db(db)));
        out.push(SimulatedTick {
            tick,
            db,
            trend: controller.state().trend(),
            target: controller.state().target_gain(),
            gain,
        });
    }

    Ok(out)
}

pub fn render_ticks(ticks: &[SimulatedTick], settings: &MaskingSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "threshold {} dB, anticipation {} dB, max gain {:.4}",
        settings.quiet_threshold,
        settings.anticipation,
        settings.max_dynamic_gain()
    );
    let _ = writeln!(out, "{:>5} {:>9} {:>8} {:>8} {:>8}", "tick", "dB", "trend", "target", "gain");
    for t in ticks {
        let _ = writeln!(
            out,
            "{:>5} {:>9.2} {:>8.2} {:>8.4} {:>8.4}",
            t.tick, t.db, t.trend, t.target, t.gain
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        let ticks = simulate_ramp(MaskingSettings::default(), -30.0, -55.0, 10).unwrap();

        assert_eq!(ticks.len(), 10);
        assert_eq!(ticks[0].db, -30.0);
        assert!((ticks[9].db - (-55.0)).abs() < 1e-4);
        assert_eq!(ticks[0].target, 0.0);
        assert_eq!(ticks[9].target, MaskingSettings::default().max_dynamic_gain());
    }

    #[test]
    fn test_single_tick_ramp() {
        let ticks = simulate_ramp(MaskingSettings::default(), -60.0, -10.0, 1).unwrap();
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].db, -60.0);
    }

    #[test]
    fn test_invalid_settings_surface() {
        let bad = MaskingSettings {
            anticipation: -1.0,
            ..Default::default()
        };
        assert!(simulate_ramp(bad, -30.0, -55.0, 10).is_err());
    }
}

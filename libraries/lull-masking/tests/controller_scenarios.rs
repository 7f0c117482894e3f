//! Controller behaviour over realistic loudness streams

use lull_masking::{
    LoudnessReading, MaskingSettings, NoiseController, TickInput, HISTORY_CAPACITY,
};

fn dynamic() -> MaskingSettings {
    MaskingSettings {
        enabled: true,
        dynamic_mode: true,
        quiet_threshold: -50.0,
        anticipation: 10.0,
        ..Default::default()
    }
}

/// `count` readings falling linearly from `from` to `to` dB
fn ramp(from: f32, to: f32, count: usize) -> Vec<f32> {
    let step = (to - from) / (count - 1) as f32;
    (0..count).map(|i| from + step * i as f32).collect()
}

#[test]
fn test_fading_passage_arms_masking_before_threshold() {
    let settings = dynamic();
    let max = settings.max_dynamic_gain();
    let mut controller = NoiseController::new(settings).unwrap();

    let mut targets = Vec::new();
    for db in ramp(-30.0, -55.0, 10) {
        controller.step(TickInput::playing(LoudnessReading::from_db(db)));
        targets.push((db, controller.state().trend(), controller.state().target_gain()));
    }

    for &(db, trend, target) in &targets {
        if db >= -40.0 {
            assert_eq!(target, 0.0, "no masking at {db} dB");
        } else if db >= -50.0 {
            assert!(trend > 2.0, "trend {trend} at {db} dB");
            assert!(target > 0.0 && target < max, "partial target at {db} dB");
        } else {
            assert_eq!(target, max, "full masking at {db} dB");
        }
    }

    // anticipation targets grow as the level approaches the threshold
    let partial: Vec<f32> = targets
        .iter()
        .filter(|(db, _, _)| (-50.0..-40.0).contains(db))
        .map(|&(_, _, target)| target)
        .collect();
    assert_eq!(partial.len(), 4);
    for pair in partial.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_steady_quiet_level_without_trend_stays_off() {
    // -45 dB is inside the anticipation band but not falling
    let mut controller = NoiseController::new(dynamic()).unwrap();
    for _ in 0..30 {
        controller.step(TickInput::playing(LoudnessReading::from_db(-45.0)));
    }
    assert_eq!(controller.gain(), 0.0);
    assert_eq!(controller.state().history().len(), HISTORY_CAPACITY);
}

#[test]
fn test_static_level_from_volume() {
    let settings = MaskingSettings {
        enabled: true,
        dynamic_mode: false,
        volume: 30.0,
        ..Default::default()
    };
    let mut controller = NoiseController::new(settings).unwrap();

    // no ramp: the first tick already sits at 0.30 * 0.1
    let gain = controller.step(TickInput::playing(LoudnessReading::from_db(-10.0)));
    assert_eq!(gain, 0.03);
}

#[test]
fn test_full_fade_in_takes_fade_time() {
    let settings = MaskingSettings {
        volume: 100.0,
        fade_in_time: 1.0,
        ..dynamic()
    };
    let mut controller = NoiseController::new(settings).unwrap();
    let quiet = TickInput::playing(LoudnessReading::from_db(-70.0));

    // 0.15 at 1/60 per tick: nine ticks, ten if rounding leaves a sliver
    let mut ticks = 0;
    while controller.gain() < settings.max_dynamic_gain() {
        controller.step(quiet);
        ticks += 1;
        assert!(ticks <= 10);
    }
    assert!((9..=10).contains(&ticks));
}

#[test]
fn test_pause_then_resume_continues_from_decayed_gain() {
    let settings = MaskingSettings {
        volume: 100.0,
        fade_in_time: 0.01,
        ..dynamic()
    };
    let mut controller = NoiseController::new(settings).unwrap();
    let quiet = TickInput::playing(LoudnessReading::from_db(-70.0));

    controller.step(quiet);
    controller.step(TickInput::stopped());
    let paused_gain = controller.gain();
    assert!(paused_gain > 0.0 && paused_gain < 0.15);

    // fade-in is instant here, so one quiet tick restores the ceiling
    assert_eq!(controller.step(quiet), 0.15);
}

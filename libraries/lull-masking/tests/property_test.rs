//! Property-based tests for the noise controller

use lull_masking::{
    approach, compute_target_gain, LoudnessReading, MaskingSettings, NoiseController, TickInput,
};
use proptest::prelude::*;

// ===== Helpers =====

fn arbitrary_settings() -> impl Strategy<Value = MaskingSettings> {
    (
        any::<bool>(),   // enabled
        any::<bool>(),   // dynamic
        0.0f32..=100.0,  // volume
        -80.0f32..-10.0, // quiet threshold
        0.05f32..5.0,    // fade in
        0.05f32..5.0,    // fade out
        0.5f32..30.0,    // anticipation
    )
        .prop_map(
            |(enabled, dynamic_mode, volume, quiet_threshold, fade_in_time, fade_out_time, anticipation)| {
                MaskingSettings {
                    enabled,
                    volume,
                    dynamic_mode,
                    quiet_threshold,
                    fade_in_time,
                    fade_out_time,
                    anticipation,
                    ..Default::default()
                }
            },
        )
}

fn arbitrary_tick() -> impl Strategy<Value = TickInput> {
    (
        any::<bool>(),
        proptest::option::of(prop::collection::vec(any::<u8>(), 0..64)),
    )
        .prop_map(|(playing, bins)| TickInput {
            playing,
            reading: bins.and_then(|b| LoudnessReading::from_bins(&b)),
        })
}

// ===== Property Tests =====

proptest! {
    /// Property: gain never leaves [0, max gain] whatever the input stream
    #[test]
    fn gain_stays_within_ceiling(
        settings in arbitrary_settings(),
        ticks in prop::collection::vec(arbitrary_tick(), 1..200)
    ) {
        let mut controller = NoiseController::new(settings).unwrap();
        let ceiling = settings.max_gain();

        for tick in ticks {
            let gain = controller.step(tick);
            prop_assert!(gain.is_finite());
            prop_assert!((0.0..=ceiling).contains(&gain), "gain {} outside [0, {}]", gain, ceiling);
            prop_assert!(controller.state().history().len() <= 10);
        }
    }

    /// Property: target gain is never negative and never above the dynamic ceiling
    #[test]
    fn target_is_bounded(
        settings in arbitrary_settings(),
        db in -120.0f32..0.0,
        trend in -40.0f32..40.0
    ) {
        let target = compute_target_gain(db, trend, &settings);
        prop_assert!(target >= 0.0);
        prop_assert!(target <= settings.max_dynamic_gain());
    }

    /// Property: approach moves toward the target and never past it
    #[test]
    fn approach_never_overshoots(
        current in 0.0f32..1.0,
        target in 0.0f32..1.0,
        rise in 0.0001f32..1.0,
        fall in 0.0001f32..1.0
    ) {
        let next = approach(current, target, rise, fall);
        prop_assert!((next - target).abs() <= (current - target).abs());
        if current <= target {
            prop_assert!(next >= current && next <= target);
        } else {
            prop_assert!(next <= current && next >= target);
        }
    }

    /// Property: a disabled controller outputs exactly zero
    #[test]
    fn disabled_is_silent(
        settings in arbitrary_settings(),
        ticks in prop::collection::vec(arbitrary_tick(), 1..50)
    ) {
        let mut controller = NoiseController::new(MaskingSettings { enabled: false, ..settings }).unwrap();
        for tick in ticks {
            prop_assert_eq!(controller.step(tick), 0.0);
        }
    }
}

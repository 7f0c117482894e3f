//! Property-based tests for the analysis pipeline
//!
//! Signals are built from one-second blocks of constant level plus a ragged
//! tail, which keeps cases fast while still exercising every window layout.

use lull_analysis::{analyze, downsample, AnalysisResult, DISPLAY_POINTS, MIN_SECTION_SECS, TOP_RMS_COUNT};
use lull_core::SampleBuffer;
use proptest::prelude::*;

const RATE: u32 = 8000;

// ===== Helpers =====

fn arbitrary_signal() -> impl Strategy<Value = SampleBuffer> {
    (
        prop::collection::vec(0.0f32..1.0, 1..40), // per-second levels
        0usize..RATE as usize,                     // tail length
        -0.05f32..0.05,                            // tail offset
    )
        .prop_map(|(levels, tail, offset)| {
            let mut samples = Vec::with_capacity(levels.len() * RATE as usize + tail);
            for (i, level) in levels.iter().enumerate() {
                // alternate sign so blocks are not DC
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                samples.extend(std::iter::repeat(level * sign).take(RATE as usize));
            }
            let last = levels.last().copied().unwrap_or(0.0);
            samples.extend(std::iter::repeat((last + offset).clamp(-1.0, 1.0)).take(tail));
            SampleBuffer::new(samples, RATE).unwrap()
        })
}

fn run(buffer: &SampleBuffer) -> AnalysisResult {
    analyze(buffer.clone()).unwrap()
}

// ===== Property Tests =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every non-calm section lies inside the buffer and is long enough
    #[test]
    fn non_calm_sections_are_bounded(buffer in arbitrary_signal()) {
        let result = run(&buffer);

        for section in &result.non_calm_sections {
            prop_assert!(section.start >= 0.0);
            prop_assert!(section.start < section.end);
            prop_assert!(section.end <= result.duration + 1e-9);
            prop_assert!(section.duration() > MIN_SECTION_SECS);
        }
    }

    /// Property: non-calm sections never overlap and come out worst first
    #[test]
    fn non_calm_sections_disjoint_and_ordered(buffer in arbitrary_signal()) {
        let result = run(&buffer);

        for pair in result.non_calm_sections.windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
        }

        let mut by_start = result.non_calm_sections.clone();
        by_start.sort_by(|a, b| a.start.total_cmp(&b.start));
        for pair in by_start.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start + 1e-9);
        }
    }

    /// Property: top RMS list has min(5, windows) entries, loudest first
    #[test]
    fn top_rms_length_and_order(buffer in arbitrary_signal()) {
        let result = run(&buffer);
        let windows = result.amplitude.series().len();

        prop_assert_eq!(result.top_rms_sections.len(), windows.min(TOP_RMS_COUNT));
        for pair in result.top_rms_sections.windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
        }
        let loudest = result.amplitude_stats().max;
        prop_assert!((result.top_rms_sections[0].severity - loudest).abs() < 1e-12);
    }

    /// Property: the score and its components are finite and non-negative
    #[test]
    fn score_is_finite(buffer in arbitrary_signal()) {
        let score = run(&buffer).calmness;

        prop_assert!(score.normalized.is_finite());
        prop_assert!(score.score >= 0);
        prop_assert!(score.components.variance_score >= 0.0);
        prop_assert!(score.components.dynamic_range_score >= 0.0);
        prop_assert!(score.components.peak_score >= 0.0);
    }

    /// Property: analysing the same buffer twice gives identical results
    #[test]
    fn analysis_is_idempotent(buffer in arbitrary_signal()) {
        prop_assert_eq!(run(&buffer), run(&buffer));
    }

    /// Property: downsampling never grows a series and preserves its range
    #[test]
    fn downsample_bounds(values in prop::collection::vec(0.0f64..1.0, 1..3000)) {
        let reduced = downsample(&values, DISPLAY_POINTS);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        prop_assert_eq!(reduced.len(), values.len().min(DISPLAY_POINTS));
        for v in reduced {
            prop_assert!(v >= min - 1e-12 && v <= max + 1e-12);
        }
    }
}

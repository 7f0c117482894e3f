//! Problem-section extraction
//!
//! Two independent rankings over the 1 s amplitude series:
//! - non-calm sections: runs strictly above `avg + std_dev`, merged, filtered
//!   to runs longer than half a second and sorted worst first
//! - top RMS sections: every window on its own, loudest first, top 5
//!
//! Sections are collected in series order and only reordered by the final
//! severity sort, which is stable.

use crate::profile::AmplitudeProfile;
use lull_core::Section;
use tracing::debug;

/// Non-calm runs must be strictly longer than this to be reported
pub const MIN_SECTION_SECS: f64 = 0.5;

/// Number of windows kept by [`find_top_rms_sections`]
pub const TOP_RMS_COUNT: usize = 5;

/// Find runs of windows louder than one standard deviation above the mean
///
/// The returned list is unbounded; callers slice the top N for display.
pub fn find_non_calm_sections(amplitude: &AmplitudeProfile, duration: f64) -> Vec<Section> {
    let series = amplitude.series();
    let values = series.values();
    let threshold = amplitude.stats().avg + amplitude.stats().std_dev;

    debug!(
        windows = values.len(),
        window_secs = series.window_secs(),
        duration,
        threshold,
        "Finding non-calm sections"
    );

    let mut sections = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, &value) in values.iter().enumerate() {
        match run_start {
            None if value > threshold => run_start = Some(i),
            Some(start) if value <= threshold => {
                sections.push(Section::new(
                    series.time_at(start, duration),
                    series.time_at(i, duration),
                    peak(&values[start..i]),
                ));
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        sections.push(Section::new(
            series.time_at(start, duration),
            duration,
            peak(&values[start..]),
        ));
    }

    let found = sections.len();
    sections.retain(|s| s.duration() > MIN_SECTION_SECS);
    debug!(found, kept = sections.len(), "Filtered non-calm sections");

    sort_by_severity(&mut sections);
    sections
}

/// Rank every window by its own RMS and keep the loudest five
///
/// Equal values keep their timeline order.
pub fn find_top_rms_sections(amplitude: &AmplitudeProfile, duration: f64) -> Vec<Section> {
    let series = amplitude.series();
    let mut sections: Vec<Section> = series
        .values()
        .iter()
        .enumerate()
        .map(|(i, &rms)| {
            Section::new(
                series.time_at(i, duration),
                series.time_at(i + 1, duration),
                rms,
            )
        })
        .collect();

    sort_by_severity(&mut sections);
    sections.truncate(TOP_RMS_COUNT);
    sections
}

fn peak(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Stable descending sort on severity
fn sort_by_severity(sections: &mut [Section]) {
    sections.sort_by(|a, b| b.severity.total_cmp(&a.severity));
}

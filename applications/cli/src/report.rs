/// Terminal and JSON rendering of analysis results
use crate::error::Result;
use lull_analysis::{AnalysisResult, CalmnessVerdict, MetricStatus, SEEK_LEAD_SECS};
use lull_core::{format_time, ProcessingPreset, Section};
use serde::Serialize;
use std::fmt::Write;

/// Per-metric traffic lights shown next to the raw numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricStatuses {
    pub variance: MetricStatus,
    pub dynamic_range: MetricStatus,
    pub peak_ratio: MetricStatus,
}

impl MetricStatuses {
    pub fn for_result(result: &AnalysisResult) -> Self {
        Self {
            variance: MetricStatus::for_variance_db(result.rms_stats().variance_db),
            dynamic_range: MetricStatus::for_dynamic_range(result.amplitude_stats().dynamic_range),
            peak_ratio: MetricStatus::for_peak_ratio(result.amplitude_stats().peak_ratio),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    verdict: CalmnessVerdict,
    description: &'static str,
    metric_status: MetricStatuses,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

/// Full result as pretty-printed JSON
pub fn render_json(file: &str, result: &AnalysisResult) -> Result<String> {
    let verdict = result.verdict();
    let report = JsonReport {
        file,
        verdict,
        description: verdict.description(),
        metric_status: MetricStatuses::for_result(result),
        result,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Human-readable report showing the `top` worst sections
pub fn render_text(file: &str, result: &AnalysisResult, top: usize) -> String {
    let mut out = String::new();
    let amp = result.amplitude_stats();
    let rms = result.rms_stats();
    let status = MetricStatuses::for_result(result);

    let _ = writeln!(
        out,
        "{} ({}, {} Hz)",
        file,
        format_time(result.duration),
        result.sample_rate
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Calmness score: {}/100", result.calmness.score);
    let _ = writeln!(out, "  {}", result.verdict().description());
    let _ = writeln!(out);

    let _ = writeln!(out, "Metrics");
    let _ = writeln!(
        out,
        "  Volume variance   {:>9.2} dB  [{}]",
        rms.variance_db,
        status.variance.label()
    );
    let _ = writeln!(
        out,
        "  Dynamic range     {:>9.4}     [{}]",
        amp.dynamic_range,
        status.dynamic_range.label()
    );
    let _ = writeln!(
        out,
        "  Peak ratio        {:>9.2}x    [{}]",
        amp.peak_ratio,
        status.peak_ratio.label()
    );
    let _ = writeln!(
        out,
        "  Average RMS       {:>9.4}",
        amp.avg
    );
    let _ = writeln!(out);

    let shown = result.worst_sections(top);
    if shown.is_empty() {
        let _ = writeln!(out, "No non-calm sections found");
    } else {
        let _ = writeln!(
            out,
            "Non-calm sections (showing {} of {})",
            shown.len(),
            result.non_calm_sections.len()
        );
        write_sections(&mut out, shown, true);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Loudest seconds");
    write_sections(&mut out, &result.top_rms_sections, false);

    out
}

fn write_sections(out: &mut String, sections: &[Section], with_seek: bool) {
    for (i, section) in sections.iter().enumerate() {
        let _ = write!(out, "  {}. {}", i + 1, section);
        if with_seek {
            let _ = write!(
                out,
                "  seek {}",
                format_time(section.seek_target(SEEK_LEAD_SECS))
            );
        }
        let _ = writeln!(out);
    }
}

/// Parameter table for one preset, or all of them
pub fn render_presets(only: Option<ProcessingPreset>) -> String {
    let mut out = String::new();
    let presets: Vec<ProcessingPreset> = match only {
        Some(preset) => vec![preset],
        None => ProcessingPreset::ALL.to_vec(),
    };

    for preset in presets {
        let s = preset.settings();
        let _ = writeln!(out, "[{}]", preset.as_str());
        let _ = writeln!(
            out,
            "  compressor  threshold {} dB, ratio {}:1, knee {} dB, attack {} ms, release {} ms",
            s.threshold_db, s.ratio, s.knee_db, s.attack_ms, s.release_ms
        );
        let _ = writeln!(
            out,
            "  filters     highpass {} Hz (Q {}), lowpass {} Hz (Q {})",
            s.highpass_hz, s.highpass_q, s.lowpass_hz, s.lowpass_q
        );
        let _ = writeln!(
            out,
            "  tone        mid cut {} dB, stereo width {}%, output {} dB (x{:.3})",
            s.mid_cut_db,
            s.stereo_width,
            s.output_gain_db,
            s.output_gain_linear()
        );
    }

    out
}

//! Analysis options

use crate::session::AnalysisResult;
use lull_core::{ChannelSelection, Section};
use serde::{Deserialize, Serialize};

/// Number of worst sections shown in reports by default
pub const DEFAULT_REPORT_SECTIONS: usize = 5;

/// How an analysis run is fed and reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Which channel(s) of a multi-channel source are analyzed
    pub channel: ChannelSelection,
    /// How many non-calm sections a report shows
    pub report_sections: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            channel: ChannelSelection::default(),
            report_sections: DEFAULT_REPORT_SECTIONS,
        }
    }
}

impl AnalysisConfig {
    /// The non-calm sections a report built with this config shows
    pub fn sections_to_report<'a>(&self, result: &'a AnalysisResult) -> &'a [Section] {
        result.worst_sections(self.report_sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_first_channel() {
        let config = AnalysisConfig::default();
        assert_eq!(config.channel, ChannelSelection::First);
        assert_eq!(config.report_sections, 5);
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"channel":"mix"}"#).unwrap();
        assert_eq!(config.channel, ChannelSelection::Mix);
        assert_eq!(config.report_sections, DEFAULT_REPORT_SECTIONS);
    }
}

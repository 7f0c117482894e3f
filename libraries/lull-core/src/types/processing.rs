/// Parameter sets for the external calmification chain
///
/// Compression, filtering and stereo width are applied by platform audio
/// primitives. Lull only decides the numbers those stages receive.
use crate::decibel::db_to_linear;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named processing strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingPreset {
    /// Light compression, wide bandwidth
    Gentle,
    /// Balanced processing with a small mid cut
    #[default]
    Moderate,
    /// Heavy compression, narrow bandwidth and reduced stereo width
    Aggressive,
    /// User-tuned values (starts from [`ProcessingSettings::default`])
    Custom,
}

impl ProcessingPreset {
    /// All presets in display order
    pub const ALL: [Self; 4] = [Self::Gentle, Self::Moderate, Self::Aggressive, Self::Custom];

    /// Parameter values for this preset
    pub fn settings(&self) -> ProcessingSettings {
        match self {
            Self::Gentle => ProcessingSettings {
                threshold_db: -32.0,
                ratio: 2.0,
                attack_ms: 20.0,
                release_ms: 800.0,
                knee_db: 40.0,
                lowpass_hz: 6000.0,
                highpass_hz: 80.0,
                lowpass_q: 0.7,
                highpass_q: 0.7,
                stereo_width: 100.0,
                mid_cut_db: 0.0,
                output_gain_db: 0.0,
            },
            Self::Moderate => ProcessingSettings {
                threshold_db: -28.0,
                ratio: 3.0,
                attack_ms: 10.0,
                release_ms: 500.0,
                knee_db: 30.0,
                lowpass_hz: 4500.0,
                highpass_hz: 80.0,
                lowpass_q: 1.0,
                highpass_q: 1.0,
                stereo_width: 100.0,
                mid_cut_db: -3.0,
                output_gain_db: 0.0,
            },
            Self::Aggressive => ProcessingSettings {
                threshold_db: -24.0,
                ratio: 4.0,
                attack_ms: 5.0,
                release_ms: 300.0,
                knee_db: 20.0,
                lowpass_hz: 3500.0,
                highpass_hz: 100.0,
                lowpass_q: 1.5,
                highpass_q: 1.5,
                stereo_width: 70.0,
                mid_cut_db: -6.0,
                output_gain_db: 0.0,
            },
            Self::Custom => ProcessingSettings::default(),
        }
    }

    /// Convert to string for settings persistence
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gentle => "gentle",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for ProcessingPreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gentle" | "light" => Ok(Self::Gentle),
            "moderate" | "default" => Ok(Self::Moderate),
            "aggressive" | "heavy" => Ok(Self::Aggressive),
            "custom" => Ok(Self::Custom),
            _ => Err(CoreError::UnknownPreset(s.to_string())),
        }
    }
}

/// Scalar parameters for the compressor, filters, mid EQ, stereo and output stages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Compressor threshold in dB
    pub threshold_db: f64,
    /// Compressor ratio (n:1)
    pub ratio: f64,
    /// Compressor attack in milliseconds
    pub attack_ms: f64,
    /// Compressor release in milliseconds
    pub release_ms: f64,
    /// Compressor knee in dB
    pub knee_db: f64,
    /// Lowpass cutoff in Hz
    pub lowpass_hz: f64,
    /// Highpass cutoff in Hz
    pub highpass_hz: f64,
    /// Lowpass resonance
    pub lowpass_q: f64,
    /// Highpass resonance
    pub highpass_q: f64,
    /// Stereo width in percent (0 = mono, 100 = full stereo)
    pub stereo_width: f64,
    /// Peaking cut around 2.5 kHz in dB (0 or negative)
    pub mid_cut_db: f64,
    /// Output gain in dB
    pub output_gain_db: f64,
}

impl ProcessingSettings {
    /// Output gain as a linear multiplier
    pub fn output_gain_linear(&self) -> f64 {
        db_to_linear(self.output_gain_db)
    }

    /// Stereo width as a 0.0-1.0 ratio
    pub fn stereo_width_ratio(&self) -> f64 {
        self.stereo_width / 100.0
    }

    /// Attack in seconds, the unit compressor nodes expect
    pub fn attack_secs(&self) -> f64 {
        self.attack_ms / 1000.0
    }

    /// Release in seconds
    pub fn release_secs(&self) -> f64 {
        self.release_ms / 1000.0
    }
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            threshold_db: -28.0,
            ratio: 3.0,
            attack_ms: 10.0,
            release_ms: 500.0,
            knee_db: 30.0,
            lowpass_hz: 4500.0,
            highpass_hz: 80.0,
            lowpass_q: 1.0,
            highpass_q: 1.0,
            stereo_width: 100.0,
            mid_cut_db: 0.0,
            output_gain_db: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_parsing() {
        assert_eq!("gentle".parse::<ProcessingPreset>(), Ok(ProcessingPreset::Gentle));
        assert_eq!("HEAVY".parse::<ProcessingPreset>(), Ok(ProcessingPreset::Aggressive));
        assert_eq!(
            "loud".parse::<ProcessingPreset>(),
            Err(CoreError::UnknownPreset("loud".to_string()))
        );

        for preset in ProcessingPreset::ALL {
            assert_eq!(preset.as_str().parse::<ProcessingPreset>(), Ok(preset));
        }
    }

    #[test]
    fn presets_get_progressively_stronger() {
        let gentle = ProcessingPreset::Gentle.settings();
        let moderate = ProcessingPreset::Moderate.settings();
        let aggressive = ProcessingPreset::Aggressive.settings();

        assert!(gentle.ratio < moderate.ratio && moderate.ratio < aggressive.ratio);
        assert!(gentle.lowpass_hz > moderate.lowpass_hz && moderate.lowpass_hz > aggressive.lowpass_hz);
        assert!(gentle.mid_cut_db > aggressive.mid_cut_db);
    }

    #[test]
    fn custom_uses_defaults() {
        assert_eq!(ProcessingPreset::Custom.settings(), ProcessingSettings::default());
    }

    #[test]
    fn unit_conversions() {
        let mut settings = ProcessingPreset::Aggressive.settings();
        assert!((settings.stereo_width_ratio() - 0.7).abs() < 1e-12);
        assert!((settings.attack_secs() - 0.005).abs() < 1e-12);
        assert!((settings.release_secs() - 0.3).abs() < 1e-12);
        assert!((settings.output_gain_linear() - 1.0).abs() < 1e-12);

        settings.output_gain_db = -6.0206;
        assert!((settings.output_gain_linear() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn partial_settings_deserialize_with_defaults() {
        let settings: ProcessingSettings = serde_json::from_str(r#"{"ratio": 6.0}"#).unwrap();
        assert_eq!(settings.ratio, 6.0);
        assert_eq!(settings.lowpass_hz, 4500.0);
    }
}

/// CLI configuration
///
/// Sources, lowest priority first:
/// 1. built-in defaults
/// 2. `lull.toml` in the working directory, or the file given with `--config`
/// 3. `LULL_*` environment variables, nested with `__`
///    (e.g. `LULL_MASKING__QUIET_THRESHOLD=-45`)
use crate::error::{CliError, Result};
use lull_analysis::AnalysisConfig;
use lull_core::{ProcessingPreset, ProcessingSettings};
use lull_masking::MaskingSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "lull.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LullConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub masking: MaskingSettings,

    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub preset: ProcessingPreset,

    /// Values used when `preset = "custom"`
    #[serde(default)]
    pub custom: ProcessingSettings,
}

impl ProcessingConfig {
    /// Effective parameters for the selected preset
    pub fn settings(&self) -> ProcessingSettings {
        match self.preset {
            ProcessingPreset::Custom => self.custom,
            preset => preset.settings(),
        }
    }
}

impl LullConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `lull.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::FileNotFound(path.display().to_string()));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with LULL_)
        settings = settings.add_source(
            config::Environment::with_prefix("LULL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.analysis.report_sections == 0 {
            return Err(CliError::Config(
                "analysis.report_sections must be at least 1".to_string(),
            ));
        }

        self.masking.validate()?;

        let processing = self.processing.settings();
        if processing.ratio < 1.0 {
            return Err(CliError::Config(format!(
                "processing ratio must be at least 1, got {}",
                processing.ratio
            )));
        }
        if processing.highpass_hz <= 0.0 || processing.highpass_hz >= processing.lowpass_hz {
            return Err(CliError::Config(format!(
                "processing filters need 0 < highpass < lowpass, got {} / {} Hz",
                processing.highpass_hz, processing.lowpass_hz
            )));
        }
        if !(0.0..=100.0).contains(&processing.stereo_width) {
            return Err(CliError::Config(format!(
                "processing stereo width must be 0-100%, got {}",
                processing.stereo_width
            )));
        }

        Ok(())
    }
}

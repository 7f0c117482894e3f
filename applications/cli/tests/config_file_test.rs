//! Loading `lull.toml` files

use lull_cli::config::LullConfig;
use lull_cli::error::CliError;
use lull_core::{ChannelSelection, ProcessingPreset};
use std::fs;
use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lull.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_full_file() {
    let (_dir, path) = write_config(
        r#"
[analysis]
channel = "mix"
report_sections = 3

[masking]
enabled = true
dynamic_mode = true
volume = 45
quiet_threshold = -48.5
fade_in_time = 1.2

[processing]
preset = "aggressive"
"#,
    );

    let config = LullConfig::load(Some(&path)).unwrap();
    config.validate().unwrap();

    assert_eq!(config.analysis.channel, ChannelSelection::Mix);
    assert_eq!(config.analysis.report_sections, 3);
    assert!(config.masking.enabled && config.masking.dynamic_mode);
    assert_eq!(config.masking.volume, 45.0);
    assert_eq!(config.masking.quiet_threshold, -48.5);
    assert_eq!(config.masking.fade_in_time, 1.2);
    // untouched keys keep their defaults
    assert_eq!(config.masking.fade_out_time, 2.0);
    assert_eq!(config.masking.anticipation, 10.0);
    assert_eq!(config.processing.preset, ProcessingPreset::Aggressive);
    assert_eq!(config.processing.settings().ratio, 4.0);
}

#[test]
fn test_custom_processing_table() {
    let (_dir, path) = write_config(
        r#"
[processing]
preset = "custom"

[processing.custom]
ratio = 5.0
lowpass_hz = 3000.0
"#,
    );

    let config = LullConfig::load(Some(&path)).unwrap();
    let settings = config.processing.settings();
    assert_eq!(settings.ratio, 5.0);
    assert_eq!(settings.lowpass_hz, 3000.0);
    assert_eq!(settings.highpass_hz, 80.0);
}

#[test]
fn test_out_of_range_values_fail_validation() {
    let (_dir, path) = write_config(
        r#"
[masking]
fade_out_time = 0.0
"#,
    );

    let config = LullConfig::load(Some(&path)).unwrap();
    assert!(matches!(config.validate(), Err(CliError::Masking(_))));
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let (_dir, path) = write_config("[masking\nvolume = ");
    assert!(matches!(
        LullConfig::load(Some(&path)),
        Err(CliError::Config(_))
    ));
}

#[test]
fn test_explicit_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        LullConfig::load(Some(&missing)),
        Err(CliError::FileNotFound(_))
    ));
}

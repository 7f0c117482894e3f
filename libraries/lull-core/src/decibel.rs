//! Decibel conversion utilities
//!
//! The offline analysis reports variance in dB (a power quantity) while the
//! masking controller reads live loudness as an amplitude in dB, so both
//! conversions live here.

/// Convert a linear amplitude ratio to decibels, `20 * log10(amplitude + epsilon)`
///
/// `epsilon` keeps silence finite. The masking controller uses `1e-5`, which
/// floors silence at -100 dB.
pub fn amplitude_to_db(amplitude: f64, epsilon: f64) -> f64 {
    20.0 * (amplitude + epsilon).log10()
}

/// Convert a power quantity (e.g. a variance) to decibels, `10 * log10(power + epsilon)`
pub fn power_to_db(power: f64, epsilon: f64) -> f64 {
    10.0 * (power + epsilon).log10()
}

/// Convert decibels to a linear gain multiplier
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

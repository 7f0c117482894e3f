//! Live loudness readings

use lull_core::amplitude_to_db;

/// Full scale of a byte magnitude bin
pub const BIN_FULL_SCALE: f32 = 255.0;

/// Keeps the dB conversion finite when every bin is zero
pub const READING_EPSILON: f64 = 1e-5;

/// One per-tick loudness measurement in dB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessReading {
    db: f32,
}

impl LoudnessReading {
    /// Derive a reading from byte-scaled frequency magnitudes
    ///
    /// The level is `sqrt(mean(bin²))` normalized to 0-1, then
    /// `20 * log10(level + 1e-5)`. Returns `None` for an empty snapshot.
    pub fn from_bins(bins: &[u8]) -> Option<Self> {
        if bins.is_empty() {
            return None;
        }

        let sum_squares: f64 = bins.iter().map(|&b| f64::from(b).powi(2)).sum();
        let rms = (sum_squares / bins.len() as f64).sqrt();
        let db = amplitude_to_db(rms / f64::from(BIN_FULL_SCALE), READING_EPSILON);

        Some(Self { db: db as f32 })
    }

    /// Wrap a level that is already in dB
    pub fn from_db(db: f32) -> Self {
        Self { db }
    }

    /// Level in dB
    pub fn db(&self) -> f32 {
        self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_scale_is_near_zero_db() {
        let reading = LoudnessReading::from_bins(&[255; 64]).unwrap();
        assert!(reading.db().abs() < 1e-3);
    }

    #[test]
    fn test_silence_is_finite() {
        let reading = LoudnessReading::from_bins(&[0; 64]).unwrap();
        assert!((reading.db() - (-100.0)).abs() < 1e-3);
    }

    #[test]
    fn test_rms_over_bins() {
        // sqrt((0 + 255²) / 2) = 255 / sqrt(2) -> about -3 dB
        let reading = LoudnessReading::from_bins(&[0, 255]).unwrap();
        assert!((reading.db() - (-3.0103)).abs() < 1e-3);
    }

    #[test]
    fn test_empty_snapshot_is_missing() {
        assert_eq!(LoudnessReading::from_bins(&[]), None);
    }
}

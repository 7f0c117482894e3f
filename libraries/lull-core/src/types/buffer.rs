/// Decoded sample buffer handed to the analysis
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Lowest accepted sample rate in Hz
pub const MIN_SAMPLE_RATE: u32 = 8_000;

/// Highest accepted sample rate in Hz
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// How a multi-channel decode is reduced to the single channel we analyze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSelection {
    /// Use channel 0 only
    #[default]
    First,
    /// Average all channels sample by sample
    Mix,
}

impl ChannelSelection {
    /// Parse from string (for config files and CLI flags)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "first" | "left" | "0" => Some(Self::First),
            "mix" | "mono" | "average" => Some(Self::Mix),
            _ => None,
        }
    }
}

/// Mono sample buffer with a known sample rate
///
/// Samples are f32 in roughly [-1.0, 1.0]. The buffer is validated on
/// construction and immutable afterwards, so the duration always equals
/// `len / sample_rate`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a buffer from mono samples
    ///
    /// # Errors
    /// Returns an error if `samples` is empty, contains NaN or infinity, or
    /// the sample rate is outside 8000-384000 Hz
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            return Err(CoreError::InvalidSampleRate(sample_rate));
        }
        if samples.is_empty() {
            return Err(CoreError::EmptyBuffer);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(CoreError::NonFiniteSample { index });
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a buffer from channel-separated samples
    ///
    /// # Arguments
    /// * `channels` - One `Vec` per channel, all the same length
    /// * `sample_rate` - Sample rate in Hz
    /// * `selection` - Which channel to keep, or whether to mix them
    pub fn from_channels(
        channels: &[Vec<f32>],
        sample_rate: u32,
        selection: ChannelSelection,
    ) -> Result<Self> {
        let first = channels.first().ok_or(CoreError::NoChannels)?;

        for (index, channel) in channels.iter().enumerate().skip(1) {
            if channel.len() != first.len() {
                return Err(CoreError::ChannelLengthMismatch {
                    channel: index,
                    expected: first.len(),
                    found: channel.len(),
                });
            }
        }

        let samples = match selection {
            ChannelSelection::First => first.clone(),
            ChannelSelection::Mix => {
                let scale = 1.0 / channels.len() as f32;
                (0..first.len())
                    .map(|i| channels.iter().map(|c| c[i]).sum::<f32>() * scale)
                    .collect()
            }
        };

        Self::new(samples, sample_rate)
    }

    /// Borrow the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds (`len / sample_rate`)
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed buffer, kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

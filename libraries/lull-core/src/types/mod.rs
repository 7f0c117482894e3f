/// Domain types shared across Lull crates
mod buffer;
mod processing;
mod section;

pub use buffer::{ChannelSelection, SampleBuffer, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};
pub use processing::{ProcessingPreset, ProcessingSettings};
pub use section::{format_time, Section};

/// Audio file decoding using Symphonia
use crate::error::{CliError, Result};
use lull_core::{ChannelSelection, SampleBuffer};
use std::path::Path;
use symphonia::core::audio::SampleBuffer as PacketBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Channel-separated f32 samples of a whole file
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Frames per channel
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Reduce to the mono buffer the analyzer consumes
    pub fn into_sample_buffer(self, selection: ChannelSelection) -> Result<SampleBuffer> {
        Ok(SampleBuffer::from_channels(
            &self.channels,
            self.sample_rate,
            selection,
        )?)
    }
}

/// Decode an entire file into memory
///
/// Packets that fail to decode are skipped with a warning; container and IO
/// errors abort.
pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }

    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| CliError::Decode(format!("Failed to probe file: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| CliError::Decode("No audio tracks found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| CliError::Decode("Track has no sample rate".to_string()))?;
    let channel_count = track.codec_params.channels.map_or(0, |c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| CliError::Decode(format!("Failed to create decoder: {}", e)))?;

    let mut channels: Vec<Vec<f32>> = vec![Vec::new(); channel_count];
    let mut packet_buf: Option<PacketBuffer<f32>> = None;
    let mut skipped = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(CliError::Decode(format!("Error reading packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping undecodable packet: {}", e);
                skipped += 1;
                continue;
            }
            Err(e) => return Err(CliError::Decode(format!("Decode error: {}", e))),
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        let count = spec.channels.count();
        if packet_buf
            .as_ref()
            .is_some_and(|buf| buf.capacity() < frames * count)
        {
            packet_buf = None;
        }
        let buf = packet_buf
            .get_or_insert_with(|| PacketBuffer::new(decoded.capacity() as u64, spec));
        buf.copy_planar_ref(decoded);

        if channels.len() < count {
            channels.resize(count, Vec::new());
        }
        for (ch, plane) in buf.samples().chunks_exact(frames).take(count).enumerate() {
            channels[ch].extend_from_slice(plane);
        }
    }

    let audio = DecodedAudio {
        channels,
        sample_rate,
    };
    debug!(
        channels = audio.channels.len(),
        frames = audio.frames(),
        skipped,
        "Decoded {}",
        path.display()
    );

    Ok(audio)
}

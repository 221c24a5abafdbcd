//! PCM decoding and file I/O
//!
//! Two on-disk formats are supported:
//! - Raw PCM: headerless interleaved frames, 16-bit signed little-endian,
//!   with the channel count and sample rate supplied by the caller.
//! - WAV containers via hound: rate and channel count come from the header,
//!   and the declared sample width must be 16-bit signed integer.
//!
//! No resampling and no format conversion ever happens here: a decoded
//! Recording carries exactly the input's rate and channel count.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};

use crate::error::{ReplaycheckError, Result};
use crate::pcm::recording::Recording;

/// Decode a raw PCM byte buffer into a Recording.
///
/// `bytes` must be an exact multiple of `channel_count * 2` bytes; anything
/// else means a torn frame and is a fatal `TruncatedFrame` error.
pub fn decode_raw(bytes: &[u8], channel_count: usize, sample_rate: u32) -> Result<Recording> {
    if channel_count == 0 {
        return Err(ReplaycheckError::InvalidAudio {
            reason: "channel count must be positive".to_string(),
            source: None,
        });
    }

    let frame_bytes = channel_count * 2;
    if bytes.len() % frame_bytes != 0 {
        return Err(ReplaycheckError::TruncatedFrame {
            byte_len: bytes.len(),
            frame_bytes,
        });
    }

    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    Recording::new(samples, channel_count, sample_rate)
}

/// Encode a Recording as raw interleaved little-endian PCM bytes.
pub fn encode_raw(recording: &Recording) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(recording.samples().len() * 2);
    for &sample in recording.samples() {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// Load a raw PCM file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `TruncatedFrame` - If the byte length is not frame-aligned
pub fn load_raw(path: &Path, channel_count: usize, sample_rate: u32) -> Result<Recording> {
    if !path.exists() {
        return Err(ReplaycheckError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let bytes = std::fs::read(path)?;
    let recording = decode_raw(&bytes, channel_count, sample_rate)?;

    info!(
        "Loaded {}: {} frames, {} channels @ {} Hz",
        path.display(),
        recording.frame_count(),
        recording.channel_count(),
        recording.sample_rate()
    );

    Ok(recording)
}

/// Write a Recording as a raw PCM file.
pub fn save_raw(recording: &Recording, path: &Path) -> Result<()> {
    let bytes = encode_raw(recording);
    std::fs::write(path, &bytes)?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Load a WAV file.
///
/// Rate and channel count are taken from the header. The container must
/// declare 16-bit signed integer samples; any other width is fatal.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a readable WAV container
/// * `UnsupportedWidth` - If the declared sample width is not 16-bit int
pub fn load_wav(path: &Path) -> Result<Recording> {
    if !path.exists() {
        return Err(ReplaycheckError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = WavReader::open(path).map_err(|e| ReplaycheckError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(ReplaycheckError::UnsupportedWidth {
            bits: spec.bits_per_sample,
        });
    }

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, _>>()
        .map_err(|e| ReplaycheckError::InvalidAudio {
            reason: format!("Failed to read 16-bit samples: {}", e),
            source: Some(Box::new(e)),
        })?;

    let recording = Recording::new(samples, spec.channels as usize, spec.sample_rate)?;

    info!(
        "Loaded {}: {} frames, {} channels @ {} Hz",
        path.display(),
        recording.frame_count(),
        recording.channel_count(),
        recording.sample_rate()
    );

    Ok(recording)
}

/// Write a Recording as a 16-bit integer WAV file.
pub fn save_wav(recording: &Recording, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: recording.channel_count() as u16,
        sample_rate: recording.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| ReplaycheckError::InvalidAudio {
        reason: format!("Failed to create WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    for &sample in recording.samples() {
        writer
            .write_sample(sample)
            .map_err(|e| ReplaycheckError::InvalidAudio {
                reason: format!("Failed to write sample: {}", e),
                source: Some(Box::new(e)),
            })?;
    }

    writer.finalize().map_err(|e| ReplaycheckError::InvalidAudio {
        reason: format!("Failed to finalize WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    debug!(
        "Wrote {} frames to {}",
        recording.frame_count(),
        path.display()
    );

    Ok(())
}

/// Load an audio file, picking the format by extension.
///
/// `.wav` files are read as containers (header wins); everything else is
/// raw PCM with the caller-supplied shape.
pub fn load_audio(path: &Path, raw_channels: usize, raw_sample_rate: u32) -> Result<Recording> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("wav") => load_wav(path),
        _ => load_raw(path, raw_channels, raw_sample_rate),
    }
}

/// Save an audio file, picking the format by extension (same rule as load).
pub fn save_audio(recording: &Recording, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("wav") => save_wav(recording, path),
        _ => save_raw(recording, path),
    }
}

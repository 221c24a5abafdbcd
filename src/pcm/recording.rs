//! Recording value type
//!
//! An immutable, fully in-memory multi-channel PCM recording. Samples are
//! 16-bit signed, interleaved frame-major: all channels of frame i are
//! contiguous before any sample of frame i+1. A Recording is created once
//! at decode time and never mutated; every derived signal is a new value.

use serde::Serialize;

use crate::error::{ReplaycheckError, Result};

/// One in-memory multi-channel PCM recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    sample_rate: u32,
    channel_count: usize,
    samples: Vec<i16>,
}

/// Shape and duration metadata for a Recording, for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingInfo {
    pub sample_rate: u32,
    pub channel_count: usize,
    pub frame_count: usize,
    pub duration_secs: f64,
}

impl Recording {
    /// Create a Recording from interleaved samples.
    ///
    /// Fails with `TruncatedFrame` if the sample count is not a multiple
    /// of `channel_count`, so `frame_count * channel_count == len` always
    /// holds for a constructed value.
    pub fn new(samples: Vec<i16>, channel_count: usize, sample_rate: u32) -> Result<Self> {
        debug_assert!(sample_rate > 0);

        if channel_count == 0 {
            return Err(ReplaycheckError::InvalidAudio {
                reason: "channel count must be positive".to_string(),
                source: None,
            });
        }

        if samples.len() % channel_count != 0 {
            return Err(ReplaycheckError::TruncatedFrame {
                byte_len: samples.len() * 2,
                frame_bytes: channel_count * 2,
            });
        }

        Ok(Recording {
            sample_rate,
            channel_count,
            samples,
        })
    }

    /// Create an empty Recording with the given shape.
    pub fn empty(channel_count: usize, sample_rate: u32) -> Self {
        Recording {
            sample_rate,
            channel_count,
            samples: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Number of frames (one frame = one sample per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channel_count
    }

    /// Duration in seconds at this recording's sample rate.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples, interleaved frame-major.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// One frame as a slice of `channel_count` samples.
    pub fn frame(&self, index: usize) -> &[i16] {
        let start = index * self.channel_count;
        &self.samples[start..start + self.channel_count]
    }

    /// Iterator over frames in time order.
    pub fn frames(&self) -> std::slice::ChunksExact<'_, i16> {
        self.samples.chunks_exact(self.channel_count)
    }

    /// Iterator over one channel's samples in time order.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = i16> + '_ {
        debug_assert!(channel < self.channel_count);
        self.samples
            .iter()
            .skip(channel)
            .step_by(self.channel_count)
            .copied()
    }

    /// New Recording containing frames `[start, frame_count)`.
    ///
    /// The byte layout of the kept frames is unchanged; `start` past the
    /// end yields an empty Recording of the same shape.
    pub fn slice_from(&self, start: usize) -> Recording {
        let begin = (start * self.channel_count).min(self.samples.len());
        Recording {
            sample_rate: self.sample_rate,
            channel_count: self.channel_count,
            samples: self.samples[begin..].to_vec(),
        }
    }

    /// Shape/duration summary for reports.
    pub fn info(&self) -> RecordingInfo {
        RecordingInfo {
            sample_rate: self.sample_rate,
            channel_count: self.channel_count,
            frame_count: self.frame_count(),
            duration_secs: self.duration_secs(),
        }
    }
}

/// Fail unless two recordings have the same channel count.
///
/// Comparing across channel layouts is never silently truncated or padded.
pub fn check_same_shape(a: &Recording, b: &Recording) -> Result<()> {
    if a.channel_count() != b.channel_count() {
        return Err(ReplaycheckError::ShapeMismatch {
            left_channels: a.channel_count(),
            right_channels: b.channel_count(),
        });
    }
    Ok(())
}

//! Onset and leading-silence detection
//!
//! Finds the first frame where any channel's absolute amplitude exceeds a
//! threshold. The same scan answers two questions: where meaningful audio
//! begins (onset), and how many leading frames are silent (for trimming).
//! Threshold 0 means "any non-zero sample".
//!
//! An all-silent recording is a reportable condition, never an error:
//! `first_exceeding_frame` is `None` and the leading-silence count equals
//! the whole frame count.

use log::warn;
use serde::Serialize;

use crate::pcm::Recording;

/// Result of an onset scan over one recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnsetResult {
    /// First frame where any channel's |sample| exceeds the threshold.
    pub first_exceeding_frame: Option<usize>,
    /// Threshold the scan used.
    pub threshold: i32,
}

impl OnsetResult {
    /// Number of leading silent frames: the onset frame when audio exists,
    /// otherwise the entire recording.
    pub fn leading_silent_frames(&self, recording: &Recording) -> usize {
        self.first_exceeding_frame
            .unwrap_or_else(|| recording.frame_count())
    }
}

/// Find the first frame where any channel's absolute value exceeds
/// `threshold`.
pub fn first_exceeding(recording: &Recording, threshold: i32) -> OnsetResult {
    let first_exceeding_frame = recording
        .frames()
        .position(|frame| frame_exceeds(frame, threshold));

    OnsetResult {
        first_exceeding_frame,
        threshold,
    }
}

/// Chunked onset scan: identical result to [`first_exceeding`], examining
/// `chunk_frames` frames at a time.
pub fn first_exceeding_chunked(
    recording: &Recording,
    threshold: i32,
    chunk_frames: usize,
) -> OnsetResult {
    debug_assert!(chunk_frames > 0);

    let channels = recording.channel_count();
    let chunk_samples = chunk_frames * channels;

    let mut first_exceeding_frame = None;
    'scan: for (chunk_index, chunk) in recording.samples().chunks(chunk_samples).enumerate() {
        for (frame_in_chunk, frame) in chunk.chunks_exact(channels).enumerate() {
            if frame_exceeds(frame, threshold) {
                first_exceeding_frame = Some(chunk_index * chunk_frames + frame_in_chunk);
                break 'scan;
            }
        }
    }

    OnsetResult {
        first_exceeding_frame,
        threshold,
    }
}

/// Drop the leading silent frames of a recording.
///
/// The kept frames' layout is unchanged. If the whole recording is silent
/// the result is empty; a warning is logged and the caller can see the
/// condition in the returned onset result.
pub fn strip_leading(recording: &Recording, threshold: i32) -> (Recording, OnsetResult) {
    let onset = first_exceeding(recording, threshold);
    let silent_frames = onset.leading_silent_frames(recording);

    if onset.first_exceeding_frame.is_none() && !recording.is_empty() {
        warn!(
            "No sound above threshold {} in entire recording ({} frames); output will be empty",
            threshold,
            recording.frame_count()
        );
    }

    (recording.slice_from(silent_frames), onset)
}

fn frame_exceeds(frame: &[i16], threshold: i32) -> bool {
    frame
        .iter()
        .any(|&sample| sample.unsigned_abs() as i32 > threshold)
}

//! Per-channel signal statistics
//!
//! RMS and peak absolute amplitude, one value per channel. Sums of squares
//! accumulate in u64, which is exact for any recording that fits in memory
//! (a squared sample is at most 2^30, so even billions of samples stay well
//! inside u64). Because the partial sums are exact integers, the chunked
//! and whole-buffer paths agree bit-for-bit.

use serde::Serialize;

use crate::pcm::Recording;

/// Per-channel RMS: sqrt(mean(sample^2)) over all frames.
///
/// A zero-frame recording yields 0.0 per channel, never an error.
pub fn rms(recording: &Recording) -> Vec<f64> {
    rms_from_sums(&sum_squares(recording), recording.frame_count())
}

/// Chunked RMS: identical result to [`rms`], scanning `chunk_frames` frames
/// at a time.
pub fn rms_chunked(recording: &Recording, chunk_frames: usize) -> Vec<f64> {
    debug_assert!(chunk_frames > 0);

    let channels = recording.channel_count();
    let mut sums = vec![0u64; channels];

    let chunk_samples = chunk_frames * channels;
    for chunk in recording.samples().chunks(chunk_samples) {
        for frame in chunk.chunks_exact(channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                let s = sample as i64;
                sums[ch] += (s * s) as u64;
            }
        }
    }

    rms_from_sums(&sums, recording.frame_count())
}

/// Per-channel peak absolute amplitude.
///
/// u16 because |-32768| does not fit in i16. Zero-frame recordings peak
/// at 0.
pub fn peak(recording: &Recording) -> Vec<u16> {
    let channels = recording.channel_count();
    let mut peaks = vec![0u16; channels];

    for frame in recording.frames() {
        for (ch, &sample) in frame.iter().enumerate() {
            let magnitude = sample.unsigned_abs();
            if magnitude > peaks[ch] {
                peaks[ch] = magnitude;
            }
        }
    }

    peaks
}

/// RMS per consecutive window of `window_frames` frames, all channels
/// pooled, in time order. A trailing partial window is included. Used to
/// map where audio sits inside a long capture (segment offsets).
pub fn rms_windows(recording: &Recording, window_frames: usize) -> Vec<f64> {
    debug_assert!(window_frames > 0);

    recording
        .samples()
        .chunks(window_frames * recording.channel_count())
        .map(|window| {
            let sum: u64 = window
                .iter()
                .map(|&sample| {
                    let s = sample as i64;
                    (s * s) as u64
                })
                .sum();
            (sum as f64 / window.len() as f64).sqrt()
        })
        .collect()
}

/// A silence/audio boundary between two consecutive RMS windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentTransition {
    /// Index of the first window on the new side of the boundary.
    pub window_index: usize,
    /// Frame where that window starts.
    pub start_frame: usize,
    /// True for silence -> audio, false for audio -> silence.
    pub to_audio: bool,
}

/// Find the silence/audio transitions in a windowed RMS profile.
///
/// A window counts as audio when its RMS is strictly above
/// `rms_threshold`; a transition is reported at every window whose state
/// differs from its predecessor's.
pub fn segment_transitions(
    window_rms: &[f64],
    window_frames: usize,
    rms_threshold: f64,
) -> Vec<SegmentTransition> {
    window_rms
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let prev_audio = pair[0] > rms_threshold;
            let curr_audio = pair[1] > rms_threshold;
            (prev_audio != curr_audio).then_some(SegmentTransition {
                window_index: i + 1,
                start_frame: (i + 1) * window_frames,
                to_audio: curr_audio,
            })
        })
        .collect()
}

fn sum_squares(recording: &Recording) -> Vec<u64> {
    let channels = recording.channel_count();
    let mut sums = vec![0u64; channels];

    for frame in recording.frames() {
        for (ch, &sample) in frame.iter().enumerate() {
            let s = sample as i64;
            sums[ch] += (s * s) as u64;
        }
    }

    sums
}

fn rms_from_sums(sums: &[u64], frame_count: usize) -> Vec<f64> {
    if frame_count == 0 {
        return vec![0.0; sums.len()];
    }
    sums.iter()
        .map(|&sum| (sum as f64 / frame_count as f64).sqrt())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rms_constant_signal() {
        // Every sample 100: RMS is exactly 100 on each channel
        let rec = Recording::new(vec![100; 40], 4, 96000).unwrap();
        for value in rms(&rec) {
            assert_abs_diff_eq!(value, 100.0);
        }
    }

    #[test]
    fn test_rms_per_channel_independent() {
        // ch0 alternates +-300, ch1 is silent
        let samples = vec![300, 0, -300, 0, 300, 0, -300, 0];
        let rec = Recording::new(samples, 2, 44100).unwrap();
        let values = rms(&rec);
        assert_abs_diff_eq!(values[0], 300.0);
        assert_abs_diff_eq!(values[1], 0.0);
    }

    #[test]
    fn test_rms_zero_frames() {
        let rec = Recording::empty(4, 96000);
        assert_eq!(rms(&rec), vec![0.0; 4]);
        assert_eq!(peak(&rec), vec![0; 4]);
    }

    #[test]
    fn test_peak_tracks_absolute_extreme() {
        let samples = vec![100, -200, -32768, 50, 30000, 5, 0, -1];
        let rec = Recording::new(samples, 4, 96000).unwrap();
        assert_eq!(peak(&rec), vec![30000, 200, 32768, 50]);
    }

    #[test]
    fn test_rms_windows_pool_all_channels() {
        // Window 1: both channels 300, window 2: ch0 300 / ch1 silent,
        // window 3 (partial, one frame): silent
        let samples = vec![300, -300, 300, 300, 300, 0, -300, 0, 0, 0];
        let rec = Recording::new(samples, 2, 44100).unwrap();

        let windows = rms_windows(&rec, 2);
        assert_eq!(windows.len(), 3);
        assert_abs_diff_eq!(windows[0], 300.0);
        // Pooled over 4 samples, two of them zero
        assert_abs_diff_eq!(windows[1], (90_000.0_f64 / 2.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(windows[2], 0.0);
    }

    #[test]
    fn test_rms_windows_empty_recording() {
        let rec = Recording::empty(4, 96000);
        assert!(rms_windows(&rec, 96000).is_empty());
    }

    #[test]
    fn test_segment_transitions_find_audio_boundaries() {
        // silence, silence, audio, audio, silence
        let profile = [0.0, 120.0, 900.0, 2500.0, 40.0];
        let transitions = segment_transitions(&profile, 1000, 500.0);

        assert_eq!(
            transitions,
            vec![
                SegmentTransition {
                    window_index: 2,
                    start_frame: 2000,
                    to_audio: true,
                },
                SegmentTransition {
                    window_index: 4,
                    start_frame: 4000,
                    to_audio: false,
                },
            ]
        );
    }

    #[test]
    fn test_segment_transitions_strict_threshold() {
        // Exactly at the threshold is still silence
        let profile = [500.0, 500.0, 501.0];
        let transitions = segment_transitions(&profile, 10, 500.0);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].window_index, 2);
        assert!(transitions[0].to_audio);
    }

    #[test]
    fn test_segment_transitions_steady_signal_has_none() {
        assert!(segment_transitions(&[900.0, 800.0, 700.0], 10, 500.0).is_empty());
        assert!(segment_transitions(&[1.0], 10, 500.0).is_empty());
        assert!(segment_transitions(&[], 10, 500.0).is_empty());
    }

    #[test]
    fn test_chunked_rms_matches_whole_buffer_exactly() {
        // Pseudo-random-ish signal long enough to span several chunks
        let samples: Vec<i16> = (0..10_000)
            .map(|i| ((i * 7919) % 65536 - 32768) as i16)
            .collect();
        let rec = Recording::new(samples, 4, 96000).unwrap();

        let whole = rms(&rec);
        for chunk_frames in [1, 7, 100, 2048, 10_000] {
            let chunked = rms_chunked(&rec, chunk_frames);
            // Bit-for-bit, not approximately
            assert_eq!(whole, chunked, "chunk_frames={}", chunk_frames);
        }
    }
}

//! Divergence detection and difference statistics
//!
//! Finds the first frame where two recordings drift apart by more than a
//! threshold, and characterizes the distribution of |a - b| over the
//! common prefix. All comparisons are strict (`>`), so threshold 0 means
//! "any difference at all", which is also how exact-equality determinism
//! checks are expressed.
//!
//! Sums accumulate in integers (u64/u128), so the chunked scan and the
//! whole-buffer scan cannot disagree.

use serde::Serialize;

use crate::error::Result;
use crate::pcm::{check_same_shape, Recording};

/// Distribution of absolute sample differences between two recordings.
///
/// `std` is the population standard deviation. `pct_significant` is in
/// [0, 100]: for the overall stats it counts frames where any channel
/// exceeds the threshold; for per-channel stats it counts that channel's
/// own exceeding samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferenceStats {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub max: f64,
    pub pct_significant: f64,
}

impl DifferenceStats {
    fn zero() -> Self {
        DifferenceStats {
            mean: 0.0,
            median: 0.0,
            std: 0.0,
            max: 0.0,
            pct_significant: 0.0,
        }
    }
}

/// First frame of the common prefix where any channel's |a - b| exceeds
/// `threshold`, or `None` if the recordings never diverge that far.
pub fn first_divergence(a: &Recording, b: &Recording, threshold: i32) -> Result<Option<usize>> {
    check_same_shape(a, b)?;
    let frames = a.frame_count().min(b.frame_count());
    Ok(first_divergence_prefix(a, b, frames, threshold))
}

/// Chunked divergence scan: identical result to [`first_divergence`],
/// examining `chunk_frames` frames at a time.
pub fn first_divergence_chunked(
    a: &Recording,
    b: &Recording,
    threshold: i32,
    chunk_frames: usize,
) -> Result<Option<usize>> {
    debug_assert!(chunk_frames > 0);
    check_same_shape(a, b)?;

    let channels = a.channel_count();
    let frames = a.frame_count().min(b.frame_count());
    let prefix = frames * channels;
    let chunk_samples = chunk_frames * channels;

    let xs = &a.samples()[..prefix];
    let ys = &b.samples()[..prefix];

    for (chunk_index, (x_chunk, y_chunk)) in xs
        .chunks(chunk_samples)
        .zip(ys.chunks(chunk_samples))
        .enumerate()
    {
        for (frame_in_chunk, (frame_a, frame_b)) in x_chunk
            .chunks_exact(channels)
            .zip(y_chunk.chunks_exact(channels))
            .enumerate()
        {
            if frame_diverges(frame_a, frame_b, threshold) {
                return Ok(Some(chunk_index * chunk_frames + frame_in_chunk));
            }
        }
    }

    Ok(None)
}

/// Distribution of |a - b| over all samples of the common prefix.
pub fn difference_stats(a: &Recording, b: &Recording, threshold: i32) -> Result<DifferenceStats> {
    check_same_shape(a, b)?;
    let frames = a.frame_count().min(b.frame_count());
    Ok(difference_stats_prefix(a, b, frames, threshold))
}

/// Per-channel difference distributions over the common prefix.
pub fn per_channel_difference_stats(
    a: &Recording,
    b: &Recording,
    threshold: i32,
) -> Result<Vec<DifferenceStats>> {
    check_same_shape(a, b)?;
    let frames = a.frame_count().min(b.frame_count());
    Ok(per_channel_difference_stats_prefix(a, b, frames, threshold))
}

pub(crate) fn first_divergence_prefix(
    a: &Recording,
    b: &Recording,
    frames: usize,
    threshold: i32,
) -> Option<usize> {
    a.frames()
        .zip(b.frames())
        .take(frames)
        .position(|(frame_a, frame_b)| frame_diverges(frame_a, frame_b, threshold))
}

pub(crate) fn difference_stats_prefix(
    a: &Recording,
    b: &Recording,
    frames: usize,
    threshold: i32,
) -> DifferenceStats {
    let channels = a.channel_count();
    let total = frames * channels;
    if total == 0 {
        return DifferenceStats::zero();
    }

    let mut diffs: Vec<u16> = Vec::with_capacity(total);
    let mut significant_frames = 0u64;

    for (frame_a, frame_b) in a.frames().zip(b.frames()).take(frames) {
        if frame_diverges(frame_a, frame_b, threshold) {
            significant_frames += 1;
        }
        for ch in 0..channels {
            diffs.push(abs_diff(frame_a[ch], frame_b[ch]));
        }
    }

    let mut stats = stats_over(&mut diffs);
    stats.pct_significant = significant_frames as f64 / frames as f64 * 100.0;
    stats
}

pub(crate) fn per_channel_difference_stats_prefix(
    a: &Recording,
    b: &Recording,
    frames: usize,
    threshold: i32,
) -> Vec<DifferenceStats> {
    let channels = a.channel_count();
    if frames == 0 {
        return vec![DifferenceStats::zero(); channels];
    }

    (0..channels)
        .map(|ch| {
            let mut diffs: Vec<u16> = a
                .channel(ch)
                .zip(b.channel(ch))
                .take(frames)
                .map(|(x, y)| abs_diff(x, y))
                .collect();

            let exceeding = diffs.iter().filter(|&&d| d as i32 > threshold).count();
            let mut stats = stats_over(&mut diffs);
            stats.pct_significant = exceeding as f64 / frames as f64 * 100.0;
            stats
        })
        .collect()
}

fn frame_diverges(frame_a: &[i16], frame_b: &[i16], threshold: i32) -> bool {
    frame_a
        .iter()
        .zip(frame_b.iter())
        .any(|(&x, &y)| abs_diff(x, y) as i32 > threshold)
}

#[inline]
fn abs_diff(x: i16, y: i16) -> u16 {
    (x as i32 - y as i32).unsigned_abs() as u16
}

/// Mean, median, population std, and max of a difference population.
/// Sorts in place for the median. `pct_significant` is left at 0 for the
/// caller to fill in.
fn stats_over(diffs: &mut [u16]) -> DifferenceStats {
    let n = diffs.len();
    debug_assert!(n > 0);

    let sum: u64 = diffs.iter().map(|&d| d as u64).sum();
    let sum_sq: u128 = diffs.iter().map(|&d| (d as u128) * (d as u128)).sum();
    let max = *diffs.iter().max().unwrap_or(&0);

    diffs.sort_unstable();
    let median = if n % 2 == 1 {
        diffs[n / 2] as f64
    } else {
        (diffs[n / 2 - 1] as f64 + diffs[n / 2] as f64) / 2.0
    };

    let mean = sum as f64 / n as f64;
    let mean_sq = sum_sq as f64 / n as f64;
    let variance = (mean_sq - mean * mean).max(0.0);

    DifferenceStats {
        mean,
        median,
        std: variance.sqrt(),
        max: max as f64,
        pct_significant: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    fn rec(samples: Vec<i16>, channels: usize) -> Recording {
        Recording::new(samples, channels, 96000).unwrap()
    }

    #[test_case(0; "threshold zero")]
    #[test_case(100; "reference threshold")]
    #[test_case(32767; "maximal threshold")]
    fn test_recording_never_diverges_from_itself(threshold: i32) {
        let r = rec((0..4000).map(|i| (i % 3000 - 1500) as i16).collect(), 4);
        assert_eq!(first_divergence(&r, &r, threshold).unwrap(), None);
    }

    #[test]
    fn test_first_divergence_strict_comparison() {
        // Difference of exactly 100 in frame 1, 101 in frame 3
        let a = rec(vec![0, 0, 100, 0, 0, 0, 101, 0], 2);
        let b = rec(vec![0; 8], 2);

        assert_eq!(first_divergence(&a, &b, 100).unwrap(), Some(3));
        assert_eq!(first_divergence(&a, &b, 99).unwrap(), Some(1));
    }

    #[test]
    fn test_constant_offset_scenario() {
        // Every sample differs by exactly 50; threshold 100
        let a = rec(vec![150; 4 * 200], 4);
        let b = rec(vec![100; 4 * 200], 4);

        assert_eq!(first_divergence(&a, &b, 100).unwrap(), None);

        let stats = difference_stats(&a, &b, 100).unwrap();
        assert_abs_diff_eq!(stats.mean, 50.0);
        assert_abs_diff_eq!(stats.median, 50.0);
        assert_abs_diff_eq!(stats.max, 50.0);
        assert_abs_diff_eq!(stats.std, 0.0);
        assert_abs_diff_eq!(stats.pct_significant, 0.0);
    }

    #[test]
    fn test_difference_stats_distribution() {
        // Two frames: diffs [0, 10] and [0, 30]
        let a = rec(vec![0, 10, 0, -30], 2);
        let b = rec(vec![0, 0, 0, 0], 2);

        let stats = difference_stats(&a, &b, 20).unwrap();
        assert_abs_diff_eq!(stats.mean, 10.0);
        assert_abs_diff_eq!(stats.median, 5.0);
        assert_abs_diff_eq!(stats.max, 30.0);
        // Population std of [0, 10, 0, 30]
        assert_abs_diff_eq!(stats.std, (150.0f64).sqrt(), epsilon = 1e-12);
        // One of two frames has a channel over 20
        assert_abs_diff_eq!(stats.pct_significant, 50.0);
    }

    #[test]
    fn test_per_channel_stats_count_own_samples() {
        // ch0 always differs by 200, ch1 never differs
        let a = rec(vec![200, 0, 200, 0, 200, 0], 2);
        let b = rec(vec![0; 6], 2);

        let per_channel = per_channel_difference_stats(&a, &b, 100).unwrap();
        assert_abs_diff_eq!(per_channel[0].pct_significant, 100.0);
        assert_abs_diff_eq!(per_channel[0].mean, 200.0);
        assert_abs_diff_eq!(per_channel[1].pct_significant, 0.0);
        assert_abs_diff_eq!(per_channel[1].mean, 0.0);
    }

    #[test]
    fn test_extreme_difference_does_not_overflow() {
        // i16::MIN vs i16::MAX differs by 65535
        let a = rec(vec![i16::MIN, i16::MIN], 2);
        let b = rec(vec![i16::MAX, i16::MAX], 2);

        let stats = difference_stats(&a, &b, 100).unwrap();
        assert_abs_diff_eq!(stats.max, 65535.0);
        assert_eq!(first_divergence(&a, &b, 100).unwrap(), Some(0));
    }

    #[test]
    fn test_empty_prefix_yields_zero_stats() {
        let a = Recording::empty(4, 96000);
        let stats = difference_stats(&a, &a, 100).unwrap();
        assert_eq!(stats, DifferenceStats::zero());
        assert_eq!(first_divergence(&a, &a, 0).unwrap(), None);
    }

    #[test]
    fn test_chunked_matches_whole_buffer() {
        let a = rec(
            (0..6000).map(|i| ((i * 13) % 5000 - 2500) as i16).collect(),
            4,
        );
        let mut other = a.samples().to_vec();
        // Inject a divergence late in the stream
        other[5003] = other[5003].wrapping_add(500);
        let b = rec(other, 4);

        let whole = first_divergence(&a, &b, 100).unwrap();
        assert_eq!(whole, Some(5003 / 4));
        for chunk_frames in [1, 7, 250, 1024, 10_000] {
            assert_eq!(
                whole,
                first_divergence_chunked(&a, &b, 100, chunk_frames).unwrap(),
                "chunk_frames={}",
                chunk_frames
            );
        }
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let a = rec(vec![0; 8], 4);
        let b = rec(vec![0; 8], 2);
        assert!(first_divergence(&a, &b, 0).is_err());
        assert!(difference_stats(&a, &b, 0).is_err());
    }
}

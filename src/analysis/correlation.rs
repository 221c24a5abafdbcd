//! Correlation engine
//!
//! Pearson correlation between two recordings, overall (flattened
//! interleaved samples) and per channel, always over the common frame
//! prefix. The coefficient is assembled from integer power sums
//! (n, Σx, Σy, Σxy, Σx², Σy²), which are exact, so accumulating them in
//! chunks produces the same bits as one pass over the whole buffer.
//!
//! A zero-variance side (flat or silent signal) makes the denominator 0;
//! the coefficient is defined as 0.0 in that case so callers always get a
//! comparable number instead of NaN.

use serde::Serialize;

use crate::analysis::divergence::{
    difference_stats_prefix, first_divergence_prefix, per_channel_difference_stats_prefix,
    DifferenceStats,
};
use crate::error::Result;
use crate::pcm::{check_same_shape, Recording};

/// Full structured result of comparing two recordings.
///
/// Immutable once produced; the report layer only reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Frames actually compared: min of the two frame counts.
    pub compared_frame_count: usize,
    /// Pearson coefficient over all interleaved samples of the prefix.
    pub overall_correlation: f64,
    /// Pearson coefficient per channel, in channel order.
    pub per_channel_correlation: Vec<f64>,
    /// First frame where any channel differs by more than the threshold.
    pub first_divergence_frame: Option<usize>,
    /// Distribution of |a - b| over all samples of the prefix.
    pub difference_stats: DifferenceStats,
    /// Same distribution restricted to each channel.
    pub per_channel_difference_stats: Vec<DifferenceStats>,
    /// Threshold used for divergence and significance counting.
    pub threshold: i32,
}

/// Exact integer power sums of a paired sample stream.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PearsonSums {
    n: u64,
    sum_x: i64,
    sum_y: i64,
    sum_xy: i64,
    sum_x2: i64,
    sum_y2: i64,
}

impl PearsonSums {
    pub(crate) fn accumulate(&mut self, x: i16, y: i16) {
        let x = x as i64;
        let y = y as i64;
        self.n += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xy += x * y;
        self.sum_x2 += x * x;
        self.sum_y2 += y * y;
    }

    /// Pearson coefficient from the sums; 0.0 when either variance is 0.
    pub(crate) fn coefficient(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let n = self.n as i128;
        let numerator = n * self.sum_xy as i128 - self.sum_x as i128 * self.sum_y as i128;
        let var_x = n * self.sum_x2 as i128 - self.sum_x as i128 * self.sum_x as i128;
        let var_y = n * self.sum_y2 as i128 - self.sum_y as i128 * self.sum_y as i128;

        if var_x == 0 || var_y == 0 {
            return 0.0;
        }

        numerator as f64 / (var_x as f64 * var_y as f64).sqrt()
    }
}

/// Overall Pearson correlation over the common frame prefix.
pub fn correlate(a: &Recording, b: &Recording) -> Result<f64> {
    check_same_shape(a, b)?;
    let frames = a.frame_count().min(b.frame_count());
    Ok(overall_sums(a, b, frames).coefficient())
}

/// Per-channel Pearson correlation over the common frame prefix.
pub fn correlate_per_channel(a: &Recording, b: &Recording) -> Result<Vec<f64>> {
    check_same_shape(a, b)?;
    let frames = a.frame_count().min(b.frame_count());
    Ok(per_channel_sums(a, b, frames)
        .iter()
        .map(PearsonSums::coefficient)
        .collect())
}

/// Chunked overall correlation: identical result to [`correlate`], scanning
/// `chunk_frames` frames at a time.
pub fn correlate_chunked(a: &Recording, b: &Recording, chunk_frames: usize) -> Result<f64> {
    debug_assert!(chunk_frames > 0);
    check_same_shape(a, b)?;

    let channels = a.channel_count();
    let frames = a.frame_count().min(b.frame_count());
    let prefix = frames * channels;

    let mut sums = PearsonSums::default();
    let chunk_samples = chunk_frames * channels;
    let xs = &a.samples()[..prefix];
    let ys = &b.samples()[..prefix];

    for (x_chunk, y_chunk) in xs.chunks(chunk_samples).zip(ys.chunks(chunk_samples)) {
        for (&x, &y) in x_chunk.iter().zip(y_chunk.iter()) {
            sums.accumulate(x, y);
        }
    }

    Ok(sums.coefficient())
}

/// Compare two recordings and produce the full structured result.
///
/// `threshold` drives both the first-divergence scan and the
/// significant-frame percentage (strict `>` comparison in both).
pub fn compare(a: &Recording, b: &Recording, threshold: i32) -> Result<ComparisonResult> {
    check_same_shape(a, b)?;
    let frames = a.frame_count().min(b.frame_count());

    Ok(ComparisonResult {
        compared_frame_count: frames,
        overall_correlation: overall_sums(a, b, frames).coefficient(),
        per_channel_correlation: per_channel_sums(a, b, frames)
            .iter()
            .map(PearsonSums::coefficient)
            .collect(),
        first_divergence_frame: first_divergence_prefix(a, b, frames, threshold),
        difference_stats: difference_stats_prefix(a, b, frames, threshold),
        per_channel_difference_stats: per_channel_difference_stats_prefix(a, b, frames, threshold),
        threshold,
    })
}

fn overall_sums(a: &Recording, b: &Recording, frames: usize) -> PearsonSums {
    let prefix = frames * a.channel_count();
    let mut sums = PearsonSums::default();
    for (&x, &y) in a.samples()[..prefix].iter().zip(&b.samples()[..prefix]) {
        sums.accumulate(x, y);
    }
    sums
}

fn per_channel_sums(a: &Recording, b: &Recording, frames: usize) -> Vec<PearsonSums> {
    let channels = a.channel_count();
    let mut sums = vec![PearsonSums::default(); channels];

    for (frame_a, frame_b) in a.frames().zip(b.frames()).take(frames) {
        for ch in 0..channels {
            sums[ch].accumulate(frame_a[ch], frame_b[ch]);
        }
    }

    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ramp_recording(len: usize, channels: usize) -> Recording {
        let samples: Vec<i16> = (0..len * channels)
            .map(|i| ((i as i32 * 2731) % 60000 - 30000) as i16)
            .collect();
        Recording::new(samples, channels, 96000).unwrap()
    }

    #[test]
    fn test_self_correlation_is_exactly_one() {
        let rec = ramp_recording(500, 4);
        assert_eq!(correlate(&rec, &rec).unwrap(), 1.0);
        for value in correlate_per_channel(&rec, &rec).unwrap() {
            assert_eq!(value, 1.0);
        }
    }

    #[test]
    fn test_zero_variance_yields_zero_not_nan() {
        let flat = Recording::new(vec![7; 200], 2, 44100).unwrap();
        let varied = ramp_recording(100, 2);

        assert_eq!(correlate(&flat, &varied).unwrap(), 0.0);
        assert_eq!(correlate(&varied, &flat).unwrap(), 0.0);
        assert_eq!(correlate(&flat, &flat).unwrap(), 0.0);
    }

    #[test]
    fn test_negated_signal_correlates_at_minus_one() {
        let samples: Vec<i16> = (0..400).map(|i| ((i % 100) as i16 - 50) * 10).collect();
        let negated: Vec<i16> = samples.iter().map(|&s| -s).collect();
        let a = Recording::new(samples, 2, 44100).unwrap();
        let b = Recording::new(negated, 2, 44100).unwrap();

        assert_abs_diff_eq!(correlate(&a, &b).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_truncates_to_common_prefix() {
        let long = ramp_recording(1200, 2);
        let short = Recording::new(long.samples()[..1000 * 2].to_vec(), 2, 96000).unwrap();

        let result = compare(&long, &short, 100).unwrap();
        assert_eq!(result.compared_frame_count, 1000);
        // Identical over the prefix
        assert_eq!(result.overall_correlation, 1.0);
        assert_eq!(result.first_divergence_frame, None);
    }

    #[test]
    fn test_shape_mismatch_is_fatal() {
        let four = ramp_recording(10, 4);
        let two = ramp_recording(10, 2);
        assert!(correlate(&four, &two).is_err());
        assert!(compare(&four, &two, 0).is_err());
    }

    #[test]
    fn test_chunked_matches_whole_buffer_exactly() {
        let a = ramp_recording(3000, 4);
        let mut noisy = a.samples().to_vec();
        for (i, s) in noisy.iter_mut().enumerate() {
            *s = s.wrapping_add((i % 37) as i16);
        }
        let b = Recording::new(noisy, 4, 96000).unwrap();

        let whole = correlate(&a, &b).unwrap();
        for chunk_frames in [1, 13, 512, 3000, 5000] {
            assert_eq!(
                whole,
                correlate_chunked(&a, &b, chunk_frames).unwrap(),
                "chunk_frames={}",
                chunk_frames
            );
        }
    }

    #[test]
    fn test_per_channel_detects_single_channel_damage() {
        let a = ramp_recording(500, 4);
        let mut damaged = a.samples().to_vec();
        // Zero out channel 2 only
        for frame in damaged.chunks_exact_mut(4) {
            frame[2] = 0;
        }
        let b = Recording::new(damaged, 4, 96000).unwrap();

        let per_channel = correlate_per_channel(&a, &b).unwrap();
        assert_eq!(per_channel[0], 1.0);
        assert_eq!(per_channel[1], 1.0);
        assert_eq!(per_channel[2], 0.0); // flat side: defined as 0.0
        assert_eq!(per_channel[3], 1.0);
    }
}

//! Difference signal synthesis
//!
//! Builds an audible recording of the sample-wise difference between two
//! takes, amplified for audibility and saturated to the 16-bit range.
//! Values outside [-32768, 32767] are clamped, never wrapped: a wrapped
//! difference would alias into loud garbage instead of a louder version
//! of the real discrepancy.

use crate::error::Result;
use crate::pcm::{check_same_shape, Recording};

/// Synthesize `clamp_int16(gain * (a - b))` over the common frame prefix.
///
/// The output inherits `a`'s sample rate and channel count. The product is
/// accumulated in i64 before clamping, so no gain can overflow.
pub fn synthesize_diff(a: &Recording, b: &Recording, gain: i32) -> Result<Recording> {
    check_same_shape(a, b)?;

    let frames = a.frame_count().min(b.frame_count());
    let prefix = frames * a.channel_count();

    let samples: Vec<i16> = a.samples()[..prefix]
        .iter()
        .zip(&b.samples()[..prefix])
        .map(|(&x, &y)| clamp_i16((x as i64 - y as i64) * gain as i64))
        .collect();

    Recording::new(samples, a.channel_count(), a.sample_rate())
}

/// Extract one channel's unamplified clamped difference as a mono
/// recording, for per-channel inspection.
pub fn channel_diff(a: &Recording, b: &Recording, channel: usize) -> Result<Recording> {
    check_same_shape(a, b)?;
    debug_assert!(channel < a.channel_count());

    let frames = a.frame_count().min(b.frame_count());
    let samples: Vec<i16> = a
        .channel(channel)
        .zip(b.channel(channel))
        .take(frames)
        .map(|(x, y)| clamp_i16(x as i64 - y as i64))
        .collect();

    Recording::new(samples, 1, a.sample_rate())
}

#[inline]
fn clamp_i16(value: i64) -> i16 {
    value.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

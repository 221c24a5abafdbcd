//! Analysis Engine
//!
//! Numeric kernels for comparing recordings:
//! - Per-channel statistics (RMS, peak)
//! - Pearson correlation, overall and per channel
//! - Divergence detection and difference distributions
//! - Onset / leading-silence detection and trimming
//! - Audible difference-signal synthesis
//!
//! Every kernel that also has a chunked variant accumulates in exact
//! integer arithmetic, so the chunked and whole-buffer paths agree
//! bit-for-bit.

pub mod correlation;
pub mod diff;
pub mod divergence;
pub mod onset;
pub mod stats;

pub use correlation::{
    compare, correlate, correlate_chunked, correlate_per_channel, ComparisonResult,
};
pub use diff::{channel_diff, synthesize_diff};
pub use divergence::{
    difference_stats, first_divergence, first_divergence_chunked, per_channel_difference_stats,
    DifferenceStats,
};
pub use onset::{first_exceeding, first_exceeding_chunked, strip_leading, OnsetResult};
pub use stats::{peak, rms, rms_chunked, rms_windows, segment_transitions, SegmentTransition};

//! Replaycheck - Sample-Accurate Recording Comparison
//!
//! Verifies whether multiple recordings of synthesized audio are
//! sample-accurate matches of one another: whether one playback engine is
//! deterministic across repeated runs, and whether different engines
//! produce numerically equivalent output for the same input.
//!
//! # Architecture
//!
//! - [`pcm`]: decoding raw and WAV 16-bit PCM into immutable [`pcm::Recording`] values
//! - [`analysis`]: the numeric kernels (statistics, correlation, divergence,
//!   onset detection, difference synthesis)
//! - [`report`]: text rendering over the structured results
//! - [`cli`]: the command-line surface
//!
//! Recordings are never mutated after decode; every analysis produces a
//! new value, so results are reproducible and nothing needs locking.

pub mod analysis;
pub mod cli;
pub mod error;
pub mod pcm;
pub mod report;

pub use error::{ReplaycheckError, Result};

//! CLI Module
//!
//! Command-line interface for the Replaycheck analysis tools. Raw PCM
//! inputs take their shape from `--channels` / `--sample-rate`; `.wav`
//! inputs read it from the container header.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Replaycheck - sample-accurate comparison of PCM recordings
#[derive(Parser, Debug)]
#[command(name = "replaycheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Shape of raw PCM inputs (ignored for .wav files, whose header wins)
#[derive(Args, Debug, Clone, Copy)]
pub struct RawFormat {
    /// Channel count for raw PCM input
    #[arg(long, default_value_t = 4)]
    pub channels: usize,

    /// Sample rate in Hz for raw PCM input
    #[arg(long, default_value_t = 96000)]
    pub sample_rate: u32,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two recordings: correlation, divergence, difference stats
    #[command(name = "compare")]
    Compare {
        /// First recording
        a: PathBuf,

        /// Second recording
        b: PathBuf,

        /// Divergence/significance threshold (absolute sample difference)
        #[arg(short, long, default_value_t = 100, allow_negative_numbers = true)]
        threshold: i64,

        #[command(flatten)]
        format: RawFormat,

        /// Emit the result as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check that repeated takes of one engine are identical
    #[command(name = "determinism")]
    Determinism {
        /// Two or more takes to compare pairwise
        #[arg(num_args = 2..)]
        takes: Vec<PathBuf>,

        #[command(flatten)]
        format: RawFormat,
    },

    /// Per-channel RMS and peak amplitude of one recording
    #[command(name = "stats")]
    Stats {
        /// Recording to analyze
        file: PathBuf,

        #[command(flatten)]
        format: RawFormat,

        /// Emit the result as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Find the first frame where audio exceeds a threshold
    #[command(name = "detect-start")]
    DetectStart {
        /// Recording to scan
        file: PathBuf,

        /// Amplitude threshold (0 = any non-zero sample)
        #[arg(short, long, default_value_t = 300, allow_negative_numbers = true)]
        threshold: i64,

        #[command(flatten)]
        format: RawFormat,
    },

    /// Map silence/audio segments via windowed RMS
    #[command(name = "find-offsets")]
    FindOffsets {
        /// Recording to scan
        file: PathBuf,

        /// Window length in frames (default: one second at the
        /// recording's sample rate)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        window_frames: Option<u64>,

        /// RMS level above which a window counts as audio
        #[arg(long, default_value_t = 500.0)]
        rms_threshold: f64,

        #[command(flatten)]
        format: RawFormat,
    },

    /// Write an amplified difference signal between two recordings
    #[command(name = "diff")]
    Diff {
        /// First recording
        a: PathBuf,

        /// Second recording
        b: PathBuf,

        /// Output file for the difference signal
        output: PathBuf,

        /// Amplification applied to each sample difference
        #[arg(short, long, default_value_t = 10)]
        gain: i32,

        #[command(flatten)]
        format: RawFormat,
    },

    /// Remove leading silence from a recording
    #[command(name = "strip-leading-silence")]
    StripLeadingSilence {
        /// Input recording
        input: PathBuf,

        /// Output file for the trimmed recording
        output: PathBuf,

        /// Amplitude threshold; frames with all channels at or under it
        /// count as silence (default 0 = perfect silence)
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        threshold: i64,

        #[command(flatten)]
        format: RawFormat,
    },
}

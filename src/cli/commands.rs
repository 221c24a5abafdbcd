//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command. Commands load
//! recordings, call the analysis engine, and hand the structured results
//! to the report renderers; no numeric work happens here.

use std::path::Path;

use log::{info, warn};
use sha2::{Digest, Sha256};

use crate::analysis::{
    compare, correlate, first_divergence, first_exceeding, peak, rms, rms_windows,
    segment_transitions, strip_leading, synthesize_diff,
};
use crate::error::{ReplaycheckError, Result};
use crate::pcm::{encode_raw, load_audio, save_audio, Recording};
use crate::report;

/// Validate a CLI threshold before any file I/O happens.
fn validate_threshold(value: i64) -> Result<i32> {
    if !(0..=i32::MAX as i64).contains(&value) {
        return Err(ReplaycheckError::InvalidThreshold { value });
    }
    Ok(value as i32)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Compare two recordings and print the full report.
pub fn compare_recordings(
    a_path: &Path,
    b_path: &Path,
    threshold: i64,
    channels: usize,
    sample_rate: u32,
    json: bool,
) -> Result<()> {
    let threshold = validate_threshold(threshold)?;

    let a = load_audio(a_path, channels, sample_rate)?;
    let b = load_audio(b_path, channels, sample_rate)?;

    let result = compare(&a, &b, threshold)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", report::describe_recording(&file_label(a_path), &a.info()));
        println!("{}", report::describe_recording(&file_label(b_path), &b.info()));
        println!();
        print!(
            "{}",
            report::render_comparison(
                &file_label(a_path),
                &file_label(b_path),
                &result,
                a.sample_rate()
            )
        );
    }

    Ok(())
}

/// Pairwise determinism check across two or more takes of one engine.
///
/// Byte-identical takes are reported via a SHA-256 fast path; otherwise
/// the pair is correlated and the first differing frame (threshold 0)
/// is reported.
pub fn check_determinism(
    take_paths: &[std::path::PathBuf],
    channels: usize,
    sample_rate: u32,
) -> Result<()> {
    let mut takes: Vec<(String, Recording, [u8; 32])> = Vec::with_capacity(take_paths.len());

    for path in take_paths {
        let recording = load_audio(path, channels, sample_rate)?;
        let digest: [u8; 32] = Sha256::digest(encode_raw(&recording)).into();
        println!(
            "{}",
            report::describe_recording(&file_label(path), &recording.info())
        );
        takes.push((file_label(path), recording, digest));
    }
    println!();

    let mut deterministic = true;
    for i in 0..takes.len() {
        for j in (i + 1)..takes.len() {
            let (name_a, a, digest_a) = &takes[i];
            let (name_b, b, digest_b) = &takes[j];

            if digest_a == digest_b {
                println!("{} vs {}: IDENTICAL (sha256 match)", name_a, name_b);
                continue;
            }

            deterministic = false;
            let correlation = correlate(a, b)?;
            match first_divergence(a, b, 0)? {
                Some(frame) => println!(
                    "{} vs {}: DIFFER from frame {} ({}), correlation {:.6}",
                    name_a,
                    name_b,
                    frame,
                    report::frames_to_time(frame, a.sample_rate()),
                    correlation
                ),
                // Same prefix content but different lengths
                None => println!(
                    "{} vs {}: DIFFER in length only ({} vs {} frames), correlation {:.6}",
                    name_a,
                    name_b,
                    a.frame_count(),
                    b.frame_count(),
                    correlation
                ),
            }
        }
    }

    println!();
    if deterministic {
        println!("Result: deterministic - all takes are sample-identical");
    } else {
        println!("Result: NOT deterministic - see differing pairs above");
    }

    Ok(())
}

/// Print per-channel RMS and peak amplitude for one recording.
pub fn show_stats(path: &Path, channels: usize, sample_rate: u32, json: bool) -> Result<()> {
    let recording = load_audio(path, channels, sample_rate)?;

    let rms_values = rms(&recording);
    let peak_values = peak(&recording);

    if json {
        let value = serde_json::json!({
            "file": path.display().to_string(),
            "info": recording.info(),
            "rms": rms_values,
            "peak": peak_values,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!(
            "{}",
            report::describe_recording(&file_label(path), &recording.info())
        );
        print!("{}", report::render_channel_stats(&rms_values, &peak_values));
    }

    Ok(())
}

/// Find and print where audio starts in a recording.
pub fn detect_start(path: &Path, threshold: i64, channels: usize, sample_rate: u32) -> Result<()> {
    let threshold = validate_threshold(threshold)?;

    let recording = load_audio(path, channels, sample_rate)?;
    let onset = first_exceeding(&recording, threshold);

    println!(
        "{}",
        report::render_onset(&file_label(path), &onset, recording.sample_rate())
    );

    Ok(())
}

/// Map where audio sits inside a capture via windowed RMS.
///
/// Windows default to one second at the recording's sample rate, matching
/// how segment offsets are eyeballed when multiple renders share one long
/// capture.
pub fn find_offsets(
    path: &Path,
    window_frames: Option<u64>,
    rms_threshold: f64,
    channels: usize,
    sample_rate: u32,
) -> Result<()> {
    let recording = load_audio(path, channels, sample_rate)?;
    let window = window_frames.unwrap_or(recording.sample_rate() as u64) as usize;

    let windows = rms_windows(&recording, window);
    let transitions = segment_transitions(&windows, window, rms_threshold);

    println!(
        "{}",
        report::describe_recording(&file_label(path), &recording.info())
    );
    println!();
    print!(
        "{}",
        report::render_segment_map(
            &windows,
            &transitions,
            window,
            recording.sample_rate(),
            rms_threshold
        )
    );

    Ok(())
}

/// Write the amplified difference signal between two recordings.
pub fn write_diff(
    a_path: &Path,
    b_path: &Path,
    output: &Path,
    gain: i32,
    channels: usize,
    sample_rate: u32,
) -> Result<()> {
    let a = load_audio(a_path, channels, sample_rate)?;
    let b = load_audio(b_path, channels, sample_rate)?;

    let diff = synthesize_diff(&a, &b, gain)?;
    save_audio(&diff, output)?;

    info!(
        "Wrote difference signal: {} frames, gain {}x",
        diff.frame_count(),
        gain
    );
    println!(
        "Wrote {} ({} frames, differences amplified {}x)",
        output.display(),
        diff.frame_count(),
        gain
    );

    Ok(())
}

/// Remove leading silence from a recording.
///
/// Succeeds even when the whole input is silence (the output is then
/// empty and a warning is printed). The threshold is validated before any
/// file is touched.
pub fn strip_leading_silence(
    input: &Path,
    output: &Path,
    threshold: i64,
    channels: usize,
    sample_rate: u32,
) -> Result<()> {
    let threshold = validate_threshold(threshold)?;

    let recording = load_audio(input, channels, sample_rate)?;
    let (stripped, onset) = strip_leading(&recording, threshold);

    let removed_frames = recording.frame_count() - stripped.frame_count();
    let removed_bytes = removed_frames * recording.channel_count() * 2;

    if onset.first_exceeding_frame.is_none() && !recording.is_empty() {
        warn!("Input contains only silence");
        println!("WARNING: no sound detected in entire file; output is empty");
    } else if let Some(frame) = onset.first_exceeding_frame {
        println!(
            "Leading silence: {} frames ({} bytes, {})",
            removed_frames,
            removed_bytes,
            report::frames_to_time(frame, recording.sample_rate())
        );
    }

    save_audio(&stripped, output)?;

    println!(
        "Wrote {} ({} frames); removed {} bytes of leading silence",
        output.display(),
        stripped.frame_count(),
        removed_bytes
    );

    Ok(())
}

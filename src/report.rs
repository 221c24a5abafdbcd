//! Report formatting
//!
//! Renders structured analysis results as human-readable text. This layer
//! only reads the result values; no numeric computation happens here.

use crate::analysis::{ComparisonResult, DifferenceStats, OnsetResult, SegmentTransition};
use crate::pcm::RecordingInfo;

/// Convert a frame index to an "Xm Y.ZZZs" time string.
pub fn frames_to_time(frame: usize, sample_rate: u32) -> String {
    let seconds = frame as f64 / sample_rate as f64;
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = seconds - minutes as f64 * 60.0;
    format!("{}m {:.3}s", minutes, secs)
}

/// One-line shape summary for a loaded recording.
pub fn describe_recording(name: &str, info: &RecordingInfo) -> String {
    format!(
        "{:12} {:>10} frames, {:.2}s, {} channels @ {} Hz",
        name, info.frame_count, info.duration_secs, info.channel_count, info.sample_rate
    )
}

/// Render per-channel RMS and peak values.
pub fn render_channel_stats(rms: &[f64], peak: &[u16]) -> String {
    let mut out = String::new();
    out.push_str("Channel   RMS        Peak\n");
    out.push_str(&"-".repeat(30));
    out.push('\n');
    for (ch, (r, p)) in rms.iter().zip(peak.iter()).enumerate() {
        out.push_str(&format!("{:<9} {:<10.1} {}\n", ch, r, p));
    }
    out
}

/// Render a full pairwise comparison report.
pub fn render_comparison(
    name_a: &str,
    name_b: &str,
    result: &ComparisonResult,
    sample_rate: u32,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} vs {}\n", name_a, name_b));
    out.push_str(&"=".repeat(60));
    out.push('\n');
    out.push_str(&format!(
        "Compared frames:      {} ({})\n",
        result.compared_frame_count,
        frames_to_time(result.compared_frame_count, sample_rate)
    ));
    out.push_str(&format!(
        "Overall correlation:  {:.6}\n",
        result.overall_correlation
    ));

    for (ch, corr) in result.per_channel_correlation.iter().enumerate() {
        out.push_str(&format!("  Channel {}:          {:.6}\n", ch, corr));
    }

    match result.first_divergence_frame {
        Some(frame) => {
            out.push_str(&format!(
                "First divergence:     frame {} ({}) at threshold {}\n",
                frame,
                frames_to_time(frame, sample_rate),
                result.threshold
            ));
        }
        None => {
            out.push_str(&format!(
                "First divergence:     none at threshold {}\n",
                result.threshold
            ));
        }
    }

    out.push('\n');
    out.push_str("Difference statistics (all channels):\n");
    out.push_str(&render_difference_stats(&result.difference_stats, "  "));

    for (ch, stats) in result.per_channel_difference_stats.iter().enumerate() {
        out.push_str(&format!("Channel {}:\n", ch));
        out.push_str(&render_difference_stats(stats, "  "));
    }

    out
}

fn render_difference_stats(stats: &DifferenceStats, indent: &str) -> String {
    format!(
        "{i}mean: {:.2}  median: {:.1}  std: {:.2}  max: {:.0}  significant: {:.3}%\n",
        stats.mean,
        stats.median,
        stats.std,
        stats.max,
        stats.pct_significant,
        i = indent
    )
}

/// Render a windowed RMS segment map: one line per window plus the
/// detected silence/audio transitions.
pub fn render_segment_map(
    window_rms: &[f64],
    transitions: &[SegmentTransition],
    window_frames: usize,
    sample_rate: u32,
    rms_threshold: f64,
) -> String {
    let mut out = String::new();

    out.push_str("Time      RMS       State\n");
    out.push_str(&"-".repeat(40));
    out.push('\n');
    for (i, rms) in window_rms.iter().enumerate() {
        let state = if *rms > rms_threshold { "AUDIO" } else { "silence" };
        out.push_str(&format!(
            "{:<9} {:<9.0} {}\n",
            frames_to_time(i * window_frames, sample_rate),
            rms,
            state
        ));
    }

    out.push('\n');
    out.push_str("Detected transitions:\n");
    out.push_str(&"-".repeat(40));
    out.push('\n');
    if transitions.is_empty() {
        out.push_str("(none)\n");
    }
    for transition in transitions {
        let (from, to) = if transition.to_audio {
            ("silence", "AUDIO")
        } else {
            ("AUDIO", "silence")
        };
        out.push_str(&format!(
            "{} (frame {}): {} -> {}\n",
            frames_to_time(transition.start_frame, sample_rate),
            transition.start_frame,
            from,
            to
        ));
    }

    out
}

/// Render an onset detection result.
pub fn render_onset(name: &str, result: &OnsetResult, sample_rate: u32) -> String {
    match result.first_exceeding_frame {
        Some(frame) => format!(
            "{}: audio starts at frame {} ({}) with threshold {}",
            name,
            frame,
            frames_to_time(frame, sample_rate),
            result.threshold
        ),
        None => format!(
            "{}: no sample above threshold {} (entire file is silence)",
            name, result.threshold
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_frames_to_time() {
        assert_eq!(frames_to_time(0, 96000), "0m 0.000s");
        assert_eq!(frames_to_time(96000, 96000), "0m 1.000s");
        assert_eq!(frames_to_time(48000, 96000), "0m 0.500s");
        assert_eq!(frames_to_time(96000 * 90, 96000), "1m 30.000s");
    }

    #[test]
    fn test_render_segment_map() {
        let windows = [10.0, 900.0, 20.0];
        let transitions = [
            SegmentTransition {
                window_index: 1,
                start_frame: 96000,
                to_audio: true,
            },
            SegmentTransition {
                window_index: 2,
                start_frame: 192000,
                to_audio: false,
            },
        ];
        let text = render_segment_map(&windows, &transitions, 96000, 96000, 500.0);

        assert!(text.contains("silence -> AUDIO"));
        assert!(text.contains("AUDIO -> silence"));
        assert!(text.contains("frame 96000"));
        // One state line per window
        assert_eq!(text.matches("AUDIO\n").count(), 2);
    }

    #[test]
    fn test_render_onset_silent_file() {
        let result = OnsetResult {
            first_exceeding_frame: None,
            threshold: 300,
        };
        let text = render_onset("take1.pcm", &result, 96000);
        assert!(text.contains("entire file is silence"));
        assert!(text.contains("300"));
    }

    #[test]
    fn test_render_onset_with_frame() {
        let result = OnsetResult {
            first_exceeding_frame: Some(48000),
            threshold: 0,
        };
        let text = render_onset("take1.pcm", &result, 96000);
        assert!(text.contains("frame 48000"));
        assert!(text.contains("0m 0.500s"));
    }
}

//! Replaycheck CLI - Recording Comparison Tools
//!
//! Command-line interface for the Replaycheck analysis engine.

use clap::Parser;
use env_logger::Env;
use log::info;

use replaycheck::cli::{Cli, Commands};
use replaycheck::Result;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Replaycheck v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Compare {
            a,
            b,
            threshold,
            format,
            json,
        } => replaycheck::cli::commands::compare_recordings(
            &a,
            &b,
            threshold,
            format.channels,
            format.sample_rate,
            json,
        ),
        Commands::Determinism { takes, format } => replaycheck::cli::commands::check_determinism(
            &takes,
            format.channels,
            format.sample_rate,
        ),
        Commands::Stats { file, format, json } => {
            replaycheck::cli::commands::show_stats(&file, format.channels, format.sample_rate, json)
        }
        Commands::DetectStart {
            file,
            threshold,
            format,
        } => replaycheck::cli::commands::detect_start(
            &file,
            threshold,
            format.channels,
            format.sample_rate,
        ),
        Commands::FindOffsets {
            file,
            window_frames,
            rms_threshold,
            format,
        } => replaycheck::cli::commands::find_offsets(
            &file,
            window_frames,
            rms_threshold,
            format.channels,
            format.sample_rate,
        ),
        Commands::Diff {
            a,
            b,
            output,
            gain,
            format,
        } => replaycheck::cli::commands::write_diff(
            &a,
            &b,
            &output,
            gain,
            format.channels,
            format.sample_rate,
        ),
        Commands::StripLeadingSilence {
            input,
            output,
            threshold,
            format,
        } => replaycheck::cli::commands::strip_leading_silence(
            &input,
            &output,
            threshold,
            format.channels,
            format.sample_rate,
        ),
    }
}

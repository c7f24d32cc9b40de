//! Implementation of the conversion command.
//!
//! Builds a `CoreConfig` from the parsed arguments, then either prints the
//! chapter metadata (`--dry-run`) or hands the job to
//! `cuemux_core::process_audiobook` and reports the result.

use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};

use cuemux_core::terminal;
use cuemux_core::{
    ConvertResult, CoreConfig, format_bytes, format_duration, format_millis, prepare_metadata,
    process_audiobook, to_ffmetadata, write_metadata_file,
};

use std::io::{self, Write};

use log::{debug, info};

/// Maps command-line arguments onto the core configuration.
pub fn build_core_config(cli: &Cli) -> CoreConfig {
    let mut config = CoreConfig::new(
        cli.audio_file.clone(),
        cli.cue_file.clone(),
        cli.output_file.clone(),
    );
    config.cover_path = cli.cover.clone();
    config.auto_cover = !cli.no_auto_cover;
    config.metadata_path = cli.metadata_file.clone();
    config.cue_encoding = cli.cue_encoding.clone();
    config.ffmpeg_binary = cli.ffmpeg.clone();
    config.ffprobe_binary = cli.ffprobe.clone();
    config.audio_codec = cli.audio_codec.clone();
    config.ffmpeg_loglevel = cli.ffmpeg_loglevel.clone();
    config.overwrite = cli.force;
    config
}

/// Runs the conversion described by `cli`.
pub fn run_convert(cli: &Cli) -> CliResult<()> {
    let config = build_core_config(cli);
    debug!("Configuration: {:?}", config);
    config.validate()?;

    if cli.dry_run {
        return run_dry_run(&config);
    }

    terminal::print_section("Audiobook");
    terminal::print_status("Audio", &config.audio_path.display().to_string(), false);
    terminal::print_status("Cue sheet", &config.cue_path.display().to_string(), false);
    terminal::print_status("Output", &config.output_path.display().to_string(), true);
    terminal::print_status("Audio codec", &config.audio_codec, false);

    let result = process_audiobook(&config)?;
    display_result(&result);
    Ok(())
}

/// Prints the ffmetadata to stdout without probing or running ffmpeg.
fn run_dry_run(config: &CoreConfig) -> CliResult<()> {
    let metadata = prepare_metadata(config)?;
    let text = to_ffmetadata(&metadata);

    if let Some(path) = &config.metadata_path {
        write_metadata_file(&text, Some(path))?;
        info!("Metadata written to {}", path.display());
    }

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .cli_context("Failed to write metadata to stdout")?;
    Ok(())
}

fn display_result(result: &ConvertResult) {
    terminal::print_section("Result");
    terminal::print_status("Chapters", &result.chapter_count.to_string(), true);
    if let Some(duration) = result.audio_duration {
        terminal::print_status("Duration", &format_duration(duration), false);
    }
    match &result.cover_path {
        Some(cover) => terminal::print_status("Cover", &cover.display().to_string(), false),
        None => terminal::print_status("Cover", "none", false),
    }
    if let Some(path) = &result.metadata_path {
        terminal::print_status("Metadata", &path.display().to_string(), false);
    }
    terminal::print_status("Size", &format_bytes(result.output_size), false);
    terminal::print_status(
        "Time",
        &format_millis(result.elapsed.as_millis() as u64),
        false,
    );
    terminal::print_success(&format!(
        "Wrote {} chapters to {}",
        result.chapter_count,
        result.output_path.display()
    ));
}

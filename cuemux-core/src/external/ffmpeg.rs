//! FFmpeg mux command construction and execution.
//!
//! The mux step combines the source audio, the generated ffmetadata file and
//! an optional cover image into one MP4 container. Audio is passed through
//! with the configured codec (stream copy by default); ffmpeg's diagnostics
//! are forwarded to the log as they arrive and returned verbatim on failure.

use crate::error::{CoreResult, command_failed_error};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::terminal;
use crate::utils::parse_ffmpeg_time;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Number of unclassified ffmpeg lines kept for error reports.
const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// Everything needed to build the mux command line.
#[derive(Debug, Clone)]
pub struct MuxParams {
    pub ffmpeg_binary: PathBuf,
    pub audio_path: PathBuf,
    pub metadata_path: PathBuf,
    pub cover_path: Option<PathBuf>,
    pub output_path: PathBuf,
    /// Value for `-c:a` ("copy" keeps the source stream untouched)
    pub audio_codec: String,
    /// Value for `-loglevel`
    pub log_level: String,
    /// Pass `-y` so ffmpeg never prompts about an existing output
    pub overwrite: bool,
}

/// Builds the ffmpeg command line for muxing.
///
/// Input 0 is the audio, input 1 the metadata file and input 2 the cover.
/// With a cover the image is mapped first so that output stream 0 can be
/// flagged as the attached picture.
pub fn build_mux_command(params: &MuxParams) -> FfmpegCommand {
    // `new_with_path` would add its own `-loglevel level+info` ahead of ours.
    let mut inner = Command::new(&params.ffmpeg_binary);
    inner
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut cmd = FfmpegCommand::from(inner);
    cmd.create_no_window();
    cmd.hide_banner();
    if params.overwrite {
        cmd.overwrite();
    }
    let log_level = loglevel_with_prefix(&params.log_level);
    cmd.args(["-loglevel", log_level.as_str()]);
    cmd.arg("-stats");

    cmd.input(params.audio_path.to_string_lossy().as_ref());
    cmd.input(params.metadata_path.to_string_lossy().as_ref());

    if let Some(cover) = &params.cover_path {
        cmd.input(cover.to_string_lossy().as_ref());
        cmd.args(["-c:v", "copy"]);
        cmd.args(["-map", "2"]);
        cmd.args(["-disposition:0", "attached_pic"]);
    }

    cmd.args(["-c:a", params.audio_codec.as_str()]);
    cmd.args(["-map", "0"]);
    cmd.args(["-map_metadata", "1"]);
    cmd.args(["-f", "mp4"]);
    cmd.output(params.output_path.to_string_lossy().as_ref());
    cmd
}

/// Renders the argument list for logging.
fn command_line(cmd: &FfmpegCommand) -> String {
    cmd.get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Adds ffmpeg's `level` flag so every log line is tagged with its severity,
/// which lets the event parser classify it.
fn loglevel_with_prefix(level: &str) -> String {
    if level.contains('+') {
        level.to_string()
    } else {
        format!("level+{level}")
    }
}

/// Runs the mux command and waits for it to finish.
///
/// `total_duration_secs` drives the progress bar when known. A non-zero exit
/// status is returned as `CommandFailed` carrying ffmpeg's own error lines.
pub fn run_mux<S: FfmpegSpawner>(
    spawner: &S,
    params: &MuxParams,
    total_duration_secs: Option<f64>,
) -> CoreResult<()> {
    let cmd = build_mux_command(params);
    log::debug!("Running ffmpeg mux command: {}", command_line(&cmd));

    let mut process = spawner.spawn(cmd)?;
    let progress = terminal::create_progress_bar(total_duration_secs);

    let mut errors: Vec<String> = Vec::new();
    let mut tail: VecDeque<String> = VecDeque::with_capacity(DIAGNOSTIC_TAIL_LINES);

    let events_result = process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(level, line) => match level {
                LogLevel::Fatal | LogLevel::Error => {
                    log::error!("ffmpeg: {}", line);
                    if errors.last() != Some(&line) {
                        errors.push(line);
                    }
                }
                LogLevel::Warning => log::warn!("ffmpeg: {}", line),
                _ => {
                    log::debug!("ffmpeg: {}", line);
                    if tail.len() == DIAGNOSTIC_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            },
            FfmpegEvent::Error(line) => {
                log::error!("ffmpeg: {}", line);
                if errors.last() != Some(&line) {
                    errors.push(line);
                }
            }
            FfmpegEvent::Progress(p) => {
                if let Some(secs) = parse_ffmpeg_time(&p.time) {
                    progress.set_position(secs.max(0.0) as u64);
                }
                progress.set_message(format!("{:.1}x", p.speed));
            }
            _ => {}
        }
        Ok(())
    });

    let status = process.wait();
    progress.finish_and_clear();
    events_result?;
    let status = status?;

    if !status.success() {
        let diagnostics = if errors.is_empty() {
            tail.into_iter().collect::<Vec<_>>().join("\n")
        } else {
            errors.join("\n")
        };
        log::error!("ffmpeg mux failed: {}", status);
        return Err(command_failed_error("ffmpeg (mux)", status, diagnostics));
    }

    log::debug!("ffmpeg mux finished: {}", params.output_path.display());
    Ok(())
}

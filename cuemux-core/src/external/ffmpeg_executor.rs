//! The seam between the mux step and a running ffmpeg.
//!
//! `run_mux` builds an `FfmpegCommand` and hands it to an [`FfmpegSpawner`];
//! it then drains the log/progress events and waits for the exit status
//! through [`FfmpegProcess`]. `SidecarSpawner` starts the real binary, and
//! the mocks in `external::mocks` replay canned events instead.

use crate::error::{CoreError, CoreResult, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::io;
use std::process::ExitStatus;

/// A started mux process.
pub trait FfmpegProcess {
    /// Feeds every event ffmpeg emits to `handler` until its output closes.
    /// An error from the handler stops the loop and is returned.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Starts ffmpeg for a fully built command line.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// A real ffmpeg child process.
pub struct SidecarProcess(FfmpegChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        // Fails only when stderr was not piped, which build_mux_command always does.
        let events = self.0.iter().map_err(|e| {
            CoreError::CommandWait("ffmpeg (mux)".to_string(), io::Error::other(e.to_string()))
        })?;
        events.into_iter().try_for_each(&mut handler)
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_wait_error("ffmpeg (mux)", e))
    }
}

/// Spawns the ffmpeg binary named in the command.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let program = cmd.as_inner().get_program().to_string_lossy().into_owned();
        log::debug!("Starting {}", program);
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error(program, e))
    }
}

// ============================================================================
// clipsmith-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. Every operation builds an FfmpegCommand and hands it to
// run_ffmpeg, which drives the event stream through the progress handler and
// turns a non-zero exit into a CommandFailed error carrying stderr.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - run_ffmpeg: Spawn, stream events, wait, map failure

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use crate::progress_reporting::ffmpeg_handler::FfmpegProgressHandler;

use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {e}");
            command_failed_error(
                "ffmpeg (sidecar - get iter)",
                ExitStatus::default(),
                e.to_string(),
            )
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

// --- Running a Command ---

/// Runs `cmd` to completion, reporting progress against `duration_secs`.
///
/// `label` names the step in logs and errors (e.g. `"crop"`).
pub fn run_ffmpeg<S: FfmpegSpawner>(
    spawner: &S,
    cmd: FfmpegCommand,
    label: &str,
    duration_secs: Option<f64>,
) -> CoreResult<()> {
    log::debug!("Running ffmpeg ({label}): {cmd:?}");

    let mut process = spawner.spawn(cmd)?;
    let mut handler = FfmpegProgressHandler::new(duration_secs);
    process.handle_events(|event| handler.handle_event(event))?;
    let status = process.wait()?;

    if status.success() {
        crate::progress_reporting::clear_progress();
        log::debug!("ffmpeg ({label}) finished successfully");
        Ok(())
    } else {
        crate::progress_reporting::clear_progress();
        log::error!("ffmpeg ({label}) failed: {status}");
        Err(command_failed_error(
            format!("ffmpeg ({label})"),
            status,
            handler.stderr_buffer().trim().to_string(),
        ))
    }
}

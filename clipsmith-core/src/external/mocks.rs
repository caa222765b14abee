// clipsmith-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::*;
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

/// Content written to fabricated output files.
pub const MOCK_OUTPUT_CONTENT: &[u8] = b"mock ffmpeg output";

#[cfg(unix)]
fn exit_status_from_code(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status_from_code(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawned command consumes the first expectation whose pattern is a
/// substring of any argument. With `create_dummy_output`, the last argument
/// (the output path) is created on disk.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: exit_status_from_code(0),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    /// Process that logs `stderr` at error level and exits with `exit_code`.
    pub fn add_exit_error_expectation(&self, arg_pattern: &str, stderr: &str, exit_code: i32) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(vec![FfmpegEvent::Log(
                LogLevel::Error,
                stderr.to_string(),
            )])),
            exit_status: exit_status_from_code(exit_code),
        };
        self.add_expectation(arg_pattern, Ok(process), false);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }

    /// Number of expectations not yet consumed.
    pub fn pending_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();

        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockFfmpegSpawner: No expectation found for command args: {args:?}");
            panic!("MockFfmpegSpawner: No expectation found for command args: {args:?}");
        };

        let expectation = expectations.remove(index);
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        match expectation.result {
            Ok(process) => {
                if expectation.create_dummy_output {
                    if let Some(output_path_str) = args.last() {
                        let output_path = PathBuf::from(output_path_str);
                        if let Err(e) = std::fs::write(&output_path, MOCK_OUTPUT_CONTENT) {
                            log::error!(
                                "MockFfmpegSpawner failed to create dummy output file {output_path:?}: {e}"
                            );
                        }
                    }
                }
                Ok(process)
            }
            Err(err) => {
                log::warn!(
                    "MockFfmpegSpawner simulating spawn error for pattern '{}': {:?}",
                    expectation.arg_pattern,
                    err
                );
                Err(err)
            }
        }
    }
}

/// Mock implementation of FfprobeExecutor.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    video_properties_results: Rc<RefCell<HashMap<PathBuf, VideoProperties>>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers the properties returned for `input_path`.
    pub fn expect_video_properties(&self, input_path: &Path, properties: VideoProperties) {
        self.video_properties_results
            .borrow_mut()
            .insert(input_path.to_path_buf(), properties);
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn get_video_properties(&self, input_path: &Path) -> CoreResult<VideoProperties> {
        log::info!(
            "MockFfprobeExecutor::get_video_properties called for: {}",
            input_path.display()
        );
        self.video_properties_results
            .borrow()
            .get(input_path)
            .cloned()
            .ok_or_else(|| {
                CoreError::VideoInfoError(format!(
                    "MockFfprobeExecutor: No expectation set for path {}",
                    input_path.display()
                ))
            })
    }
}

/// Properties of a 1920x1080, 10 second, 30 fps clip.
pub fn sample_properties(has_audio: bool) -> VideoProperties {
    VideoProperties {
        width: 1920,
        height: 1080,
        duration_secs: 10.0,
        frame_rate: Some(30.0),
        total_frames: Some(300),
        has_audio,
    }
}

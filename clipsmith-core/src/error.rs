// ============================================================================
// clipsmith-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for clipsmith-core
//
// Every operation in the library returns CoreResult<T>. Errors are never
// classified for recovery by callers; the front end shows the message text.
// The only recovery inside the library is the retrying replace used by trim,
// which surfaces FileLocked once its attempts are exhausted.
//
// KEY COMPONENTS:
// - CoreError: Enum of all library failure modes
// - CoreResult: Result alias used across the crate
// - Helper constructors for external command failures

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error type for the clipsmith-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Required external command '{0}' not found. Please install it and ensure it's in your PATH.")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to wait for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{cmd}' failed with status {status}. Stderr: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    FfprobeParse(String),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("Video info error: {0}")]
    VideoInfoError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid region {region}: {reason}")]
    InvalidRegion { region: String, reason: String },

    #[error("No audio stream found in {0}")]
    NoAudioStream(String),

    #[error(
        "Could not access {} after {attempts} attempts. Please close any programs using the video file.",
        path.display()
    )]
    FileLocked {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for clipsmith-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Creates a [`CoreError::CommandStart`] for a command that failed to spawn.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Creates a [`CoreError::CommandWait`] for a command whose exit could not be collected.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Creates a [`CoreError::CommandFailed`] carrying the captured stderr text.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

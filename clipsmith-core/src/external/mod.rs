// ============================================================================
// clipsmith-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools and File System
//
// This module encapsulates interactions with ffmpeg and ffprobe. Operations
// are generic over the spawner and prober traits so tests can inject the
// mocks instead of the real tools.
//
// KEY COMPONENTS:
// - Traits for external tool interactions (FfmpegSpawner, FfprobeExecutor)
// - Concrete implementations using ffmpeg-sidecar and ffprobe crates
// - Dependency checking functions
// - File size lookup

use crate::error::{CoreError, CoreResult};

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Command builders and filter-string helpers
pub mod ffmpeg_builder;

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

/// Recording mocks for the spawner and prober traits
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_builder::{FfmpegCommandBuilder, VideoFilterChain};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner, run_ffmpeg};
pub use ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor, VideoProperties, get_video_properties};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs `<cmd_name> -version` and only inspects whether it could start.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency directly: {cmd_name}");
            Ok(())
        }
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                log::warn!("Dependency '{cmd_name}' not found.");
                Err(CoreError::DependencyNotFound(cmd_name.to_string()))
            } else {
                log::error!("Failed to start dependency check command '{cmd_name}': {e}");
                Err(CoreError::CommandStart(cmd_name.to_string(), e))
            }
        }
    }
}

/// Checks for both `ffmpeg` and `ffprobe`.
pub fn check_required_tools() -> CoreResult<()> {
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")
}

/// Gets the size of the file at the given path in bytes.
pub fn get_file_size(path: &Path) -> CoreResult<u64> {
    Ok(std::fs::metadata(path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_reports_not_found() {
        let result = check_dependency("clipsmith-definitely-not-a-real-binary");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }
}

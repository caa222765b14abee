// ============================================================================
// clipsmith-core/src/processing/replace.rs
// ============================================================================
//
// IN-PLACE REPLACEMENT: Delete the Source, Rename the Temp File Over It
//
// Every in-place operation finishes here. There is no backup: once the
// source is removed the temporary output is the only copy.
//
// Trim uses a retrying policy because the decoder can keep the source handle
// open briefly after ffmpeg exits; only PermissionDenied is retried.
//
// KEY COMPONENTS:
// - ReplacePolicy: settle delay, attempt count, retry delay
// - FileOps: filesystem seam so the retry path can be tested
// - replace_original / replace_original_with

use crate::error::{CoreError, CoreResult};

use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// How the delete+rename step is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacePolicy {
    /// Total attempts, at least 1
    pub attempts: u32,
    /// Pause between failed attempts
    pub retry_delay: Duration,
    /// Pause before the first attempt
    pub settle_delay: Duration,
}

impl ReplacePolicy {
    /// One attempt, no waiting.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            attempts: 1,
            retry_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn retrying(attempts: u32, retry_delay: Duration, settle_delay: Duration) -> Self {
        Self {
            attempts,
            retry_delay,
            settle_delay,
        }
    }
}

impl Default for ReplacePolicy {
    fn default() -> Self {
        Self::immediate()
    }
}

/// Filesystem operations used by the replace step.
pub trait FileOps {
    fn exists(&self, path: &Path) -> bool;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FileOps`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}

/// Replaces `original` with `temp` on the real filesystem.
pub fn replace_original(temp: &Path, original: &Path, policy: &ReplacePolicy) -> CoreResult<()> {
    replace_original_with(&StdFileOps, temp, original, policy)
}

/// Replaces `original` with `temp`: remove the original if present, then
/// rename the temporary file onto its path.
pub fn replace_original_with<F: FileOps>(
    fs: &F,
    temp: &Path,
    original: &Path,
    policy: &ReplacePolicy,
) -> CoreResult<()> {
    if !fs.exists(temp) {
        return Err(CoreError::PathError(format!(
            "Temporary output {} was not created",
            temp.display()
        )));
    }

    if !policy.settle_delay.is_zero() {
        log::debug!(
            "Waiting {:?} for file handles on {} to be released",
            policy.settle_delay,
            original.display()
        );
        thread::sleep(policy.settle_delay);
    }

    let attempts = policy.attempts.max(1);
    for attempt in 1..=attempts {
        match try_replace(fs, temp, original) {
            Ok(()) => {
                log::debug!("Replaced {} with {}", original.display(), temp.display());
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                if attempt < attempts {
                    log::warn!(
                        "File locked, retrying in {:?}... (attempt {attempt}/{attempts})",
                        policy.retry_delay
                    );
                    thread::sleep(policy.retry_delay);
                } else if attempts > 1 {
                    return Err(CoreError::FileLocked {
                        path: original.to_path_buf(),
                        attempts,
                        source: e,
                    });
                } else {
                    return Err(CoreError::Io(e));
                }
            }
            Err(e) => return Err(CoreError::Io(e)),
        }
    }

    Err(CoreError::OperationFailed(format!(
        "replacing {} made no attempts",
        original.display()
    )))
}

fn try_replace<F: FileOps>(fs: &F, temp: &Path, original: &Path) -> io::Result<()> {
    if fs.exists(original) {
        fs.remove_file(original)?;
    }
    fs.rename(temp, original)
}

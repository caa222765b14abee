//! Temporary file naming for in-place operations.
//!
//! Operations write next to the source so the final rename never crosses a
//! filesystem boundary. Names carry a random suffix so two runs never target
//! the same temporary file.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Returns a temporary file path with random suffix. Does not create the file.
pub fn create_temp_file_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    use rand::distributions::Alphanumeric;
    use rand::{Rng, thread_rng};

    let random_suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    let filename = if extension.is_empty() {
        format!("{prefix}_{random_suffix}")
    } else {
        format!("{prefix}_{random_suffix}.{extension}")
    };
    dir.join(filename)
}

/// Temporary sibling of `source` tagged with the operation name,
/// e.g. `clip.mp4` + `cropped` -> `clip_cropped_temp_Ab12Cd.mp4`.
///
/// The source extension is kept so ffmpeg picks the same container.
pub fn sibling_temp_path(source: &Path, tag: &str) -> CoreResult<PathBuf> {
    let stem = source
        .file_stem()
        .ok_or_else(|| CoreError::PathError(format!("No file name in {}", source.display())))?
        .to_string_lossy();
    let extension = source
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    Ok(create_temp_file_path(
        dir,
        &format!("{stem}_{tag}_temp"),
        &extension,
    ))
}

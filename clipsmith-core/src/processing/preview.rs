//! Preview frames for region selection.
//!
//! One decoded frame is scaled to fit the preview box. Coordinates picked on
//! that image are mapped back to the source with the returned
//! [`PreviewScale`].

use super::{path_arg, remove_partial_output};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, FfprobeExecutor, VideoFilterChain, run_ffmpeg};
use crate::region::PreviewScale;

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A preview image written to disk and the scale it was taken at.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewFrame {
    pub path: PathBuf,
    pub source_width: u32,
    pub source_height: u32,
    pub display_width: u32,
    pub display_height: u32,
    pub scale: PreviewScale,
    /// Position of the frame in seconds
    pub at_secs: f64,
}

/// Default preview location: `<stem>_preview.png` next to the input.
#[must_use]
pub fn default_preview_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    input.with_file_name(format!("{stem}_preview.png"))
}

/// Writes the frame at `at_secs` (the first frame for 0) of `input` to
/// `output` as a PNG fitted into the configured preview box.
pub fn extract_preview_frame<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    input: &Path,
    at_secs: f64,
    output: &Path,
) -> CoreResult<PreviewFrame> {
    if !at_secs.is_finite() || at_secs < 0.0 {
        return Err(CoreError::InvalidParameter(format!(
            "preview position must be a non-negative number of seconds, got {at_secs}"
        )));
    }

    let props = prober.get_video_properties(input)?;
    if at_secs > props.duration_secs {
        return Err(CoreError::InvalidParameter(format!(
            "preview position {at_secs:.2}s is past the end of the video ({:.2}s)",
            props.duration_secs
        )));
    }

    let scale = PreviewScale::fit(
        props.width,
        props.height,
        config.preview_max_width,
        config.preview_max_height,
    )?;
    let (display_width, display_height) = scale.display_size(props.width, props.height);

    let mut chain = VideoFilterChain::new();
    if scale.is_downscaled() {
        chain = chain.add_scale(display_width.max(1), display_height.max(1));
    }
    let filters = chain.build();

    let mut cmd = FfmpegCommandBuilder::new().build();
    if at_secs > 0.0 {
        cmd.args(["-ss", format!("{at_secs:.3}").as_str()]);
    }
    cmd.input(path_arg(input));
    cmd.args(["-frames:v", "1"]);
    if let Some(filters) = &filters {
        cmd.args(["-vf", filters.as_str()]);
    }
    cmd.output(path_arg(output));

    if let Err(e) = run_ffmpeg(spawner, cmd, "preview", None) {
        remove_partial_output(output);
        return Err(e);
    }

    log::debug!(
        "Preview of {} at {at_secs:.2}s written to {} ({display_width}x{display_height}, factor {:.4})",
        input.display(),
        output.display(),
        scale.factor()
    );

    Ok(PreviewFrame {
        path: output.to_path_buf(),
        source_width: props.width,
        source_height: props.height,
        display_width,
        display_height,
        scale,
        at_secs,
    })
}

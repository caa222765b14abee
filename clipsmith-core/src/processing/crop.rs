//! Crop a video to a region, in place.

use super::{Container, ReplacePolicy, path_arg, run_in_place};
use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, FfprobeExecutor, VideoFilterChain};
use crate::region::Region;

use std::path::Path;

/// Crops `input` to `region` (source pixel coordinates).
///
/// A region covering the whole frame leaves the file untouched. Bounds are
/// not checked against the frame; ffmpeg rejects regions it cannot apply.
pub fn crop<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    input: &Path,
    region: &Region,
) -> CoreResult<()> {
    region.ensure_non_empty()?;
    let props = prober.get_video_properties(input)?;

    if *region == Region::full_frame(props.width, props.height) {
        log::info!(
            "Region {region} covers the whole {}x{} frame, nothing to crop",
            props.width,
            props.height
        );
        return Ok(());
    }

    let container = Container::from_path(input);
    let filters = VideoFilterChain::new().add_crop(&region.crop_spec()).build();

    run_in_place(
        spawner,
        input,
        "cropped",
        Some(props.duration_secs),
        &ReplacePolicy::immediate(),
        |temp| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            if let Some(filters) = &filters {
                cmd.args(["-vf", filters.as_str()]);
            }
            cmd.args(container.video_encode_args(
                config.reencode_crf,
                &config.preset,
                (region.width(), region.height()),
            ));
            if props.has_audio {
                cmd.args(["-c:a", "copy"]);
            }
            cmd.output(path_arg(temp));
            cmd
        },
    )
}

//! Gaussian blur over one region of every frame, in place.
//!
//! The frame is split, the copy is cropped to the region and blurred, then
//! overlaid back at the region origin. Pixels outside the region are the
//! decoded source pixels.

use super::{Container, ReplacePolicy, path_arg, run_in_place};
use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::external::ffmpeg_builder::gaussian_sigma_for_kernel;
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, FfprobeExecutor};
use crate::region::Region;

use std::path::Path;

/// `filter_complex` graph blurring `region` with a `kernel`x`kernel` Gaussian.
#[must_use]
pub fn blur_filter_graph(region: &Region, kernel: u32) -> String {
    let sigma = gaussian_sigma_for_kernel(kernel);
    format!(
        "[0:v]split[base][roi];[roi]crop={crop},gblur=sigma={sigma:.2}[blurred];[base][blurred]overlay={x}:{y}[out]",
        crop = region.crop_spec(),
        x = region.left,
        y = region.top,
    )
}

/// Blurs `region` (source pixel coordinates) in every frame of `input`.
pub fn blur_region<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    input: &Path,
    region: &Region,
) -> CoreResult<()> {
    region.ensure_non_empty()?;
    let props = prober.get_video_properties(input)?;

    let container = Container::from_path(input);
    let graph = blur_filter_graph(region, config.blur_kernel);

    run_in_place(
        spawner,
        input,
        "blurred",
        Some(props.duration_secs),
        &ReplacePolicy::immediate(),
        |temp| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            cmd.args(["-filter_complex", graph.as_str()]);
            cmd.args(["-map", "[out]"]);
            if props.has_audio {
                cmd.args(["-map", "0:a", "-c:a", "copy"]);
            }
            cmd.args(container.video_encode_args(
                config.reencode_crf,
                &config.preset,
                (props.width, props.height),
            ));
            cmd.output(path_arg(temp));
            cmd
        },
    )
}

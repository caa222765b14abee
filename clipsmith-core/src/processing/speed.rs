//! Change playback speed, in place.

use super::{Container, ReplacePolicy, path_arg, run_in_place};
use crate::config::{CoreConfig, MAX_SPEED_FACTOR, MIN_SPEED_FACTOR};
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_builder::atempo_chain;
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, FfprobeExecutor, VideoFilterChain};

use std::path::Path;

/// Checks that `factor` lies within the supported multiplier range.
pub fn validate_factor(factor: f64) -> CoreResult<()> {
    if !(MIN_SPEED_FACTOR..=MAX_SPEED_FACTOR).contains(&factor) {
        return Err(CoreError::InvalidParameter(format!(
            "speed factor must be between {MIN_SPEED_FACTOR} and {MAX_SPEED_FACTOR}, got {factor}"
        )));
    }
    Ok(())
}

/// Plays `input` back `factor` times faster (below 1 slows it down).
///
/// Audio is tempo-shifted with an `atempo` chain so pitch is kept.
pub fn change_speed<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    input: &Path,
    factor: f64,
) -> CoreResult<()> {
    validate_factor(factor)?;
    let props = prober.get_video_properties(input)?;

    let container = Container::from_path(input);
    let video_filter = VideoFilterChain::new().add_speed(factor).build();
    let audio_filter = atempo_chain(factor).join(",");

    run_in_place(
        spawner,
        input,
        "sped",
        Some(props.duration_secs / factor),
        &ReplacePolicy::immediate(),
        |temp| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            if let Some(filter) = &video_filter {
                cmd.args(["-filter:v", filter.as_str()]);
            }
            cmd.args(container.video_encode_args(
                config.reencode_crf,
                &config.preset,
                (props.width, props.height),
            ));
            if props.has_audio {
                if !audio_filter.is_empty() {
                    cmd.args(["-filter:a", audio_filter.as_str()]);
                }
                cmd.args(container.audio_encode_args());
            } else {
                cmd.arg("-an");
            }
            cmd.output(path_arg(temp));
            cmd
        },
    )
}

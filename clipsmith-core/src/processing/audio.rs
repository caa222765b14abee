//! Audio track operations: remove it in place, or extract it to MP3.

use super::{ReplacePolicy, path_arg, run_in_place, run_to_output};
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, FfprobeExecutor};

use std::path::{Path, PathBuf};

/// Removes the audio track from `input`.
///
/// Video is stream-copied, so frames are untouched. A file without audio is
/// left as it is.
pub fn mute<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    input: &Path,
) -> CoreResult<()> {
    let props = prober.get_video_properties(input)?;
    if !props.has_audio {
        log::info!("{} has no audio track, nothing to remove", input.display());
        return Ok(());
    }

    run_in_place(
        spawner,
        input,
        "muted",
        Some(props.duration_secs),
        &ReplacePolicy::immediate(),
        |temp| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            cmd.args(["-map", "0:v", "-c:v", "copy", "-an"]);
            cmd.output(path_arg(temp));
            cmd
        },
    )
}

/// Writes the audio track of `input` to `<base>.mp3` and returns that path.
pub fn extract_audio<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    input: &Path,
) -> CoreResult<PathBuf> {
    let props = prober.get_video_properties(input)?;
    if !props.has_audio {
        return Err(CoreError::NoAudioStream(input.display().to_string()));
    }

    let output = input.with_extension("mp3");
    run_to_output(
        spawner,
        input,
        &output,
        "audio",
        Some(props.duration_secs),
        |target| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            cmd.args(["-vn", "-c:a", "libmp3lame", "-q:a", "2"]);
            cmd.output(path_arg(target));
            cmd
        },
    )?;
    Ok(output)
}

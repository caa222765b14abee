//! Resize a video to exact dimensions, in place.

use super::{Container, ReplacePolicy, path_arg, run_in_place};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, FfprobeExecutor, VideoFilterChain};

use std::path::Path;

/// Named target sizes offered by the front end.
pub const RESIZE_PRESETS: [(&str, u32, u32); 5] = [
    ("480p", 854, 480),
    ("720p", 1280, 720),
    ("1080p", 1920, 1080),
    ("1440p", 2560, 1440),
    ("4k", 3840, 2160),
];

/// Looks up a preset by name, case-insensitively.
#[must_use]
pub fn preset_dimensions(name: &str) -> Option<(u32, u32)> {
    RESIZE_PRESETS
        .iter()
        .find(|(preset, _, _)| preset.eq_ignore_ascii_case(name))
        .map(|&(_, w, h)| (w, h))
}

/// Height that keeps the `source` aspect ratio at `width`, truncated.
#[must_use]
pub fn height_for_width(width: u32, source_width: u32, source_height: u32) -> u32 {
    if source_width == 0 {
        return 0;
    }
    let ratio = f64::from(source_width) / f64::from(source_height);
    (f64::from(width) / ratio) as u32
}

fn validate_dimensions(width: u32, height: u32) -> CoreResult<()> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidParameter(format!(
            "target size must be non-zero, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Scales every frame of `input` to exactly `width`x`height`.
///
/// Odd sizes are kept as requested; H.264 output is then written in 4:4:4.
pub fn resize<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    input: &Path,
    width: u32,
    height: u32,
) -> CoreResult<()> {
    validate_dimensions(width, height)?;
    let container = Container::from_path(input);
    let props = prober.get_video_properties(input)?;

    let filters = VideoFilterChain::new().add_scale(width, height).build();

    run_in_place(
        spawner,
        input,
        "resized",
        Some(props.duration_secs),
        &ReplacePolicy::immediate(),
        |temp| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            if let Some(filters) = &filters {
                cmd.args(["-vf", filters.as_str()]);
            }
            cmd.args(container.video_encode_args(config.reencode_crf, &config.preset, (width, height)));
            if props.has_audio {
                cmd.args(["-c:a", "copy"]);
            }
            cmd.output(path_arg(temp));
            cmd
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockFfmpegSpawner;
    use crate::processing::test_support::*;

    #[test]
    fn test_scale_filter_uses_exact_size() {
        let (_dir, input, prober) = source_file("clip.mp4", true);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("scale=", vec![], true);

        resize(&spawner, &prober, &CoreConfig::default(), &input, 1280, 720).unwrap();

        let args = &spawner.get_received_calls()[0];
        assert_eq!(arg_after(args, "-vf"), Some("scale=1280:720:flags=bilinear"));
    }

    #[test]
    fn test_odd_size_is_scaled_exactly_for_mp4() {
        let (_dir, input, prober) = source_file("clip.mp4", true);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("scale=", vec![], true);

        resize(&spawner, &prober, &CoreConfig::default(), &input, 589, 330).unwrap();

        let args = &spawner.get_received_calls()[0];
        assert_eq!(arg_after(args, "-vf"), Some("scale=589:330:flags=bilinear"));
        assert_eq!(arg_after(args, "-c:v"), Some("libx264"));
        assert_eq!(arg_after(args, "-pix_fmt"), Some("yuv444p"));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(validate_dimensions(853, 480).is_ok());
        assert!(validate_dimensions(0, 480).is_err());
        assert!(validate_dimensions(640, 0).is_err());
    }

    #[test]
    fn test_presets_and_aspect_ratio() {
        assert_eq!(preset_dimensions("720P"), Some((1280, 720)));
        assert_eq!(preset_dimensions("4K"), Some((3840, 2160)));
        assert_eq!(preset_dimensions("8k"), None);
        assert_eq!(height_for_width(1280, 1920, 1080), 720);
        assert_eq!(height_for_width(640, 1920, 800), 266);
    }
}

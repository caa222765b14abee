//! Keep a time range of a video, in place.
//!
//! ffmpeg can hold the source open for a moment after it exits, so the
//! replace step uses `CoreConfig::trim_replace` (settle delay plus retries on
//! a permission error).

use super::{Container, path_arg, run_in_place};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, FfprobeExecutor};
use crate::utils::format_clock;

use std::path::Path;

/// Allowed overshoot of `end` past the probed duration, in seconds.
const END_TOLERANCE_SECS: f64 = 0.05;

/// Checks `0 <= start < end`.
pub fn validate_range(start: f64, end: f64) -> CoreResult<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(CoreError::InvalidParameter(
            "start and end must be finite numbers".to_string(),
        ));
    }
    if start < 0.0 {
        return Err(CoreError::InvalidParameter(format!(
            "start time must not be negative, got {start}"
        )));
    }
    if start >= end {
        return Err(CoreError::InvalidParameter(format!(
            "start time ({}) must be before end time ({})",
            format_clock(start),
            format_clock(end)
        )));
    }
    Ok(())
}

/// Keeps `[start, end)` seconds of `input` and replaces the file.
pub fn trim<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    input: &Path,
    start: f64,
    end: f64,
) -> CoreResult<()> {
    validate_range(start, end)?;
    let props = prober.get_video_properties(input)?;

    if end > props.duration_secs + END_TOLERANCE_SECS {
        return Err(CoreError::InvalidParameter(format!(
            "end time ({}) is past the end of the video ({})",
            format_clock(end),
            format_clock(props.duration_secs)
        )));
    }

    let container = Container::from_path(input);
    let start_arg = format!("{start:.3}");
    let end_arg = format!("{end:.3}");

    run_in_place(
        spawner,
        input,
        "subclip",
        Some(end - start),
        &config.trim_replace,
        |temp| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            cmd.args(["-ss", start_arg.as_str(), "-to", end_arg.as_str()]);
            cmd.args(container.video_encode_args(
                config.reencode_crf,
                &config.preset,
                (props.width, props.height),
            ));
            if props.has_audio {
                cmd.args(container.audio_encode_args());
            } else {
                cmd.arg("-an");
            }
            cmd.output(path_arg(temp));
            cmd
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MOCK_OUTPUT_CONTENT, MockFfmpegSpawner};
    use crate::processing::ReplacePolicy;
    use crate::processing::test_support::*;

    fn fast_config() -> CoreConfig {
        CoreConfig {
            trim_replace: ReplacePolicy::immediate(),
            ..CoreConfig::default()
        }
    }

    #[test]
    fn test_trim_passes_range_and_replaces_input() {
        let (dir, input, prober) = source_file("clip.mp4", true);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("-to", vec![], true);

        trim(&spawner, &prober, &fast_config(), &input, 1.5, 4.0).unwrap();

        let args = &spawner.get_received_calls()[0];
        assert_eq!(arg_after(args, "-ss"), Some("1.500"));
        assert_eq!(arg_after(args, "-to"), Some("4.000"));
        assert_eq!(arg_after(args, "-c:a"), Some("aac"));
        assert_eq!(std::fs::read(&input).unwrap(), MOCK_OUTPUT_CONTENT);
        assert_eq!(dir_entries(dir.path()), ["clip.mp4"]);
    }

    #[test]
    fn test_trim_without_audio_drops_audio() {
        let (_dir, input, prober) = source_file("clip.webm", false);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("-to", vec![], true);

        trim(&spawner, &prober, &fast_config(), &input, 0.0, 2.0).unwrap();

        let args = &spawner.get_received_calls()[0];
        assert!(args.iter().any(|a| a == "-an"));
        assert_eq!(arg_after(args, "-c:v"), Some("libvpx-vp9"));
    }

    #[test]
    fn test_range_validation() {
        assert!(validate_range(0.0, 1.0).is_ok());
        assert!(validate_range(2.0, 2.0).is_err());
        assert!(validate_range(3.0, 2.0).is_err());
        assert!(validate_range(-1.0, 2.0).is_err());
        assert!(validate_range(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_end_past_duration_is_rejected() {
        let (_dir, input, prober) = source_file("clip.mp4", true);
        let spawner = MockFfmpegSpawner::new();

        let result = trim(&spawner, &prober, &fast_config(), &input, 0.0, 12.0);
        assert!(matches!(result, Err(CoreError::InvalidParameter(_))));
        assert!(spawner.get_received_calls().is_empty());
    }
}

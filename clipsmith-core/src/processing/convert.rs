// ============================================================================
// clipsmith-core/src/processing/convert.rs
// ============================================================================
//
// FORMAT CONVERSION: WebM, MP4, GIF and MP3 Outputs
//
// Conversion writes `<base>.<ext>` next to the input and leaves the input in
// place, unless both paths are the same (e.g. WebM -> WebM), in which case the
// result replaces the input.
//
// KEY COMPONENTS:
// - OutputFormat: Target format and its extension
// - convert: Dispatch per format
// - WebM audio: Opus at 48 kHz, retried once with Vorbis if Opus fails

use super::{Container, audio, path_arg, run_to_output};
use crate::config::{CoreConfig, OPUS_SAMPLE_RATE};
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, FfprobeExecutor, VideoProperties};

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Palette-based GIF encoding at the source frame rate.
const GIF_FILTER_GRAPH: &str = "[0:v]split[a][b];[a]palettegen[p];[b][p]paletteuse";

/// Target of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Webm,
    Mp4,
    Gif,
    Mp3,
}

impl OutputFormat {
    pub const ALL: [Self; 4] = [Self::Webm, Self::Mp4, Self::Gif, Self::Mp3];

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::Gif => "gif",
            Self::Mp3 => "mp3",
        }
    }

    /// Path the conversion of `input` writes to.
    #[must_use]
    pub fn output_path(self, input: &Path) -> PathBuf {
        input.with_extension(self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s.trim_start_matches('.')))
            .ok_or_else(|| {
                CoreError::InvalidParameter(format!(
                    "unknown output format '{s}', expected one of: webm, mp4, gif, mp3"
                ))
            })
    }
}

/// Converts `input` to `format` and returns the written path.
pub fn convert<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    input: &Path,
    format: OutputFormat,
) -> CoreResult<PathBuf> {
    if format == OutputFormat::Mp3 {
        return audio::extract_audio(spawner, prober, input);
    }

    let props = prober.get_video_properties(input)?;
    let output = format.output_path(input);
    log::info!("Converting {} -> {}", input.display(), output.display());

    if format == OutputFormat::Webm {
        convert_webm(spawner, config, input, &output, &props)?;
    } else if format == OutputFormat::Gif {
        convert_gif(spawner, input, &output, &props)?;
    } else {
        convert_mp4(spawner, config, input, &output, &props)?;
    }
    Ok(output)
}

fn convert_mp4<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    input: &Path,
    output: &Path,
    props: &VideoProperties,
) -> CoreResult<()> {
    let container = Container::Mp4;
    run_to_output(
        spawner,
        input,
        output,
        "mp4",
        Some(props.duration_secs),
        |target| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            cmd.args(container.video_encode_args(
                config.mp4_crf,
                &config.preset,
                (props.width, props.height),
            ));
            if props.has_audio {
                cmd.args(container.audio_encode_args());
            } else {
                cmd.arg("-an");
            }
            cmd.args(["-movflags", "+faststart"]);
            cmd.output(path_arg(target));
            cmd
        },
    )
}

fn convert_gif<S: FfmpegSpawner>(
    spawner: &S,
    input: &Path,
    output: &Path,
    props: &VideoProperties,
) -> CoreResult<()> {
    run_to_output(
        spawner,
        input,
        output,
        "gif",
        Some(props.duration_secs),
        |target| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            cmd.args(["-filter_complex", GIF_FILTER_GRAPH, "-an"]);
            cmd.output(path_arg(target));
            cmd
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebmAudio {
    Opus,
    Vorbis,
    None,
}

fn convert_webm<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    input: &Path,
    output: &Path,
    props: &VideoProperties,
) -> CoreResult<()> {
    let first_choice = match (props.has_audio, config.use_opus) {
        (false, _) => WebmAudio::None,
        (true, true) => WebmAudio::Opus,
        (true, false) => WebmAudio::Vorbis,
    };
    let audio_label = match first_choice {
        WebmAudio::Opus => "Opus, 48 kHz",
        WebmAudio::Vorbis => "Vorbis",
        WebmAudio::None => "none",
    };
    crate::progress_reporting::status("Audio", audio_label, false);

    match run_webm(spawner, config, input, output, props, first_choice) {
        Err(CoreError::CommandFailed { stderr, .. }) if first_choice == WebmAudio::Opus => {
            log::warn!("Opus encoding failed, retrying with Vorbis audio");
            log::debug!("Opus failure output: {stderr}");
            crate::progress_reporting::warning("Opus encoding failed, using Vorbis audio instead");
            run_webm(spawner, config, input, output, props, WebmAudio::Vorbis)
        }
        other => other,
    }
}

fn run_webm<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    input: &Path,
    output: &Path,
    props: &VideoProperties,
    audio: WebmAudio,
) -> CoreResult<()> {
    let container = Container::Webm;
    let sample_rate = OPUS_SAMPLE_RATE.to_string();

    run_to_output(
        spawner,
        input,
        output,
        "webm",
        Some(props.duration_secs),
        |target| {
            let mut cmd = FfmpegCommandBuilder::new().build();
            cmd.input(path_arg(input));
            cmd.args(container.video_encode_args(
                config.webm_crf,
                &config.preset,
                (props.width, props.height),
            ));
            match audio {
                WebmAudio::Opus => {
                    cmd.args(["-c:a", "libopus", "-ar", sample_rate.as_str()]);
                }
                WebmAudio::Vorbis => {
                    cmd.args(["-c:a", "libvorbis"]);
                }
                WebmAudio::None => {
                    cmd.arg("-an");
                }
            }
            cmd.output(path_arg(target));
            cmd
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MOCK_OUTPUT_CONTENT, MockFfmpegSpawner};
    use crate::processing::test_support::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("webm".parse::<OutputFormat>().unwrap(), OutputFormat::Webm);
        assert_eq!(".MP4".parse::<OutputFormat>().unwrap(), OutputFormat::Mp4);
        assert!("avi".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_each_format_writes_expected_extension() {
        for format in [OutputFormat::Webm, OutputFormat::Mp4, OutputFormat::Gif] {
            let (dir, input, prober) = source_file("clip.mkv", true);
            let spawner = MockFfmpegSpawner::new();
            spawner.add_success_expectation("-i", vec![], true);

            let output = convert(&spawner, &prober, &CoreConfig::default(), &input, format).unwrap();

            assert_eq!(output, dir.path().join(format!("clip.{}", format.extension())));
            assert!(output.exists());
            assert_eq!(std::fs::read(&input).unwrap(), SOURCE_CONTENT);
        }
    }

    #[test]
    fn test_webm_uses_vp9_crf_and_opus() {
        let (_dir, input, prober) = source_file("clip.mp4", true);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("libopus", vec![], true);

        convert(&spawner, &prober, &CoreConfig::default(), &input, OutputFormat::Webm).unwrap();

        let args = &spawner.get_received_calls()[0];
        assert_eq!(arg_after(args, "-c:v"), Some("libvpx-vp9"));
        assert_eq!(arg_after(args, "-b:v"), Some("0"));
        assert_eq!(arg_after(args, "-crf"), Some("32"));
        assert_eq!(arg_after(args, "-ar"), Some("48000"));
    }

    #[test]
    fn test_webm_falls_back_to_vorbis() {
        let (_dir, input, prober) = source_file("clip.mp4", true);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_exit_error_expectation("libopus", "Unknown encoder 'libopus'", 1);
        spawner.add_success_expectation("libvorbis", vec![], true);

        let output =
            convert(&spawner, &prober, &CoreConfig::default(), &input, OutputFormat::Webm).unwrap();

        let calls = spawner.get_received_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(arg_after(&calls[1], "-c:a"), Some("libvorbis"));
        assert_eq!(std::fs::read(output).unwrap(), MOCK_OUTPUT_CONTENT);
    }

    #[test]
    fn test_webm_without_opus_goes_straight_to_vorbis() {
        let (_dir, input, prober) = source_file("clip.mp4", true);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("libvorbis", vec![], true);
        let config = CoreConfig {
            use_opus: false,
            ..CoreConfig::default()
        };

        convert(&spawner, &prober, &config, &input, OutputFormat::Webm).unwrap();
        assert_eq!(spawner.get_received_calls().len(), 1);
    }

    #[test]
    fn test_mp4_uses_configured_crf_and_preset() {
        let (_dir, input, prober) = source_file("clip.webm", true);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("libx264", vec![], true);
        let config = CoreConfig {
            mp4_crf: 23,
            preset: "slow".to_string(),
            ..CoreConfig::default()
        };

        convert(&spawner, &prober, &config, &input, OutputFormat::Mp4).unwrap();

        let args = &spawner.get_received_calls()[0];
        assert_eq!(arg_after(args, "-crf"), Some("23"));
        assert_eq!(arg_after(args, "-preset"), Some("slow"));
        assert_eq!(arg_after(args, "-c:a"), Some("aac"));
    }

    #[test]
    fn test_same_format_replaces_input() {
        let (dir, input, prober) = source_file("clip.webm", false);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("libvpx-vp9", vec![], true);

        let output =
            convert(&spawner, &prober, &CoreConfig::default(), &input, OutputFormat::Webm).unwrap();

        assert_eq!(output, input);
        assert_eq!(std::fs::read(&input).unwrap(), MOCK_OUTPUT_CONTENT);
        assert_eq!(dir_entries(dir.path()), ["clip.webm"]);
        let args = &spawner.get_received_calls()[0];
        assert!(args.last().unwrap().contains("clip_webm_temp_"));
    }

    #[test]
    fn test_gif_uses_palette() {
        let (_dir, input, prober) = source_file("clip.mp4", true);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("palettegen", vec![], true);

        convert(&spawner, &prober, &CoreConfig::default(), &input, OutputFormat::Gif).unwrap();

        let args = &spawner.get_received_calls()[0];
        assert_eq!(arg_after(args, "-filter_complex"), Some(GIF_FILTER_GRAPH));
    }
}

// ============================================================================
// clipsmith-core/src/processing/mod.rs
// ============================================================================
//
// VIDEO PROCESSING: The Transformations Behind Each Front-End Command
//
// Each operation opens one input, applies one effect through ffmpeg and either
// writes a sibling file with a new extension (conversion, audio extraction) or
// writes a temporary sibling and replaces the source with it.
//
// KEY COMPONENTS:
// - Operation: One variant per transformation, dispatched by run()
// - OperationOutcome: Paths, sizes and elapsed time of a finished run
// - Shared helpers for the in-place and sibling-output patterns
//
// SUBMODULES:
// - audio: mute and mp3 extraction
// - blur, crop, resize, speed, trim: in-place edits
// - container: codec choice per container
// - convert: webm, mp4, gif, mp3 conversion
// - preview: scaled first-frame extraction for region selection
// - replace: delete+rename with optional retries

pub mod audio;
pub mod blur;
pub mod container;
pub mod convert;
pub mod crop;
pub mod preview;
pub mod replace;
pub mod resize;
pub mod speed;
pub mod trim;

pub use container::Container;
pub use convert::OutputFormat;
pub use preview::{PreviewFrame, extract_preview_frame};
pub use replace::ReplacePolicy;

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor, get_file_size, run_ffmpeg};
use crate::region::Region;
use crate::temp_files::sibling_temp_path;
use crate::utils::get_filename_safe;

use ffmpeg_sidecar::command::FfmpegCommand;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A single transformation applied to one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Writes `<base>.<format>` next to the input
    Convert { format: OutputFormat },
    Crop { region: Region },
    /// Keeps `[start, end)` seconds
    Trim { start: f64, end: f64 },
    Speed { factor: f64 },
    Blur { region: Region },
    Resize { width: u32, height: u32 },
    Mute,
    ExtractAudio,
}

impl Operation {
    /// Short lowercase name used in logs and error labels.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Convert { .. } => "convert",
            Self::Crop { .. } => "crop",
            Self::Trim { .. } => "trim",
            Self::Speed { .. } => "speed",
            Self::Blur { .. } => "blur",
            Self::Resize { .. } => "resize",
            Self::Mute => "mute",
            Self::ExtractAudio => "extract audio",
        }
    }

    /// Whether the input file is overwritten.
    #[must_use]
    pub fn is_in_place(&self) -> bool {
        !matches!(self, Self::Convert { .. } | Self::ExtractAudio)
    }

    /// Runs the operation on `input` and reports where the result went.
    pub fn run<S: FfmpegSpawner, P: FfprobeExecutor>(
        &self,
        spawner: &S,
        prober: &P,
        config: &CoreConfig,
        input: &Path,
    ) -> CoreResult<OperationOutcome> {
        config.validate()?;
        if !input.is_file() {
            return Err(CoreError::PathError(format!(
                "Input file not found: {}",
                input.display()
            )));
        }
        // The temporary output keeps the input's extension so ffmpeg can pick the muxer
        if self.is_in_place() && input.extension().is_none_or(|ext| ext.is_empty()) {
            return Err(CoreError::InvalidParameter(format!(
                "{} has no file extension, so the output container cannot be chosen",
                input.display()
            )));
        }

        let filename = get_filename_safe(input)?;
        crate::progress_reporting::processing(&format!("{}: {filename}", self));

        let input_size = get_file_size(input)?;
        let started = Instant::now();

        let output_path = match self {
            Self::Convert { format } => convert::convert(spawner, prober, config, input, *format)?,
            Self::Crop { region } => {
                crop::crop(spawner, prober, config, input, region)?;
                input.to_path_buf()
            }
            Self::Trim { start, end } => {
                trim::trim(spawner, prober, config, input, *start, *end)?;
                input.to_path_buf()
            }
            Self::Speed { factor } => {
                speed::change_speed(spawner, prober, config, input, *factor)?;
                input.to_path_buf()
            }
            Self::Blur { region } => {
                blur::blur_region(spawner, prober, config, input, region)?;
                input.to_path_buf()
            }
            Self::Resize { width, height } => {
                resize::resize(spawner, prober, config, input, *width, *height)?;
                input.to_path_buf()
            }
            Self::Mute => {
                audio::mute(spawner, prober, input)?;
                input.to_path_buf()
            }
            Self::ExtractAudio => audio::extract_audio(spawner, prober, input)?,
        };

        let outcome = OperationOutcome {
            input_path: input.to_path_buf(),
            output_size: get_file_size(&output_path)?,
            output_path,
            duration: started.elapsed(),
            input_size,
        };
        log::info!(
            "{} finished in {:.1}s: {}",
            self.label(),
            outcome.duration.as_secs_f64(),
            outcome.output_path.display()
        );
        Ok(outcome)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convert { format } => write!(f, "Converting to {format}"),
            Self::Crop { region } => write!(f, "Cropping to {region}"),
            Self::Trim { start, end } => write!(f, "Trimming to {start:.2}s-{end:.2}s"),
            Self::Speed { factor } => write!(f, "Changing speed to {factor}x"),
            Self::Blur { region } => write!(f, "Blurring region {region}"),
            Self::Resize { width, height } => write!(f, "Resizing to {width}x{height}"),
            Self::Mute => f.write_str("Removing audio"),
            Self::ExtractAudio => f.write_str("Extracting audio"),
        }
    }
}

/// Result of a completed [`Operation`].
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub input_path: PathBuf,
    /// Equal to `input_path` for in-place operations
    pub output_path: PathBuf,
    pub duration: Duration,
    /// Size of the input before the operation ran
    pub input_size: u64,
    pub output_size: u64,
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Runs `build(temp)` through ffmpeg and replaces `input` with the result.
///
/// The temporary file is removed again when ffmpeg fails. When the replace
/// step fails it is left in place so the output is not lost.
pub(crate) fn run_in_place<S, F>(
    spawner: &S,
    input: &Path,
    tag: &str,
    duration_secs: Option<f64>,
    policy: &ReplacePolicy,
    build: F,
) -> CoreResult<()>
where
    S: FfmpegSpawner,
    F: FnOnce(&Path) -> FfmpegCommand,
{
    let temp = sibling_temp_path(input, tag)?;
    log::debug!("Writing {tag} output to {}", temp.display());

    if let Err(e) = run_ffmpeg(spawner, build(&temp), tag, duration_secs) {
        remove_partial_output(&temp);
        return Err(e);
    }

    replace::replace_original(&temp, input, policy).inspect_err(|e| {
        if temp.exists() {
            log::warn!("Kept {} after failed replace: {e}", temp.display());
        }
    })
}

/// Runs `build(target)` writing to `output`, going through a temporary file
/// when `output` is the input itself.
pub(crate) fn run_to_output<S, F>(
    spawner: &S,
    input: &Path,
    output: &Path,
    tag: &str,
    duration_secs: Option<f64>,
    build: F,
) -> CoreResult<()>
where
    S: FfmpegSpawner,
    F: FnOnce(&Path) -> FfmpegCommand,
{
    if output == input {
        return run_in_place(
            spawner,
            input,
            tag,
            duration_secs,
            &ReplacePolicy::immediate(),
            build,
        );
    }

    if let Err(e) = run_ffmpeg(spawner, build(output), tag, duration_secs) {
        remove_partial_output(output);
        return Err(e);
    }
    Ok(())
}

pub(crate) fn remove_partial_output(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("Failed to remove partial output {}: {e}", path.display());
        }
    }
}

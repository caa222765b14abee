// clipsmith-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use clipsmith_core::config::X264_PRESETS;
use clipsmith_core::processing::speed::validate_factor;
use clipsmith_core::{DragSelection, OutputFormat, Region};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Clipsmith: in-place video edits",
    long_about = "Converts, crops, trims, speeds up, blurs, resizes and mutes video files using ffmpeg via clipsmith-core. In-place edits overwrite the input file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug output, including ffmpeg's own log lines
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Write a log file for this run into DIR
    #[arg(long, global = true, value_name = "DIR", env = "CLIPSMITH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts a video to WebM, MP4, GIF or MP3 next to the input
    Convert(ConvertArgs),
    /// Crops a video to a region, in place
    Crop(CropArgs),
    /// Keeps a time range of a video, in place
    Trim(TrimArgs),
    /// Changes playback speed, in place
    Speed(SpeedArgs),
    /// Blurs a region of every frame, in place
    Blur(BlurArgs),
    /// Resizes a video to exact dimensions, in place
    Resize(ResizeArgs),
    /// Removes or extracts the audio track
    Audio(AudioArgs),
    /// Shows dimensions, duration and audio presence of a video
    Info(InfoArgs),
    /// Writes a scaled preview frame for picking regions
    Preview(PreviewArgs),
}

impl Commands {
    /// Subcommand name, used for the log file name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Convert(_) => "convert",
            Self::Crop(_) => "crop",
            Self::Trim(_) => "trim",
            Self::Speed(_) => "speed",
            Self::Blur(_) => "blur",
            Self::Resize(_) => "resize",
            Self::Audio(_) => "audio",
            Self::Info(_) => "info",
            Self::Preview(_) => "preview",
        }
    }
}

// --- Shared Argument Groups ---

/// Encoder overrides for operations that re-encode video.
#[derive(Args, Debug, Clone, Default)]
pub struct EncodeOpts {
    /// CRF quality, 0-51 (lower is better quality, larger file)
    #[arg(long, value_name = "CRF", env = "CLIPSMITH_CRF",
          value_parser = clap::value_parser!(u8).range(0..=51))]
    pub crf: Option<u8>,

    /// x264 preset (ignored for WebM output)
    #[arg(long, value_name = "PRESET", env = "CLIPSMITH_PRESET",
          value_parser = clap::builder::PossibleValuesParser::new(X264_PRESETS))]
    pub preset: Option<String>,
}

/// Region to operate on, in source pixels or as a drag on the preview image.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct RegionSelection {
    /// Region in source pixels: LEFT,TOP,RIGHT,BOTTOM
    #[arg(long, value_name = "L,T,R,B")]
    pub region: Option<Region>,

    /// Two drag corners on the preview image from `clipsmith preview`: X1,Y1,X2,Y2
    #[arg(long, value_name = "X1,Y1,X2,Y2")]
    pub preview_region: Option<DragSelection>,
}

// --- Per-Command Arguments ---

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input video file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output format: webm, mp4, gif or mp3
    #[arg(long = "to", value_name = "FORMAT", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Encode WebM audio as Vorbis instead of trying Opus first
    #[arg(long, default_value_t = false)]
    pub no_opus: bool,

    #[command(flatten)]
    pub encode: EncodeOpts,
}

#[derive(Args, Debug)]
pub struct CropArgs {
    /// Input video file (overwritten)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub selection: RegionSelection,

    #[command(flatten)]
    pub encode: EncodeOpts,
}

#[derive(Args, Debug)]
pub struct BlurArgs {
    /// Input video file (overwritten)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub selection: RegionSelection,

    /// Gaussian kernel size in pixels (odd, default 15)
    #[arg(long, value_name = "SIZE")]
    pub kernel: Option<u32>,

    #[command(flatten)]
    pub encode: EncodeOpts,
}

#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Input video file (overwritten)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Start of the kept range: seconds, MM:SS or HH:MM:SS
    #[arg(long, value_name = "TIME", default_value = "0", value_parser = parse_time)]
    pub start: f64,

    /// End of the kept range (defaults to the end of the video)
    #[arg(long, value_name = "TIME", value_parser = parse_time)]
    pub end: Option<f64>,

    #[command(flatten)]
    pub encode: EncodeOpts,
}

#[derive(Args, Debug)]
pub struct SpeedArgs {
    /// Input video file (overwritten)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Speed multiplier between 0.25 and 4 (presets: 0.25, 0.5, 1, 1.5, 2, 3, 4)
    #[arg(long, value_name = "FACTOR", value_parser = parse_speed)]
    pub factor: f64,

    #[command(flatten)]
    pub encode: EncodeOpts,
}

#[derive(Args, Debug)]
pub struct ResizeArgs {
    /// Input video file (overwritten)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Target width in pixels
    #[arg(long, value_name = "PIXELS", conflicts_with = "size")]
    pub width: Option<u32>,

    /// Target height in pixels
    #[arg(long, value_name = "PIXELS", conflicts_with_all = ["size", "keep_aspect"])]
    pub height: Option<u32>,

    /// Named size: 480p, 720p, 1080p, 1440p or 4k
    #[arg(long, value_name = "PRESET", value_parser = parse_resize_preset)]
    pub size: Option<(u32, u32)>,

    /// Derive the height from the width using the source aspect ratio
    #[arg(long, default_value_t = false)]
    pub keep_aspect: bool,

    #[command(flatten)]
    pub encode: EncodeOpts,
}

#[derive(Args, Debug)]
pub struct AudioArgs {
    #[command(subcommand)]
    pub action: AudioAction,
}

#[derive(Subcommand, Debug)]
pub enum AudioAction {
    /// Removes the audio track in place (video is stream-copied)
    Mute {
        /// Input video file (overwritten)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Writes the audio track to <INPUT>.mp3
    Extract {
        /// Input video file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input video file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Print the properties as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Input video file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Position of the frame: seconds, MM:SS or HH:MM:SS
    #[arg(long, value_name = "TIME", default_value = "0", value_parser = parse_time)]
    pub at: f64,

    /// PNG to write (defaults to <INPUT stem>_preview.png)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

// --- Value Parsers ---

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

fn parse_speed(s: &str) -> Result<f64, String> {
    let factor = s
        .trim_end_matches(['x', 'X'])
        .parse::<f64>()
        .map_err(|e| format!("'{s}' is not a number: {e}"))?;
    validate_factor(factor).map_err(|e| e.to_string())?;
    Ok(factor)
}

fn parse_resize_preset(s: &str) -> Result<(u32, u32), String> {
    clipsmith_core::processing::resize::preset_dimensions(s)
        .ok_or_else(|| format!("unknown size '{s}', expected 480p, 720p, 1080p, 1440p or 4k"))
}

/// Parses `SS[.fff]`, `MM:SS[.fff]` or `HH:MM:SS[.fff]` into seconds.
pub fn parse_time(s: &str) -> Result<f64, String> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(format!("'{s}' is not a time, expected SS, MM:SS or HH:MM:SS"));
    }

    let mut seconds = 0.0;
    for part in &parts {
        let value = part
            .parse::<f64>()
            .map_err(|_| format!("'{s}' is not a time, expected SS, MM:SS or HH:MM:SS"))?;
        if value < 0.0 || !value.is_finite() {
            return Err(format!("time must not be negative, got '{s}'"));
        }
        seconds = seconds * 60.0 + value;
    }
    Ok(seconds)
}

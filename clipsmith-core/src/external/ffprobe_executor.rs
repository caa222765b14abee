//! FFprobe integration for media analysis
//!
//! This module provides functions for executing ffprobe to read the
//! properties operations need: frame dimensions, duration, frame rate, frame
//! count and whether an audio track is present.
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use serde::Serialize;
use std::path::Path;

/// Properties of the first video stream plus container-level facts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
    /// Average frame rate, when ffprobe reports one
    pub frame_rate: Option<f64>,
    /// Frame count from `nb_frames`; absent for some containers (e.g. WebM)
    pub total_frames: Option<u64>,
    pub has_audio: bool,
}

/// Trait for abstracting ffprobe lookups so operations can be tested offline.
pub trait FfprobeExecutor {
    fn get_video_properties(&self, input_path: &Path) -> CoreResult<VideoProperties>;
}

/// Default executor backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn get_video_properties(&self, input_path: &Path) -> CoreResult<VideoProperties> {
        get_video_properties(input_path)
    }
}

/// Gets video properties for a given input file.
pub fn get_video_properties(input_path: &Path) -> CoreResult<VideoProperties> {
    log::debug!(
        "Running ffprobe (via crate) for video properties on: {}",
        input_path.display()
    );
    match ffprobe(input_path) {
        Ok(metadata) => {
            let duration_secs = metadata
                .format
                .duration
                .as_deref()
                .and_then(|d| d.parse::<f64>().ok())
                .ok_or_else(|| {
                    CoreError::FfprobeParse(format!(
                        "Failed to parse duration from format for {}",
                        input_path.display()
                    ))
                })?;

            let video_stream = metadata
                .streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
                .ok_or_else(|| {
                    CoreError::VideoInfoError(format!(
                        "No video stream found in {}",
                        input_path.display()
                    ))
                })?;
            let width = video_stream.width.ok_or_else(|| {
                CoreError::VideoInfoError(format!(
                    "Video stream missing width in {}",
                    input_path.display()
                ))
            })?;
            let height = video_stream.height.ok_or_else(|| {
                CoreError::VideoInfoError(format!(
                    "Video stream missing height in {}",
                    input_path.display()
                ))
            })?;

            if width <= 0 || height <= 0 {
                return Err(CoreError::VideoInfoError(format!(
                    "Invalid dimensions found in {}: width={}, height={}",
                    input_path.display(),
                    width,
                    height
                )));
            }

            let has_audio = metadata
                .streams
                .iter()
                .any(|s| s.codec_type.as_deref() == Some("audio"));

            Ok(VideoProperties {
                width: width as u32,
                height: height as u32,
                duration_secs,
                frame_rate: parse_frame_rate(&video_stream.avg_frame_rate)
                    .or_else(|| parse_frame_rate(&video_stream.r_frame_rate)),
                total_frames: video_stream
                    .nb_frames
                    .as_deref()
                    .and_then(|f| f.parse::<u64>().ok()),
                has_audio,
            })
        }
        Err(err) => {
            log::error!(
                "ffprobe failed for video properties on {}: {:?}",
                input_path.display(),
                err
            );
            Err(map_ffprobe_error(err, "video properties"))
        }
    }
}

/// Parses ffprobe's rational frame rate (`"30000/1001"`). `"0/0"` yields None.
#[must_use]
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = match rate.split_once('/') {
        Some((n, d)) => (n.parse::<f64>().ok()?, d.parse::<f64>().ok()?),
        None => (rate.parse::<f64>().ok()?, 1.0),
    };
    if den == 0.0 || num <= 0.0 {
        None
    } else {
        Some(num / den)
    }
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::JsonParseError(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        #[allow(unreachable_patterns)]
        _ => CoreError::FfprobeParse(format!(
            "Unknown ffprobe error during {context}: {err:?}"
        )),
    }
}

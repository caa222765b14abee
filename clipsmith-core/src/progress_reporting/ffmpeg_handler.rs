//! `FFmpeg` progress handler
//!
//! Turns the ffmpeg-sidecar event stream into progress reports, forwards
//! ffmpeg's own log lines under the `ffmpeg_log` target and keeps stderr
//! errors for the failure message.

use crate::error::CoreResult;
use crate::utils::parse_ffmpeg_time;
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};

/// Minimum percentage step between two progress reports.
const PROGRESS_STEP_PERCENT: f64 = 1.0;

/// Handler for `FFmpeg` progress events
pub struct FfmpegProgressHandler {
    duration: Option<f64>,
    last_progress_percent: f64,
    stderr_buffer: String,
}

impl FfmpegProgressHandler {
    /// Creates a new `FFmpeg` progress handler
    #[must_use]
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            duration: duration.filter(|&d| d > 0.0),
            last_progress_percent: -PROGRESS_STEP_PERCENT,
            stderr_buffer: String::new(),
        }
    }

    /// Handles an `FFmpeg` event
    pub fn handle_event(&mut self, event: FfmpegEvent) -> CoreResult<()> {
        match event {
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress),
            FfmpegEvent::Log(level, message) => {
                handle_log(&level, &message);
                // ffmpeg's own failures arrive as error-level log lines
                if matches!(level, FfmpegLogLevel::Error | FfmpegLogLevel::Fatal) {
                    self.buffer_line(&message);
                }
            }
            FfmpegEvent::Error(error) => self.handle_error(&error),
            _ => {}
        }
        Ok(())
    }

    /// Gets the accumulated stderr buffer
    #[must_use]
    pub fn stderr_buffer(&self) -> &str {
        &self.stderr_buffer
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) {
        let Some(total) = self.duration else {
            return;
        };

        let current_secs = parse_ffmpeg_time(&progress.time).unwrap_or(0.0);
        let percent = (current_secs / total * 100.0).clamp(0.0, 100.0);

        if percent >= self.last_progress_percent + PROGRESS_STEP_PERCENT
            || (percent >= 100.0 && self.last_progress_percent < 100.0)
        {
            crate::progress_reporting::progress(percent as f32, current_secs, total);
            self.last_progress_percent = percent;
        }
    }

    fn handle_error(&mut self, error: &str) {
        if is_non_critical_ffmpeg_error(error) {
            log::debug!("ffmpeg non-critical message: {error}");
        } else {
            log::warn!(target: "ffmpeg_log", "{error}");
        }
        self.buffer_line(error);
    }

    fn buffer_line(&mut self, line: &str) {
        self.stderr_buffer.push_str(line);
        self.stderr_buffer.push('\n');
    }
}

fn handle_log(level: &FfmpegLogLevel, message: &str) {
    let log_level = map_ffmpeg_log_level(level);
    if log_level == log::Level::Info {
        log::debug!(target: "ffmpeg_log", "{message}");
    } else {
        log::log!(target: "ffmpeg_log", log_level, "{message}");
    }
}

/// Maps `FFmpeg` log level to Rust log level
fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Info,
        _ => log::Level::Trace,
    }
}

/// `FFmpeg` stderr messages that don't indicate actual problems.
fn is_non_critical_ffmpeg_error(error: &str) -> bool {
    error.contains("deprecated pixel format")
        || error.contains("No accelerated colorspace conversion")
        || error.contains("automatically inserted filter")
        || error.contains("Timestamps are unset")
        || error.contains("first frame is no keyframe")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_buffered() {
        let mut handler = FfmpegProgressHandler::new(Some(10.0));
        handler
            .handle_event(FfmpegEvent::Error("Invalid too big or non positive size".into()))
            .unwrap();
        handler
            .handle_event(FfmpegEvent::Error("Conversion failed!".into()))
            .unwrap();
        assert_eq!(
            handler.stderr_buffer(),
            "Invalid too big or non positive size\nConversion failed!\n"
        );
    }

    #[test]
    fn test_error_log_lines_are_buffered() {
        let mut handler = FfmpegProgressHandler::new(Some(10.0));
        handler
            .handle_event(FfmpegEvent::Log(
                FfmpegLogLevel::Info,
                "Stream #0:0: Video: h264".into(),
            ))
            .unwrap();
        handler
            .handle_event(FfmpegEvent::Log(
                FfmpegLogLevel::Error,
                "[libx264 @ 0x1] width not divisible by 2 (589x330)".into(),
            ))
            .unwrap();
        handler
            .handle_event(FfmpegEvent::Log(
                FfmpegLogLevel::Fatal,
                "Conversion failed!".into(),
            ))
            .unwrap();
        assert_eq!(
            handler.stderr_buffer(),
            "[libx264 @ 0x1] width not divisible by 2 (589x330)\nConversion failed!\n"
        );
    }

    #[test]
    fn test_zero_duration_disables_progress() {
        let handler = FfmpegProgressHandler::new(Some(0.0));
        assert!(handler.duration.is_none());
    }
}

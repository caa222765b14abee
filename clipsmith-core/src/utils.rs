//! Utility functions for formatting and path handling.
//!
//! This module provides general-purpose helpers used throughout the
//! clipsmith-core library: duration and byte formatting, ffmpeg time parsing
//! and the extension filter applied to input files.

use std::path::Path;

/// Extensions offered by the "Video files" filter.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp4", "webm", "mkv", "avi", "mov"];

/// Checks whether the path carries one of the supported video extensions (case-insensitive).
///
/// Only the name is inspected; content is never validated.
#[must_use]
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats seconds as MM:SS, the way the trim scrubber labels positions.
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??".to_string();
    }
    let total = seconds as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Parses FFmpeg time string (HH:MM:SS.MS) to seconds. Returns None if invalid.
#[must_use]
pub fn parse_ffmpeg_time(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() == 3 {
        let hours = parts[0].parse::<f64>().ok()?;
        let minutes = parts[1].parse::<f64>().ok()?;
        let seconds = parts[2].parse::<f64>().ok()?;
        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    } else {
        None
    }
}

/// Safely extracts filename from a path with consistent error handling.
pub fn get_filename_safe(path: &Path) -> crate::CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            crate::CoreError::PathError(format!("Failed to get filename for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_supported_extension() {
        assert!(has_supported_extension(Path::new("clip.mp4")));
        assert!(has_supported_extension(Path::new("clip.MOV")));
        assert!(has_supported_extension(Path::new("/a/b/clip.WebM")));
        assert!(!has_supported_extension(Path::new("clip.gif")));
        assert!(!has_supported_extension(Path::new("clip")));
        assert!(!has_supported_extension(Path::new("")));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(3661.0), "01:01:01");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(75.4), "01:15");
        assert_eq!(format_clock(3600.0), "60:00");
    }

    #[test]
    fn test_parse_ffmpeg_time() {
        assert_eq!(parse_ffmpeg_time("00:01:30.50"), Some(90.5));
        assert_eq!(parse_ffmpeg_time("01:00:00.00"), Some(3600.0));
        assert_eq!(parse_ffmpeg_time("garbage"), None);
        assert_eq!(parse_ffmpeg_time("00:xx:00"), None);
    }

    #[test]
    fn test_get_filename_safe() {
        assert_eq!(get_filename_safe(Path::new("/tmp/a.mp4")).unwrap(), "a.mp4");
        assert!(get_filename_safe(Path::new("/")).is_err());
    }
}

//! Progress Reporting API
//!
//! This module provides a minimal API for the core library to report status
//! and progress without depending on how the front end draws it. The front
//! end registers a [`ProgressReporter`]; with none registered every call is a
//! no-op and only the `log` output remains.

pub mod ffmpeg_handler;

use once_cell::sync::Lazy;
use std::sync::Mutex;

/// Represents different levels of output for structured reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// Major workflow phases (===== SECTION =====)
    Section,
    /// Processing steps (» Processing)
    Processing,
    /// Success messages (✓ Success)
    Success,
    /// Warning messages
    Warning,
    /// Error messages
    Error,
}

/// A simplified trait for progress reporting
pub trait ProgressReporter: Send + Sync {
    /// Output a message at a specific level
    fn output(&self, level: OutputLevel, text: &str);

    /// Output a key-value status pair
    fn output_status(&self, label: &str, value: &str, highlight: bool);

    /// Report encoder progress
    fn progress_bar(&self, percent: f32, elapsed_secs: f64, total_secs: f64);

    /// Clear any active progress bar
    fn clear_progress_bar(&self);
}

/// Global progress reporter instance
static PROGRESS_REPORTER: Lazy<Mutex<Option<Box<dyn ProgressReporter>>>> =
    Lazy::new(|| Mutex::new(None));

/// Set the global progress reporter
pub fn set_progress_reporter(reporter: Box<dyn ProgressReporter>) {
    if let Ok(mut r) = PROGRESS_REPORTER.lock() {
        *r = Some(reporter);
    }
}

/// Remove the global progress reporter
pub fn clear_progress_reporter() {
    if let Ok(mut r) = PROGRESS_REPORTER.lock() {
        *r = None;
    }
}

/// Execute a function with the progress reporter if available
#[inline]
pub fn with_reporter<F>(f: F)
where
    F: FnOnce(&dyn ProgressReporter),
{
    if let Ok(guard) = PROGRESS_REPORTER.lock() {
        if let Some(reporter) = guard.as_ref() {
            f(reporter.as_ref());
        }
    }
}

/// Output a processing step
pub fn processing(message: &str) {
    log::info!("{message}");
    with_reporter(|r| r.output(OutputLevel::Processing, message));
}

/// Output a status line
pub fn status(label: &str, value: &str, highlight: bool) {
    log::debug!("{label}: {value}");
    with_reporter(|r| r.output_status(label, value, highlight));
}

/// Output a warning message
pub fn warning(message: &str) {
    log::warn!("{message}");
    with_reporter(|r| r.output(OutputLevel::Warning, message));
}

/// Report encoder progress
pub fn progress(percent: f32, elapsed_secs: f64, total_secs: f64) {
    with_reporter(|r| r.progress_bar(percent, elapsed_secs, total_secs));
}

/// Clear any progress display
pub fn clear_progress() {
    with_reporter(|r| r.clear_progress_bar());
}

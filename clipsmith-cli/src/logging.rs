// ============================================================================
// clipsmith-cli/src/logging.rs
// ============================================================================
//
// LOGGING: Console and File Output Through fern
//
// The console shows only the UI target (see terminal.rs) unless --verbose is
// given, in which case debug records from the core library and ffmpeg appear
// as well. Errors and warnings go to stderr, everything else to stdout. With
// --log-dir every record is also written, without ANSI codes, to
// `clipsmith_<command>_<timestamp>.log`.
//
// USAGE:
// - RUST_LOG=info|debug|trace overrides the console level
// - CLIPSMITH_LOG_DIR sets the log directory without the flag

use crate::config::{LOG_FILE_PREFIX, LOG_LEVEL_ENV};
use crate::error::{CliErrorContext, CliResult};
use crate::terminal::UI_TARGET;

use clipsmith_core::CoreError;
use log::{Level, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// File name for the log of one `command` run.
pub fn log_file_name(command: &str, timestamp: &str) -> String {
    format!("{LOG_FILE_PREFIX}_{command}_{timestamp}.log")
}

fn console_level(verbose: bool) -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| value.trim().parse::<LevelFilter>().ok())
        .unwrap_or(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
}

/// Installs the global logger. Returns the log file path when one is written.
pub fn init_logging(
    verbose: bool,
    log_dir: Option<&Path>,
    command: &str,
) -> CliResult<Option<PathBuf>> {
    let level = console_level(verbose);

    let console = fern::Dispatch::new()
        .level(level)
        .filter(move |meta| verbose || meta.target() == UI_TARGET)
        .format(|out, message, _record| out.finish(format_args!("{message}")))
        .chain(
            fern::Dispatch::new()
                .filter(|meta| meta.level() > Level::Warn)
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .filter(|meta| meta.level() <= Level::Warn)
                .chain(std::io::stderr()),
        );

    let mut root = fern::Dispatch::new()
        .level(LevelFilter::Trace)
        .level_for("ffmpeg_sidecar", LevelFilter::Warn)
        .chain(console);

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .cli_with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let path = dir.join(log_file_name(command, &get_timestamp()));
            let file = fern::log_file(&path)
                .cli_with_context(|| format!("Failed to create log file {}", path.display()))?;

            root = root.chain(
                fern::Dispatch::new()
                    .level(LevelFilter::Debug)
                    .format(|out, message, record| {
                        let plain = strip_ansi_escapes::strip_str(message.to_string());
                        out.finish(format_args!(
                            "{} [{}] {}: {}",
                            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                            record.level(),
                            record.target(),
                            plain
                        ))
                    })
                    .chain(file),
            );
            Some(path)
        }
        None => None,
    };

    root.apply()
        .map_err(|e| CoreError::Config(format!("Failed to initialize logger: {e}")))?;

    if let Some(path) = &log_path {
        log::debug!("Writing log to {}", path.display());
    }
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_log_file_name_names_command() {
        assert_eq!(
            log_file_name("trim", "20250102_030405"),
            "clipsmith_trim_20250102_030405.log"
        );
    }
}

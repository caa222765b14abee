// clipsmith-cli/src/config.rs
//
// Front-end defaults that are not part of the core configuration.

use std::time::Duration;

/// Speed multipliers offered as quick picks, mirrored in `speed --help`.
pub const SPEED_PRESETS: [f64; 7] = [0.25, 0.5, 1.0, 1.5, 2.0, 3.0, 4.0];

/// Prefix for log files written with `--log-dir`.
pub const LOG_FILE_PREFIX: &str = "clipsmith";

/// Spinner redraw interval while an operation runs.
pub const SPINNER_TICK: Duration = Duration::from_millis(100);

/// Environment variable that overrides the default log filter.
pub const LOG_LEVEL_ENV: &str = "RUST_LOG";

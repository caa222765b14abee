//! Command implementations for the CLI.
//!
//! Every editing command follows the same path: check its own arguments,
//! check the input file, check that ffmpeg and ffprobe exist, then hand an
//! [`Operation`] to [`run_operation`], which runs it on the worker thread and
//! prints the outcome.

pub mod audio;
pub mod convert;
pub mod info;
pub mod preview;
pub mod region;
pub mod resize;
pub mod speed;
pub mod trim;

use crate::cli::EncodeOpts;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;
use crate::worker;

use clipsmith_core::external::{CrateFfprobeExecutor, SidecarSpawner};
use clipsmith_core::utils::SUPPORTED_EXTENSIONS;
use clipsmith_core::{
    CoreConfig, CoreError, Operation, OperationOutcome, check_required_tools, format_bytes,
    format_duration, has_supported_extension,
};
use std::path::Path;

/// Checks that `input` names an existing file.
///
/// Files outside the "Video files" extensions are accepted with a warning.
pub fn ensure_input(input: &Path) -> CliResult<()> {
    if !input.is_file() {
        return Err(CoreError::PathError(format!(
            "Input file not found: {}",
            input.display()
        )));
    }
    if !has_supported_extension(input) {
        terminal::print_warning(&format!(
            "{} does not have a video extension ({}); trying anyway",
            input.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        ));
    }
    Ok(())
}

/// Input and tool checks shared by every command that runs ffmpeg.
pub fn preflight(input: &Path) -> CliResult<()> {
    ensure_input(input)?;
    check_required_tools()
}

/// Core configuration for in-place edits with `encode` applied.
pub fn reencode_config(encode: &EncodeOpts) -> CoreConfig {
    let mut config = CoreConfig::default();
    if let Some(crf) = encode.crf {
        config.reencode_crf = crf;
    }
    if let Some(preset) = &encode.preset {
        config.preset = preset.clone();
    }
    config
}

/// `"crop"` -> `"Crop"`, `"extract audio"` -> `"Extract audio"`.
pub fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Runs `operation` on `input` with a status spinner and prints the outcome.
///
/// Failures come back as "`<Operation> failed: <reason>`".
pub fn run_operation(
    input: &Path,
    operation: Operation,
    config: CoreConfig,
) -> CliResult<OperationOutcome> {
    config.validate()?;
    let title = title_case(operation.label());

    terminal::print_section(&title);
    terminal::print_status("Input", &input.display().to_string(), false);
    if operation.is_in_place() {
        terminal::print_status("Mode", "in place (input is overwritten)", false);
    }

    let status = format!("{operation}...");
    let job_input = input.to_path_buf();
    let job_operation = operation.clone();
    let outcome = worker::run_with_status(&status, move || {
        job_operation.run(
            &SidecarSpawner,
            &CrateFfprobeExecutor::new(),
            &config,
            &job_input,
        )
    })
    .cli_with_context(|| format!("{title} failed"))?;

    print_outcome(&title, &outcome);
    Ok(outcome)
}

fn print_outcome(title: &str, outcome: &OperationOutcome) {
    let saved_to = outcome
        .output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| outcome.output_path.display().to_string());

    terminal::print_success(&format!("{title} complete!"));
    terminal::print_status("Done! Saved to", &saved_to, true);
    terminal::print_status("Output", &outcome.output_path.display().to_string(), false);
    terminal::print_status("Input size", &format_bytes(outcome.input_size), false);
    terminal::print_status("Output size", &format_bytes(outcome.output_size), false);
    terminal::print_status(
        "Time",
        &format_duration(outcome.duration.as_secs_f64()),
        false,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_input_is_rejected() {
        let dir = tempdir().unwrap();
        let err = ensure_input(&dir.path().join("missing.mp4")).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_directory_is_not_an_input() {
        let dir = tempdir().unwrap();
        assert!(ensure_input(dir.path()).is_err());
    }

    #[test]
    fn test_unusual_extension_is_accepted() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("capture.ts");
        fs::write(&input, b"frames").unwrap();
        assert!(ensure_input(&input).is_ok());
    }

    #[test]
    fn test_reencode_config_applies_overrides() {
        let config = reencode_config(&EncodeOpts {
            crf: Some(28),
            preset: Some("fast".to_string()),
        });
        assert_eq!(config.reencode_crf, 28);
        assert_eq!(config.preset, "fast");
        assert_eq!(config.mp4_crf, CoreConfig::default().mp4_crf);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("crop"), "Crop");
        assert_eq!(title_case("extract audio"), "Extract audio");
        assert_eq!(title_case(""), "");
    }
}

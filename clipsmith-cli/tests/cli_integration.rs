use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn clipsmith_cmd() -> Command {
    let mut cmd = Command::cargo_bin("clipsmith").expect("Failed to find clipsmith binary");
    cmd.env("NO_COLOR", "1")
        .env_remove("CLIPSMITH_CRF")
        .env_remove("CLIPSMITH_PRESET")
        .env_remove("CLIPSMITH_LOG_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn dummy_video(dir: &Path, name: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    fs::write(&path, "dummy content")?;
    Ok(path)
}

// Every case below fails before ffmpeg or ffprobe would be started, so the
// tests run on machines without either tool installed.

#[test]
fn test_help_lists_operations() -> Result<(), Box<dyn Error>> {
    let assert = clipsmith_cmd().arg("--help").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    for command in ["convert", "crop", "trim", "speed", "blur", "resize", "audio", "info", "preview"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
    Ok(())
}

#[test]
fn test_non_existent_input() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("missing.mp4");

    clipsmith_cmd()
        .arg("crop")
        .arg(&missing)
        .args(["--region", "0,0,100,100"])
        .assert()
        .failure()
        .stderr(contains("Input file not found"));

    // Nothing was written next to the missing input
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_trim_start_after_end_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dummy_video(dir.path(), "clip.mp4")?;

    clipsmith_cmd()
        .arg("trim")
        .arg(&input)
        .args(["--start", "0:05", "--end", "2"])
        .assert()
        .failure()
        .stderr(contains("must be before end time"));

    assert_eq!(fs::read_to_string(&input)?, "dummy content");
    Ok(())
}

#[test]
fn test_speed_out_of_range() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dummy_video(dir.path(), "clip.mp4")?;

    clipsmith_cmd()
        .arg("speed")
        .arg(&input)
        .args(["--factor", "5"])
        .assert()
        .failure()
        .stderr(contains("speed factor must be between 0.25 and 4"));
    Ok(())
}

#[test]
fn test_empty_region_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dummy_video(dir.path(), "clip.mkv")?;

    clipsmith_cmd()
        .arg("blur")
        .arg(&input)
        .args(["--region", "10,10,10,50"])
        .assert()
        .failure()
        .stderr(contains("zero width or height"));

    clipsmith_cmd()
        .arg("crop")
        .arg(&input)
        .args(["--preview-region", "40,40,40,40"])
        .assert()
        .failure()
        .stderr(contains("zero width or height"));
    Ok(())
}

#[test]
fn test_unknown_output_format() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dummy_video(dir.path(), "clip.mov")?;

    clipsmith_cmd()
        .arg("convert")
        .arg(&input)
        .args(["--to", "flv"])
        .assert()
        .failure()
        .stderr(contains("unknown output format"));
    Ok(())
}

#[test]
fn test_invalid_encoder_settings() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dummy_video(dir.path(), "clip.mp4")?;

    clipsmith_cmd()
        .arg("crop")
        .arg(&input)
        .args(["--region", "0,0,2,2", "--crf", "60"])
        .assert()
        .failure();

    clipsmith_cmd()
        .arg("convert")
        .arg(&input)
        .args(["--to", "mp4", "--preset", "ludicrous"])
        .assert()
        .failure()
        .stderr(contains("ludicrous"));
    Ok(())
}

#[test]
fn test_resize_needs_a_height() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dummy_video(dir.path(), "clip.mp4")?;

    clipsmith_cmd()
        .arg("resize")
        .arg(&input)
        .args(["--width", "640"])
        .assert()
        .failure()
        .stderr(contains("a target height is required"));
    Ok(())
}

#[test]
fn test_log_file_records_failure() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let logs = tempdir()?;
    let input = dummy_video(dir.path(), "clip.mp4")?;

    clipsmith_cmd()
        .arg("trim")
        .arg(&input)
        .args(["--start", "9", "--end", "3"])
        .arg("--log-dir")
        .arg(logs.path())
        .assert()
        .failure();

    let entries: Vec<PathBuf> = fs::read_dir(logs.path())?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1);

    let name = entries[0].file_name().and_then(|n| n.to_str()).unwrap_or_default();
    assert!(name.starts_with("clipsmith_trim_"), "{name}");
    assert!(name.ends_with(".log"), "{name}");

    let contents = fs::read_to_string(&entries[0])?;
    assert!(contents.contains("must be before end time"));
    assert!(!contents.contains('\u{1b}'), "log file must not contain ANSI escapes");
    Ok(())
}

//! `info`: show what ffprobe reports for a video.

use super::ensure_input;
use crate::cli::InfoArgs;
use crate::error::CliResult;
use crate::terminal;

use clipsmith_core::external::{CrateFfprobeExecutor, FfprobeExecutor, check_dependency};
use clipsmith_core::{
    CoreConfig, CoreError, PreviewScale, VideoProperties, format_bytes, format_clock,
    format_duration, get_file_size,
};
use std::path::Path;

/// JSON document printed by `info --json`.
pub fn info_json(
    input: &Path,
    size_bytes: u64,
    props: &VideoProperties,
    preview: (u32, u32),
) -> serde_json::Value {
    serde_json::json!({
        "path": input.display().to_string(),
        "size_bytes": size_bytes,
        "properties": props,
        "preview": { "width": preview.0, "height": preview.1 },
    })
}

pub fn run_info(args: InfoArgs) -> CliResult<()> {
    ensure_input(&args.input)?;
    check_dependency("ffprobe")?;

    let props = CrateFfprobeExecutor::new().get_video_properties(&args.input)?;
    let size = get_file_size(&args.input)?;
    let config = CoreConfig::default();
    let scale = PreviewScale::fit(
        props.width,
        props.height,
        config.preview_max_width,
        config.preview_max_height,
    )?;
    let preview = scale.display_size(props.width, props.height);

    if args.json {
        let doc = info_json(&args.input, size, &props, preview);
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| CoreError::JsonParseError(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    terminal::print_section("Video info");
    terminal::print_status("File", &args.input.display().to_string(), false);
    terminal::print_status("Size", &format_bytes(size), false);
    terminal::print_status("Dimensions", &format!("{}x{}", props.width, props.height), true);
    terminal::print_status(
        "Duration",
        &format!(
            "{} ({:.2}s, scrubber {})",
            format_duration(props.duration_secs),
            props.duration_secs,
            format_clock(props.duration_secs)
        ),
        false,
    );
    if let Some(rate) = props.frame_rate {
        terminal::print_status("Frame rate", &format!("{rate:.3} fps"), false);
    }
    if let Some(frames) = props.total_frames {
        terminal::print_status("Frames", &frames.to_string(), false);
    }
    terminal::print_status("Audio", if props.has_audio { "yes" } else { "no" }, false);
    terminal::print_status(
        "Preview",
        &format!("{}x{} (factor {:.4})", preview.0, preview.1, scale.factor()),
        false,
    );
    Ok(())
}

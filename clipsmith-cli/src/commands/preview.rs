//! `preview`: write the frame regions are picked on.

use super::preflight;
use crate::cli::PreviewArgs;
use crate::error::CliResult;
use crate::terminal;
use crate::worker;

use clipsmith_core::external::{CrateFfprobeExecutor, SidecarSpawner};
use clipsmith_core::processing::preview::default_preview_path;
use clipsmith_core::{CoreConfig, extract_preview_frame, format_clock};

pub fn run_preview(args: PreviewArgs) -> CliResult<()> {
    preflight(&args.input)?;
    let config = CoreConfig::default();
    config.validate()?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_preview_path(&args.input));
    let input = args.input.clone();
    let at = args.at;

    terminal::print_section("Preview");
    let frame = worker::run_with_status("Loading preview...", move || {
        extract_preview_frame(
            &SidecarSpawner,
            &CrateFfprobeExecutor::new(),
            &config,
            &input,
            at,
            &output,
        )
    })?;

    terminal::print_success("Preview ready");
    terminal::print_status("Image", &frame.path.display().to_string(), true);
    terminal::print_status("Position", &format_clock(frame.at_secs), false);
    terminal::print_status(
        "Source",
        &format!("{}x{}", frame.source_width, frame.source_height),
        false,
    );
    terminal::print_status(
        "Display",
        &format!("{}x{}", frame.display_width, frame.display_height),
        false,
    );
    terminal::print_status("Scale", &format!("{:.4}", frame.scale.factor()), false);
    terminal::print_processing(
        "Pass --preview-region X1,Y1,X2,Y2 (pixels on this image) to crop or blur",
    );
    Ok(())
}

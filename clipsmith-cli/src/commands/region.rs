//! `crop` and `blur`: region-based edits.
//!
//! A region comes either in source pixels (`--region`) or as the two drag
//! corners on the preview image written by `clipsmith preview`
//! (`--preview-region`), which are mapped back through the preview scale.

use super::{preflight, reencode_config, run_operation};
use crate::cli::{BlurArgs, CropArgs, RegionSelection};
use crate::error::CliResult;
use crate::terminal;

use clipsmith_core::external::{CrateFfprobeExecutor, FfprobeExecutor};
use clipsmith_core::{CoreConfig, Operation, PreviewScale, Region};
use std::path::Path;

/// Rejects selections that are empty before anything is probed.
pub fn check_selection(selection: &RegionSelection) -> CliResult<()> {
    if let Some(region) = &selection.region {
        region.ensure_non_empty()?;
    }
    if let Some(drag) = &selection.preview_region {
        drag.normalized().ensure_non_empty()?;
    }
    Ok(())
}

/// Source-pixel region for `selection` on `input`.
pub fn resolve_region<P: FfprobeExecutor>(
    prober: &P,
    config: &CoreConfig,
    input: &Path,
    selection: &RegionSelection,
) -> CliResult<Region> {
    if let Some(region) = selection.region {
        return Ok(region);
    }

    let Some(drag) = selection.preview_region else {
        return Err(clipsmith_core::CoreError::InvalidParameter(
            "either --region or --preview-region is required".to_string(),
        ));
    };

    let props = prober.get_video_properties(input)?;
    let scale = PreviewScale::fit(
        props.width,
        props.height,
        config.preview_max_width,
        config.preview_max_height,
    )?;
    let region = drag.to_source(&scale);
    region.ensure_non_empty()?;

    log::debug!(
        "Preview selection {} at factor {:.4} maps to source region {region}",
        drag.normalized(),
        scale.factor()
    );
    terminal::print_status("Selection", &drag.normalized().to_string(), false);
    terminal::print_status("Source region", &region.to_string(), true);
    Ok(region)
}

pub fn run_crop(args: CropArgs) -> CliResult<()> {
    check_selection(&args.selection)?;
    let config = reencode_config(&args.encode);
    config.validate()?;
    preflight(&args.input)?;

    let region = resolve_region(
        &CrateFfprobeExecutor::new(),
        &config,
        &args.input,
        &args.selection,
    )?;
    run_operation(&args.input, Operation::Crop { region }, config)?;
    Ok(())
}

pub fn run_blur(args: BlurArgs) -> CliResult<()> {
    check_selection(&args.selection)?;
    let mut config = reencode_config(&args.encode);
    if let Some(kernel) = args.kernel {
        config.blur_kernel = kernel;
    }
    config.validate()?;
    preflight(&args.input)?;

    let region = resolve_region(
        &CrateFfprobeExecutor::new(),
        &config,
        &args.input,
        &args.selection,
    )?;
    run_operation(&args.input, Operation::Blur { region }, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipsmith_core::DragSelection;
    use clipsmith_core::external::mocks::{MockFfprobeExecutor, sample_properties};
    use std::path::PathBuf;

    fn prober_for(input: &Path) -> MockFfprobeExecutor {
        let prober = MockFfprobeExecutor::new();
        prober.expect_video_properties(input, sample_properties(false));
        prober
    }

    #[test]
    fn test_source_region_is_used_as_given() {
        let input = PathBuf::from("/videos/clip.mp4");
        let selection = RegionSelection {
            region: Some(Region::new(10, 20, 110, 220)),
            preview_region: None,
        };
        // No probe needed, so no expectation is registered
        let region = resolve_region(
            &MockFfprobeExecutor::new(),
            &CoreConfig::default(),
            &input,
            &selection,
        )
        .unwrap();
        assert_eq!(region, Region::new(10, 20, 110, 220));
    }

    #[test]
    fn test_preview_drag_maps_to_source_pixels() {
        let input = PathBuf::from("/videos/clip.mp4");
        let selection = RegionSelection {
            region: None,
            preview_region: Some(DragSelection::new((300, 200), (100, 50))),
        };
        let region =
            resolve_region(&prober_for(&input), &CoreConfig::default(), &input, &selection)
                .unwrap();
        assert_eq!(region, Region::new(300, 150, 900, 600));
    }

    #[test]
    fn test_empty_selections_fail_early() {
        let click = RegionSelection {
            region: None,
            preview_region: Some(DragSelection::new((40, 40), (40, 40))),
        };
        assert!(check_selection(&click).is_err());

        let flat = RegionSelection {
            region: Some(Region::new(0, 10, 100, 10)),
            preview_region: None,
        };
        assert!(check_selection(&flat).is_err());
    }
}

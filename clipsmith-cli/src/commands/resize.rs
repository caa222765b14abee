//! `resize`: scale to exact dimensions, in place.

use super::{preflight, reencode_config, run_operation};
use crate::cli::ResizeArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

use clipsmith_core::external::{CrateFfprobeExecutor, FfprobeExecutor};
use clipsmith_core::processing::resize::height_for_width;
use clipsmith_core::{CoreError, Operation};
use std::path::Path;

/// Target size before the source has been probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRequest {
    Exact { width: u32, height: u32 },
    /// Height follows from the source aspect ratio
    KeepAspect { width: u32 },
}

/// Turns the size flags into a request, rejecting incomplete combinations.
pub fn size_request(args: &ResizeArgs) -> CliResult<SizeRequest> {
    let width = args
        .size
        .map(|(w, _)| w)
        .or(args.width)
        .cli_context("a target width is required: use --width or --size")?;

    let request = if args.keep_aspect {
        SizeRequest::KeepAspect { width }
    } else {
        let height = args
            .size
            .map(|(_, h)| h)
            .or(args.height)
            .cli_context("a target height is required: use --height, --size or --keep-aspect")?;
        SizeRequest::Exact { width, height }
    };

    if width == 0 {
        return Err(CoreError::InvalidParameter(
            "target width must be non-zero".to_string(),
        ));
    }
    Ok(request)
}

/// Final dimensions for `request` on `input`.
pub fn resolve_size<P: FfprobeExecutor>(
    prober: &P,
    input: &Path,
    request: SizeRequest,
) -> CliResult<(u32, u32)> {
    match request {
        SizeRequest::Exact { width, height } => Ok((width, height)),
        SizeRequest::KeepAspect { width } => {
            let props = prober.get_video_properties(input)?;
            let height = height_for_width(width, props.width, props.height);
            log::debug!(
                "Keeping {}x{} aspect at width {width}: height {height}",
                props.width,
                props.height
            );
            Ok((width, height))
        }
    }
}

pub fn run_resize(args: ResizeArgs) -> CliResult<()> {
    let request = size_request(&args)?;
    let config = reencode_config(&args.encode);
    config.validate()?;
    preflight(&args.input)?;

    let (width, height) = resolve_size(&CrateFfprobeExecutor::new(), &args.input, request)?;
    terminal::print_status("Target size", &format!("{width}x{height}"), true);

    run_operation(&args.input, Operation::Resize { width, height }, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EncodeOpts;
    use clipsmith_core::external::mocks::{MockFfprobeExecutor, sample_properties};
    use std::path::PathBuf;

    fn args() -> ResizeArgs {
        ResizeArgs {
            input: PathBuf::from("/videos/clip.mp4"),
            width: None,
            height: None,
            size: None,
            keep_aspect: false,
            encode: EncodeOpts::default(),
        }
    }

    #[test]
    fn test_named_size_gives_both_dimensions() {
        let request = size_request(&ResizeArgs {
            size: Some((1280, 720)),
            ..args()
        })
        .unwrap();
        assert_eq!(request, SizeRequest::Exact { width: 1280, height: 720 });
    }

    #[test]
    fn test_width_alone_is_incomplete() {
        let result = size_request(&ResizeArgs {
            width: Some(640),
            ..args()
        });
        assert!(result.is_err());
    }

    fn prober_4_3(input: &Path) -> MockFfprobeExecutor {
        let mut props = sample_properties(false);
        props.width = 1024;
        props.height = 768;
        let prober = MockFfprobeExecutor::new();
        prober.expect_video_properties(input, props);
        prober
    }

    #[test]
    fn test_keep_aspect_keeps_odd_height() {
        for name in ["/videos/clip.mp4", "/videos/clip.webm"] {
            let input = PathBuf::from(name);
            let size =
                resolve_size(&prober_4_3(&input), &input, SizeRequest::KeepAspect { width: 100 })
                    .unwrap();
            assert_eq!(size, (100, 75), "{name}");
        }
    }
}

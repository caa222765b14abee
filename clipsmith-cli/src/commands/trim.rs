//! `trim`: keep a time range, in place.

use super::{preflight, reencode_config, run_operation};
use crate::cli::TrimArgs;
use crate::error::CliResult;
use crate::terminal;

use clipsmith_core::external::{CrateFfprobeExecutor, FfprobeExecutor};
use clipsmith_core::processing::trim::validate_range;
use clipsmith_core::{Operation, format_clock};
use std::path::Path;

/// End of the kept range: the given `end`, or the full duration of `input`.
pub fn resolve_end<P: FfprobeExecutor>(prober: &P, input: &Path, end: Option<f64>) -> CliResult<f64> {
    match end {
        Some(end) => Ok(end),
        None => {
            let props = prober.get_video_properties(input)?;
            log::debug!("No end given, keeping up to {:.3}s", props.duration_secs);
            Ok(props.duration_secs)
        }
    }
}

pub fn run_trim(args: TrimArgs) -> CliResult<()> {
    if let Some(end) = args.end {
        validate_range(args.start, end)?;
    }
    let config = reencode_config(&args.encode);
    config.validate()?;
    preflight(&args.input)?;

    let end = resolve_end(&CrateFfprobeExecutor::new(), &args.input, args.end)?;
    validate_range(args.start, end)?;
    terminal::print_status(
        "Range",
        &format!("{} - {}", format_clock(args.start), format_clock(end)),
        false,
    );

    run_operation(
        &args.input,
        Operation::Trim {
            start: args.start,
            end,
        },
        config,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipsmith_core::external::mocks::{MockFfprobeExecutor, sample_properties};
    use std::path::PathBuf;

    #[test]
    fn test_missing_end_defaults_to_duration() {
        let input = PathBuf::from("/videos/clip.mkv");
        let prober = MockFfprobeExecutor::new();
        prober.expect_video_properties(&input, sample_properties(true));
        assert_eq!(resolve_end(&prober, &input, None).unwrap(), 10.0);
    }

    #[test]
    fn test_given_end_skips_probe() {
        let input = PathBuf::from("/videos/clip.mkv");
        let end = resolve_end(&MockFfprobeExecutor::new(), &input, Some(4.5)).unwrap();
        assert_eq!(end, 4.5);
    }
}

// clipsmith-cli/src/main.rs
//
// Entry point for the `clipsmith` binary: parses arguments, installs the
// logger and runs the chosen subcommand. Any error is printed once and the
// process exits with status 1.

use clap::Parser;
use clipsmith_cli::{Cli, logging, terminal};
use clipsmith_core::CoreError;
use std::process;

fn main() {
    let cli = Cli::parse();
    let command = cli.command.name();

    if let Err(e) = logging::init_logging(cli.verbose, cli.log_dir.as_deref(), command) {
        eprintln!("Error initializing logging: {e}");
        process::exit(1);
    }
    log::debug!("clipsmith {} starting: {command}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = clipsmith_cli::run(cli) {
        let message = match &e {
            CoreError::OperationFailed(message) => message.clone(),
            other => other.to_string(),
        };
        log::debug!("{command} failed: {e:?}");
        terminal::print_error("Error", &message);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipsmith_cli::Commands;
    use clipsmith_cli::cli::AudioAction;
    use clipsmith_core::{OutputFormat, Region};

    #[test]
    fn test_convert_parsing() {
        let cli = Cli::try_parse_from(["clipsmith", "convert", "clip.mov", "--to", "WebM"]).unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.format, OutputFormat::Webm);
                assert!(!args.no_opus);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_crop_needs_exactly_one_selection() {
        assert!(Cli::try_parse_from(["clipsmith", "crop", "clip.mp4"]).is_err());
        assert!(
            Cli::try_parse_from([
                "clipsmith",
                "crop",
                "clip.mp4",
                "--region",
                "0,0,10,10",
                "--preview-region",
                "0,0,5,5",
            ])
            .is_err()
        );

        let cli =
            Cli::try_parse_from(["clipsmith", "crop", "clip.mp4", "--region", "10,20,30,40"]).unwrap();
        match cli.command {
            Commands::Crop(args) => {
                assert_eq!(args.selection.region, Some(Region::new(10, 20, 30, 40)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_trim_times_accept_clock_format() {
        let cli = Cli::try_parse_from([
            "clipsmith", "trim", "clip.mp4", "--start", "1:05", "--end", "0:01:30.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Trim(args) => {
                assert_eq!(args.start, 65.0);
                assert_eq!(args.end, Some(90.5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_speed_range_is_enforced_by_parser() {
        assert!(Cli::try_parse_from(["clipsmith", "speed", "clip.mp4", "--factor", "2x"]).is_ok());
        assert!(Cli::try_parse_from(["clipsmith", "speed", "clip.mp4", "--factor", "4.5"]).is_err());
        assert!(Cli::try_parse_from(["clipsmith", "speed", "clip.mp4", "--factor", "0.2"]).is_err());
    }

    #[test]
    fn test_resize_size_conflicts_with_width() {
        assert!(
            Cli::try_parse_from([
                "clipsmith", "resize", "clip.mp4", "--size", "720p", "--width", "640",
            ])
            .is_err()
        );
        let cli = Cli::try_parse_from(["clipsmith", "resize", "clip.mp4", "--size", "4K"]).unwrap();
        match cli.command {
            Commands::Resize(args) => assert_eq!(args.size, Some((3840, 2160))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_audio_subcommands_and_global_flags() {
        let cli =
            Cli::try_parse_from(["clipsmith", "audio", "extract", "talk.mkv", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command.name(), "audio");
        match cli.command {
            Commands::Audio(args) => assert!(matches!(args.action, AudioAction::Extract { .. })),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_crf_and_preset_are_range_checked() {
        assert!(
            Cli::try_parse_from(["clipsmith", "crop", "c.mp4", "--region", "0,0,2,2", "--crf", "52"])
                .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "clipsmith", "crop", "c.mp4", "--region", "0,0,2,2", "--preset", "ludicrous",
            ])
            .is_err()
        );
    }
}

//! `convert`: write `<base>.<format>` next to the input.

use super::{preflight, run_operation};
use crate::cli::ConvertArgs;
use crate::error::CliResult;
use crate::terminal;

use clipsmith_core::{CoreConfig, Operation, OutputFormat};

/// Core configuration for a conversion to `args.format`.
///
/// `--crf` sets the quality of whichever encoder the target format uses.
pub fn convert_config(args: &ConvertArgs) -> CoreConfig {
    let mut config = CoreConfig::default();
    if let Some(crf) = args.encode.crf {
        match args.format {
            OutputFormat::Webm => config.webm_crf = crf,
            OutputFormat::Mp4 => config.mp4_crf = crf,
            OutputFormat::Gif | OutputFormat::Mp3 => {
                log::debug!("--crf has no effect on {} output", args.format);
            }
        }
    }
    if let Some(preset) = &args.encode.preset {
        config.preset = preset.clone();
    }
    config.use_opus = !args.no_opus;
    config
}

pub fn run_convert(args: ConvertArgs) -> CliResult<()> {
    let config = convert_config(&args);
    config.validate()?;
    preflight(&args.input)?;

    let output = args.format.output_path(&args.input);
    if output == args.input {
        terminal::print_warning(&format!(
            "{} is already {}; the converted file will replace it",
            args.input.display(),
            args.format
        ));
    }

    run_operation(
        &args.input,
        Operation::Convert {
            format: args.format,
        },
        config,
    )?;
    Ok(())
}

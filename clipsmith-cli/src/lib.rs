// clipsmith-cli/src/lib.rs
//
// Library portion of the Clipsmith CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod terminal;
pub mod worker;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands};
pub use error::{CliErrorContext, CliResult};

/// Runs the parsed subcommand.
pub fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Convert(args) => commands::convert::run_convert(args),
        Commands::Crop(args) => commands::region::run_crop(args),
        Commands::Trim(args) => commands::trim::run_trim(args),
        Commands::Speed(args) => commands::speed::run_speed(args),
        Commands::Blur(args) => commands::region::run_blur(args),
        Commands::Resize(args) => commands::resize::run_resize(args),
        Commands::Audio(args) => commands::audio::run_audio(args),
        Commands::Info(args) => commands::info::run_info(args),
        Commands::Preview(args) => commands::preview::run_preview(args),
    }
}

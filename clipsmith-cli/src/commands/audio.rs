//! `audio mute` and `audio extract`.

use super::{preflight, run_operation};
use crate::cli::{AudioAction, AudioArgs};
use crate::error::CliResult;

use clipsmith_core::{CoreConfig, Operation};

pub fn run_audio(args: AudioArgs) -> CliResult<()> {
    let (input, operation) = match args.action {
        AudioAction::Mute { input } => (input, Operation::Mute),
        AudioAction::Extract { input } => (input, Operation::ExtractAudio),
    };
    preflight(&input)?;
    run_operation(&input, operation, CoreConfig::default())?;
    Ok(())
}

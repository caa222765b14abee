//! `speed`: change playback speed, in place.

use super::{preflight, reencode_config, run_operation};
use crate::cli::SpeedArgs;
use crate::config::SPEED_PRESETS;
use crate::error::CliResult;
use crate::terminal;

use clipsmith_core::Operation;
use clipsmith_core::processing::speed::validate_factor;

/// Whether `factor` is one of the quick-pick multipliers.
pub fn is_preset(factor: f64) -> bool {
    SPEED_PRESETS.iter().any(|preset| (preset - factor).abs() < f64::EPSILON)
}

pub fn run_speed(args: SpeedArgs) -> CliResult<()> {
    validate_factor(args.factor)?;
    let config = reencode_config(&args.encode);
    config.validate()?;
    preflight(&args.input)?;

    let kind = if is_preset(args.factor) { "preset" } else { "custom" };
    terminal::print_status("Speed", &format!("{}x ({kind})", args.factor), false);

    run_operation(&args.input, Operation::Speed { factor: args.factor }, config)?;
    Ok(())
}

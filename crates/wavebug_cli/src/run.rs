//! `wavebug run`: the interactive terminal widget.

use tracing::info;

use crate::pipeline::{build_simulation, load_widget_config};
use crate::{GlobalArgs, SimArgs};

/// Runs the `wavebug run` command. Returns exit code 0 when the user quits.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_widget_config(global)?;
    let sim = build_simulation(&config, args)?;
    info!(fault = %sim.fault_tick(), "launching terminal widget");
    wavebug_tui::run_tui(sim)?;
    Ok(0)
}

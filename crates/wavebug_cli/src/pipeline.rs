//! Shared helpers for CLI commands: config resolution and simulation setup.

use std::error::Error;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use wavebug_config::WidgetConfig;
use wavebug_core::{FaultTick, RngBits, Simulation};

use crate::{GlobalArgs, SimArgs};

/// The simulation type every command builds.
pub type CliSimulation = Simulation<RngBits<StdRng>>;

/// Loads the widget config.
///
/// `--config` names an explicit file that must exist. Otherwise
/// `wavebug.toml` in the current directory is used when present, and the
/// defaults when not.
pub fn load_widget_config(global: &GlobalArgs) -> Result<WidgetConfig, Box<dyn Error>> {
    let config = match &global.config {
        Some(path) => wavebug_config::load_config_file(Path::new(path))?,
        None => wavebug_config::load_config_or_default(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Builds a simulation from the config with command-line overrides applied.
///
/// A `--fault` value is validated exactly like interactive input.
pub fn build_simulation(
    config: &WidgetConfig,
    args: &SimArgs,
) -> Result<CliSimulation, Box<dyn Error>> {
    let mut sim_config = config.sim_config();
    if let Some(fault) = &args.fault {
        sim_config.fault = fault.parse::<FaultTick>()?;
    }
    let rng = match args.seed.or(config.simulation.seed) {
        Some(seed) => {
            debug!(seed, "seeded bit source");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    Ok(Simulation::new(sim_config, RngBits(rng)))
}

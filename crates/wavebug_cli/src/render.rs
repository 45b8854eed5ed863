//! `wavebug render`: writes an SVG snapshot of the widget.
//!
//! The simulation is advanced to `--at-ms` on its timer clock before the
//! snapshot is taken, so the highlight and annotation can be captured.

use std::fs;
use std::io::Write;
use std::time::Duration;

use tracing::info;
use wavebug_core::render_svg;

use crate::pipeline::{build_simulation, load_widget_config, CliSimulation};
use crate::{GlobalArgs, RenderArgs};

/// Runs the `wavebug render` command. Returns exit code 0 on success.
pub fn run(args: &RenderArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_widget_config(global)?;
    let mut sim = build_simulation(&config, &args.sim)?;
    let svg = snapshot(&mut sim, args.at_ms);

    match &args.output {
        Some(path) => {
            fs::write(path, &svg)?;
            info!(path = %path, state = %sim.state(), "wrote snapshot");
            if !global.quiet {
                eprintln!("   Rendered {} at {} ms ({})", path, args.at_ms, sim.state());
            }
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(svg.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(0)
}

/// Advances `sim` by `at_ms` and renders it.
pub fn snapshot(sim: &mut CliSimulation, at_ms: u64) -> String {
    sim.advance(Duration::from_millis(at_ms));
    render_svg(sim)
}

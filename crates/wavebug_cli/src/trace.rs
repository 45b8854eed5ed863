//! `wavebug trace`: prints the generated bit rows.
//!
//! Text output is one line per signal plus the healed data row, with a
//! caret under the fault tick. `--json` emits the same data as an object.

use serde::Serialize;
use wavebug_core::bit::format_bits;
use wavebug_core::{SignalKind, BITS_IN_LOOP};

use crate::pipeline::{build_simulation, load_widget_config, CliSimulation};
use crate::{GlobalArgs, TraceArgs};

/// JSON shape of `wavebug trace --json`.
#[derive(Debug, Serialize)]
pub struct TraceReport {
    /// Fault position.
    pub fault_tick: usize,
    /// Ticks per loop.
    pub ticks: usize,
    /// When the scanner reaches the fault, in milliseconds after start.
    pub detect_at_ms: u64,
    /// Generated rows in display order.
    pub signals: Vec<SignalRow>,
    /// The healed data row.
    pub corrected: String,
}

/// One row of the report.
#[derive(Debug, Serialize)]
pub struct SignalRow {
    /// Signal label.
    pub name: &'static str,
    /// Bits as `0`/`1`/`X`.
    pub bits: String,
}

/// Runs the `wavebug trace` command. Returns exit code 0 on success.
pub fn run(args: &TraceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_widget_config(global)?;
    let sim = build_simulation(&config, &args.sim)?;
    let report = trace_report(&sim);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(0)
}

/// Collects the bit rows of `sim`.
pub fn trace_report(sim: &CliSimulation) -> TraceReport {
    TraceReport {
        fault_tick: sim.fault_tick().get(),
        ticks: BITS_IN_LOOP,
        detect_at_ms: sim.timing().detection_delay(sim.fault_tick()).as_millis() as u64,
        signals: SignalKind::ALL
            .iter()
            .map(|&kind| SignalRow {
                name: kind.def().name,
                bits: format_bits(sim.bits().get(kind)),
            })
            .collect(),
        corrected: format_bits(&sim.corrected_trace().bits),
    }
}

/// Renders the report as aligned text.
pub fn format_report(report: &TraceReport) -> String {
    let mut out = String::new();
    for row in &report.signals {
        out.push_str(&format!("{:<10} {}\n", row.name, row.bits));
    }
    out.push_str(&format!("{:<10} {}\n", "fixed", report.corrected));
    out.push_str(&format!(
        "{:<10} {}^ fault @{} (detected at {} ms)\n",
        "",
        " ".repeat(report.fault_tick),
        report.fault_tick,
        report.detect_at_ms
    ));
    out
}

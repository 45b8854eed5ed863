//! Configuration types deserialized from `wavebug.toml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wavebug_core::{FaultTick, RowLayout, SignalKind, SimConfig, Timing, Visibility};

/// The top-level widget configuration parsed from `wavebug.toml`.
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WidgetConfig {
    /// Fault position and randomness.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Scanner and lifecycle durations.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Row geometry.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Initial row visibility.
    #[serde(default)]
    pub signals: SignalsConfig,
}

/// The `[simulation]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Initial fault tick. Kept signed so out-of-range values reach
    /// validation instead of failing as a type error.
    #[serde(default = "default_fault_tick")]
    pub fault_tick: i64,
    /// Seed for the random bit source; absent means seeded from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fault_tick: default_fault_tick(),
            seed: None,
        }
    }
}

fn default_fault_tick() -> i64 {
    FaultTick::default().get() as i64
}

/// The `[timing]` section. All values are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Delay before the scanner starts.
    #[serde(default = "default_scan_delay_ms")]
    pub scan_delay_ms: u64,
    /// Scanner sweep across one loop.
    #[serde(default = "default_scan_duration_ms")]
    pub scan_duration_ms: u64,
    /// Trace scroll across one loop.
    #[serde(default = "default_scroll_duration_ms")]
    pub scroll_duration_ms: u64,
    /// Time spent in the detected state.
    #[serde(default = "default_detect_hold_ms")]
    pub detect_hold_ms: u64,
    /// Time spent in the correcting state.
    #[serde(default = "default_correct_hold_ms")]
    pub correct_hold_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scan_delay_ms: default_scan_delay_ms(),
            scan_duration_ms: default_scan_duration_ms(),
            scroll_duration_ms: default_scroll_duration_ms(),
            detect_hold_ms: default_detect_hold_ms(),
            correct_hold_ms: default_correct_hold_ms(),
        }
    }
}

fn default_scan_delay_ms() -> u64 {
    1000
}

fn default_scan_duration_ms() -> u64 {
    10_000
}

fn default_scroll_duration_ms() -> u64 {
    10_000
}

fn default_detect_hold_ms() -> u64 {
    1000
}

fn default_correct_hold_ms() -> u64 {
    1500
}

/// The `[layout]` section, in pixels.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Width of one tick cell.
    #[serde(default = "default_bit_width")]
    pub bit_width: f64,
    /// Height of one signal row.
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Gap between rows.
    #[serde(default = "default_row_gap")]
    pub row_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bit_width: default_bit_width(),
            row_height: default_row_height(),
            row_gap: default_row_gap(),
        }
    }
}

fn default_bit_width() -> f64 {
    RowLayout::default().bit_width
}

fn default_row_height() -> f64 {
    RowLayout::default().row_height
}

fn default_row_gap() -> f64 {
    RowLayout::default().row_gap
}

/// The `[signals]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignalsConfig {
    /// Names of rows hidden at startup (e.g. `"CLK"`, `"DATA"`).
    #[serde(default)]
    pub hidden: Vec<String>,
}

impl WidgetConfig {
    /// The configured fault tick, or the default if out of range.
    ///
    /// Loaded configurations are validated, so the fallback only applies to
    /// hand-built values.
    pub fn fault_tick(&self) -> FaultTick {
        FaultTick::try_from(self.simulation.fault_tick).unwrap_or_default()
    }

    /// Timing converted to durations.
    pub fn timing(&self) -> Timing {
        let t = &self.timing;
        Timing {
            scan_delay: Duration::from_millis(t.scan_delay_ms),
            scan_duration: Duration::from_millis(t.scan_duration_ms),
            scroll_duration: Duration::from_millis(t.scroll_duration_ms),
            detect_hold: Duration::from_millis(t.detect_hold_ms),
            correct_hold: Duration::from_millis(t.correct_hold_ms),
        }
    }

    /// Row geometry.
    pub fn layout(&self) -> RowLayout {
        RowLayout {
            bit_width: self.layout.bit_width,
            row_height: self.layout.row_height,
            row_gap: self.layout.row_gap,
        }
    }

    /// Initial visibility. Unknown names are skipped.
    pub fn visibility(&self) -> Visibility {
        let mut vis = Visibility::default();
        for kind in self
            .signals
            .hidden
            .iter()
            .filter_map(|name| SignalKind::from_name(name).ok())
        {
            vis.set(kind, false);
        }
        vis
    }

    /// Everything the simulation needs at construction.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            timing: self.timing(),
            layout: self.layout(),
            fault: self.fault_tick(),
            visibility: self.visibility(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn defaults_match_core_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.sim_config(), SimConfig::default());
    }

    #[test]
    fn partial_timing_section_keeps_other_defaults() {
        let toml = r#"
[timing]
detect_hold_ms = 250
"#;
        let config = load_config_from_str(toml).unwrap();
        let timing = config.timing();
        assert_eq!(timing.detect_hold, Duration::from_millis(250));
        assert_eq!(timing.correct_hold, Duration::from_millis(1500));
        assert_eq!(timing.scan_delay, Duration::from_secs(1));
    }

    #[test]
    fn hidden_signals_accept_bus_name() {
        let toml = r#"
[signals]
hidden = ["clk", "DATA"]
"#;
        let config = load_config_from_str(toml).unwrap();
        let vis = config.visibility();
        assert!(!vis.is_visible(SignalKind::Clock));
        assert!(!vis.is_visible(SignalKind::Data));
        assert!(vis.is_visible(SignalKind::Reset));
        assert!(vis.is_visible(SignalKind::Valid));
    }

    #[test]
    fn fault_tick_converts() {
        let toml = r#"
[simulation]
fault_tick = 12
seed = 9
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.fault_tick().get(), 12);
        assert_eq!(config.simulation.seed, Some(9));
    }

    #[test]
    fn layout_converts() {
        let toml = r#"
[layout]
bit_width = 8.0
row_height = 20.0
"#;
        let config = load_config_from_str(toml).unwrap();
        let layout = config.layout();
        assert_eq!(layout.bit_width, 8.0);
        assert_eq!(layout.row_height, 20.0);
        assert_eq!(layout.row_gap, 16.0);
    }
}

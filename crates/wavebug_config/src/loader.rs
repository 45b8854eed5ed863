//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::WidgetConfig;
use std::path::Path;
use tracing::debug;
use wavebug_core::{FaultTick, SignalKind};

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "wavebug.toml";

/// Contents written by `wavebug init`; parses to the built-in defaults.
pub const DEFAULT_CONFIG: &str = r#"# wavebug widget configuration

[simulation]
# Tick (0-99) at which the data bus is corrupted.
fault_tick = 55
# Uncomment for reproducible traces.
# seed = 7

[timing]
scan_delay_ms = 1000
scan_duration_ms = 10000
scroll_duration_ms = 10000
detect_hold_ms = 1000
correct_hold_ms = 1500

[layout]
bit_width = 16.0
row_height = 40.0
row_gap = 16.0

[signals]
# Rows hidden at startup, e.g. ["CLK"].
hidden = []
"#;

/// Loads and validates `wavebug.toml` from a directory.
///
/// Reads `<dir>/wavebug.toml`, parses it, and validates every value.
pub fn load_config(dir: &Path) -> Result<WidgetConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates an explicit configuration file.
pub fn load_config_file(path: &Path) -> Result<WidgetConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = load_config_from_str(&content)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Like [`load_config`], but falls back to defaults when the directory has
/// no `wavebug.toml`.
pub fn load_config_or_default(dir: &Path) -> Result<WidgetConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        debug!(dir = %dir.display(), "no configuration file, using defaults");
        return Ok(WidgetConfig::default());
    }
    load_config_file(&path)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<WidgetConfig, ConfigError> {
    let config: WidgetConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks ranges and names the type system cannot express.
fn validate_config(config: &WidgetConfig) -> Result<(), ConfigError> {
    let tick = config.simulation.fault_tick;
    if FaultTick::try_from(tick).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "simulation.fault_tick must be between 0 and {}, got {tick}",
            FaultTick::MAX
        )));
    }

    let t = &config.timing;
    for (name, value) in [
        ("timing.scan_duration_ms", t.scan_duration_ms),
        ("timing.scroll_duration_ms", t.scroll_duration_ms),
        ("timing.detect_hold_ms", t.detect_hold_ms),
        ("timing.correct_hold_ms", t.correct_hold_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be greater than zero"
            )));
        }
    }

    let l = &config.layout;
    for (name, value) in [
        ("layout.bit_width", l.bit_width),
        ("layout.row_height", l.row_height),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be positive"
            )));
        }
    }
    if !(l.row_gap.is_finite() && l.row_gap >= 0.0) {
        return Err(ConfigError::ValidationError(
            "layout.row_gap must not be negative".to_string(),
        ));
    }

    for name in &config.signals.hidden {
        SignalKind::from_name(name)
            .map_err(|e| ConfigError::ValidationError(format!("signals.hidden: {e}")))?;
    }
    Ok(())
}

//! Parsing and validation of `wavebug.toml` configuration files.
//!
//! This crate reads the widget configuration file and produces a
//! strongly-typed [`WidgetConfig`], which converts into the
//! [`SimConfig`](wavebug_core::SimConfig) the simulation is built from.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_config, load_config_file, load_config_from_str, load_config_or_default,
    CONFIG_FILE_NAME, DEFAULT_CONFIG,
};
pub use types::*;

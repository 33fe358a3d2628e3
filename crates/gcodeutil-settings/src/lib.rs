//! GCodeUtil Settings Crate
//!
//! Handles the tool-change configuration file: defaults, validation,
//! JSON/TOML persistence and the load-or-create fallback used at startup.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    Config, OutputSettings, ToolChangeSettings, DEFAULT_CONFIG_FILE, DEFAULT_OUTPUT_SUFFIX,
};
pub use error::{SettingsError, SettingsResult};
pub use persistence::{ConfigSource, SettingsPersistence};

//! Configuration and settings management for GCodeUtil
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats.
//!
//! Configuration is organized into logical sections:
//! - Tool change settings (commands inserted around M6/M98)
//! - Output settings (naming of the rewritten program)

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "gcodeutil.json";

/// Appended to the input file stem to name the output program
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_modified";

/// Commands inserted around tool changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolChangeSettings {
    /// Inserted ahead of the tool-change line
    #[serde(alias = "gcodesBeforeToolChange")]
    pub gcodes_before_tool_change: Vec<String>,
    /// Inserted after the first `G0 X.. Y..` that follows the tool change
    #[serde(alias = "gcodesAfterToolChange")]
    pub gcodes_after_tool_change: Vec<String>,
}

impl Default for ToolChangeSettings {
    fn default() -> Self {
        Self {
            gcodes_before_tool_change: Vec::new(),
            gcodes_after_tool_change: vec!["M8".to_string(), "G4 P1".to_string()],
        }
    }
}

/// Output file settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Suffix placed between the input stem and its extension
    pub suffix: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Tool change insertion settings
    #[serde(alias = "toolChange")]
    pub tool_change: ToolChangeSettings,
    /// Output naming
    pub output: OutputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        validate_commands(
            "tool_change.gcodes_before_tool_change",
            &self.tool_change.gcodes_before_tool_change,
        )?;
        validate_commands(
            "tool_change.gcodes_after_tool_change",
            &self.tool_change.gcodes_after_tool_change,
        )?;

        let suffix = &self.output.suffix;
        if suffix.trim().is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "output.suffix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if suffix.contains(['/', '\\']) {
            return Err(SettingsError::InvalidSetting {
                key: "output.suffix".to_string(),
                reason: "must not contain path separators".to_string(),
            });
        }

        Ok(())
    }
}

fn validate_commands(key: &str, commands: &[String]) -> SettingsResult<()> {
    for (index, command) in commands.iter().enumerate() {
        if command.trim().is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: format!("{}[{}]", key, index),
                reason: "command is empty".to_string(),
            });
        }
        if command.contains(['\n', '\r']) {
            return Err(SettingsError::InvalidSetting {
                key: format!("{}[{}]", key, index),
                reason: "one command per entry; line breaks are not allowed".to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.tool_change.gcodes_before_tool_change.is_empty());
        assert_eq!(
            config.tool_change.gcodes_after_tool_change,
            vec!["M8".to_string(), "G4 P1".to_string()]
        );
        assert_eq!(config.output.suffix, "_modified");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut config = Config::new();
        config.tool_change.gcodes_before_tool_change = vec!["M9".to_string()];
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");

        let mut config = Config::new();
        config.output.suffix = "_coolant".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_camel_case_aliases() {
        let json = r#"{
            "toolChange": {
                "gcodesBeforeToolChange": ["M5"],
                "gcodesAfterToolChange": ["M8"]
            }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.tool_change.gcodes_before_tool_change, vec!["M5"]);
        assert_eq!(config.tool_change.gcodes_after_tool_change, vec!["M8"]);
        assert_eq!(config.output.suffix, "_modified");
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_blank_command() {
        let mut config = Config::new();
        config.tool_change.gcodes_after_tool_change = vec!["M8".to_string(), "  ".to_string()];
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid setting 'tool_change.gcodes_after_tool_change[1]': command is empty"
        );
    }

    #[test]
    fn test_validate_rejects_multiline_command() {
        let mut config = Config::new();
        config.tool_change.gcodes_before_tool_change = vec!["M8\nG4 P1".to_string()];
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_suffix() {
        let mut config = Config::new();
        config.output.suffix = String::new();
        assert!(config.validate().is_err());

        config.output.suffix = "../x".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        let err = Config::new().save_to_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat(ref ext) if ext == "yaml"));
    }
}

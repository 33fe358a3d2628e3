//! Settings Persistence
//!
//! Loads the configuration file at startup. A missing file is created with
//! defaults; an unreadable or invalid one is reported and replaced by
//! in-memory defaults for the current run without touching the file.

use crate::config::Config;
use std::path::{Path, PathBuf};

/// Where the active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from an existing file
    Loaded,
    /// The file was missing and has been written with defaults
    Created,
    /// Defaults used because the file could not be read, parsed or written
    Defaults,
}

/// Settings persistence layer
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    config: Config,
    path: PathBuf,
    source: ConfigSource,
}

impl SettingsPersistence {
    /// Load settings from `path`, creating the file when it does not exist.
    ///
    /// Never fails: every problem is logged and answered with defaults.
    pub fn load_or_create(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        if !path.exists() {
            let config = Config::default();
            let source = match config.save_to_file(&path) {
                Ok(()) => {
                    tracing::info!("Created default settings file {}", path.display());
                    ConfigSource::Created
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not create settings file {}: {}; using defaults",
                        path.display(),
                        e
                    );
                    ConfigSource::Defaults
                }
            };
            return Self {
                config,
                path,
                source,
            };
        }

        match Config::load_from_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded settings from {}", path.display());
                Self {
                    config,
                    path,
                    source: ConfigSource::Loaded,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring settings file {}: {}; using defaults",
                    path.display(),
                    e
                );
                Self {
                    config: Config::default(),
                    path,
                    source: ConfigSource::Defaults,
                }
            }
        }
    }

    /// Get reference to config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the settings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How the settings were obtained
    pub fn source(&self) -> ConfigSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gcodeutil.json");

        let persistence = SettingsPersistence::load_or_create(&path);
        assert_eq!(persistence.source(), ConfigSource::Created);
        assert_eq!(persistence.config(), &Config::default());
        assert_eq!(persistence.path(), path.as_path());
        assert!(path.exists());

        let reloaded = SettingsPersistence::load_or_create(&path);
        assert_eq!(reloaded.source(), ConfigSource::Loaded);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gcodeutil.json");
        std::fs::write(&path, "{ not json").unwrap();

        let persistence = SettingsPersistence::load_or_create(&path);
        assert_eq!(persistence.source(), ConfigSource::Defaults);
        assert_eq!(persistence.config(), &Config::default());

        // The broken file is left for the operator to fix
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_unwritable_location_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("gcodeutil.json");

        let persistence = SettingsPersistence::load_or_create(&path);
        assert_eq!(persistence.source(), ConfigSource::Defaults);
        assert!(!path.exists());
    }
}

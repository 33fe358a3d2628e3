//! # GCodeUtil
//!
//! Rewrites CNC programs so that every tool change is surrounded by
//! operator-chosen commands (coolant on, dwell, ...).
//!
//! ## Architecture
//!
//! GCodeUtil is organized as a workspace with multiple crates:
//!
//! 1. **gcodeutil-core** - Error types
//! 2. **gcodeutil-settings** - Settings file load/save with defaults
//! 3. **gcodeutil-processor** - Line classification, tool change transformer, file rewriting
//! 4. **gcodeutil** - Command-line binary tying the crates together

pub mod cli;

use std::path::PathBuf;

pub use cli::Cli;
pub use gcodeutil_core::{Error, GcodeError, Result};
pub use gcodeutil_processor::{
    output_path_for, rewrite_file, transform_lines, InsertConfig, LineClass,
    ToolChangeTransformer, TransformStats,
};
pub use gcodeutil_settings::{Config, ConfigSource, SettingsPersistence, ToolChangeSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Version string shown by `--version`
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Initialize logging
///
/// Logs go to stderr so stdout only carries messages meant for the operator.
/// `RUST_LOG` takes precedence; otherwise the level is `warn`, raised by
/// each `-v`.
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .with_level(true)
        .with_line_number(verbosity > 1);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Path of the rewritten program
    pub output: PathBuf,
    /// Counters from the transformer
    pub stats: TransformStats,
    /// Where the settings came from
    pub config_source: ConfigSource,
}

/// Combine the stored tool change settings with an optional command-line
/// override of the "before" list.
///
/// An override that holds no commands is ignored.
pub fn resolve_insert_config(settings: &ToolChangeSettings, override_list: Option<&str>) -> InsertConfig {
    let config = InsertConfig::new(
        &settings.gcodes_before_tool_change,
        &settings.gcodes_after_tool_change,
    );

    match override_list {
        Some(list) => {
            let before = InsertConfig::parse_list(list);
            if before.is_empty() {
                tracing::warn!("Ignoring empty command list '{}'", list);
                config
            } else {
                tracing::info!("Inserting before tool changes: {}", before.join(", "));
                config.with_before(before)
            }
        }
        None => config,
    }
}

/// Rewrite the program named on the command line.
///
/// The input is checked before anything else so that a missing file never
/// creates a settings file or an output file.
pub fn run(cli: &Cli) -> Result<RunReport> {
    if !cli.input.is_file() {
        return Err(GcodeError::InputNotFound {
            path: cli.input.clone(),
        }
        .into());
    }

    let persistence = SettingsPersistence::load_or_create(&cli.config);
    tracing::info!(
        "Using settings from {} ({:?})",
        persistence.path().display(),
        persistence.source()
    );
    let settings = persistence.config();
    let insert = resolve_insert_config(&settings.tool_change, cli.gcodes.as_deref());

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(&cli.input, &settings.output.suffix));

    let stats = rewrite_file(&cli.input, &output, &insert)?;
    tracing::debug!("Transform stats: {:?}", stats);

    Ok(RunReport {
        output,
        stats,
        config_source: persistence.source(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_override() {
        let settings = ToolChangeSettings::default();
        let config = resolve_insert_config(&settings, None);
        assert!(config.before().is_empty());
        assert_eq!(config.after(), ["M8", "G4 P1"]);
    }

    #[test]
    fn test_resolve_with_override() {
        let settings = ToolChangeSettings {
            gcodes_before_tool_change: vec!["M5".to_string()],
            gcodes_after_tool_change: vec!["M8".to_string()],
        };
        let config = resolve_insert_config(&settings, Some("M9, G28 G91 Z0"));
        assert_eq!(config.before(), ["M9", "G28 G91 Z0"]);
        assert_eq!(config.after(), ["M8"]);
    }

    #[test]
    fn test_resolve_with_empty_override() {
        let settings = ToolChangeSettings {
            gcodes_before_tool_change: vec!["M5".to_string()],
            gcodes_after_tool_change: Vec::new(),
        };
        let config = resolve_insert_config(&settings, Some(" , "));
        assert_eq!(config.before(), ["M5"]);
    }

    #[test]
    fn test_long_version_mentions_build() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains(BUILD_DATE));
    }
}

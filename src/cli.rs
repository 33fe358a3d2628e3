//! Command-line interface definitions.

use clap::Parser;
use gcodeutil_settings::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

use crate::LONG_VERSION;

const AFTER_HELP: &str = "\
Behavior:
  - Scans the program line by line.
  - Writes the 'before' commands ahead of every M6 or M98 line.
  - After the first 'G0 X.. Y..' that follows, writes any dwell (G4) lines
    seen in between, then the 'after' commands.
  - Drops M8/M08 lines; the inserted commands own coolant control.
  - Writes the result to '<name>_modified<ext>' next to the input.

Examples:
  gcodeutil part.nc
      Uses the commands from gcodeutil.json (created with defaults if missing)

  gcodeutil part.nc \"M9,G28 G91 Z0\"
      Inserts M9 and G28 G91 Z0 before every tool change, for this run only";

/// Insert auxiliary G-code around tool changes
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gcodeutil",
    version,
    long_version = LONG_VERSION,
    about,
    long_about = None,
    arg_required_else_help = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// G-code program to rewrite
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Comma-separated commands to insert before each tool change (this run only)
    pub gcodes: Option<String>,

    /// Settings file (.json or .toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Output path (default: <input stem>_modified<ext> next to the input)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

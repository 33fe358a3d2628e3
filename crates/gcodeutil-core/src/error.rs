//! Error handling for GCodeUtil
//!
//! Provides the error types used across the workspace:
//! - G-Code errors (line numbers, input files)
//! - A unified [`Error`] wrapping G-Code and I/O failures
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// G-Code error type
///
/// Represents problems found while rewriting a G-Code program. Only
/// [`GcodeError::InputNotFound`] aborts a run; the others are recovered
/// locally by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GcodeError {
    /// A leading `N` word could not be read as a line number
    #[error("Unparsable line number in '{line}': {reason}")]
    LineNumberUnparsable {
        /// The offending source line.
        line: String,
        /// Why the number was rejected.
        reason: String,
    },

    /// The input program does not exist
    #[error("File not found: {}", path.display())]
    InputNotFound {
        /// The path that was requested.
        path: PathBuf,
    },
}

/// Main error type for GCodeUtil
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if the input program was missing
    pub fn is_input_not_found(&self) -> bool {
        matches!(self, Error::Gcode(GcodeError::InputNotFound { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

//! Utilities
//!
//! File I/O for rewriting programs on disk.

pub mod file_io;

pub use file_io::*;

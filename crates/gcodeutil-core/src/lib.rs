//! # GCodeUtil Core
//!
//! Error taxonomy shared by the settings and processor crates.

pub mod error;

pub use error::{Error, GcodeError, Result};

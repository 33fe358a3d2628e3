//! G-Code line handling
//!
//! This module provides:
//! - Line classification (tool change, coolant, dwell, rapid X/Y)
//! - Leading `N` line number extraction
//! - The tool change transformer state machine

pub mod classify;
pub mod line_number;
pub mod transformer;

pub use classify::*;
pub use line_number::*;
pub use transformer::*;

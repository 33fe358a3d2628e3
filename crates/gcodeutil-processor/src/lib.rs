//! # GCodeUtil Processor
//!
//! Rewrites G-code programs around tool changes: classifies each line,
//! runs the tool change state machine and writes the result back to disk.

pub mod gcode;
pub mod utils;

pub use gcode::{
    classify, line_number, transform_lines, try_line_number, InsertConfig, LineClass,
    ToolChangeTransformer, TransformOutput, TransformState, TransformStats,
};

pub use utils::{output_path_for, rewrite_file, transform_stream};

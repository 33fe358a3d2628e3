//! File I/O Module
//!
//! Streams a G-code program through the tool change transformer and writes
//! the result next to the input. Output goes to a temporary file in the
//! destination directory first and is renamed into place only when the
//! whole pass succeeded, so a failed run never leaves a truncated program.
//!
//! Lines that are not valid UTF-8 (Latin-1 comments from older post
//! processors) are decoded byte for byte and written back unchanged.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use gcodeutil_core::{GcodeError, Result};
use tempfile::NamedTempFile;

use crate::gcode::{InsertConfig, ToolChangeTransformer, TransformStats};

/// Buffer size for reading large files (256 KB)
const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Name of the rewritten program: `<stem><suffix><ext>` beside the input.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = format!("{}{}", stem, suffix);
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }

    input.with_file_name(name)
}

/// Run every line of `reader` through a fresh transformer into `writer`.
///
/// `\n` and `\r\n` endings are accepted; output always uses `\n`.
pub fn transform_stream<R, W>(config: &InsertConfig, mut reader: R, writer: &mut W) -> Result<TransformStats>
where
    R: BufRead,
    W: Write,
{
    let mut transformer = ToolChangeTransformer::new(config);
    let mut raw_lines = HashSet::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = decode_line(strip_line_ending(&buf), &mut raw_lines);
        for out in transformer.process_line(&line) {
            write_line(writer, &out, &raw_lines)?;
        }
    }
    for out in transformer.finish() {
        write_line(writer, &out, &raw_lines)?;
    }

    writer.flush()?;
    Ok(transformer.into_stats())
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// Decode one line; non-UTF-8 lines are mapped byte for byte to Latin-1 and
/// remembered so [`write_line`] can restore the original bytes.
fn decode_line(bytes: &[u8], raw_lines: &mut HashSet<String>) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            let text: String = bytes.iter().copied().map(char::from).collect();
            tracing::debug!("Line is not UTF-8 ({}); passing its bytes through: {}", e, text);
            raw_lines.insert(text.clone());
            text
        }
    }
}

fn write_line<W: Write>(writer: &mut W, line: &str, raw_lines: &HashSet<String>) -> Result<()> {
    if raw_lines.contains(line) {
        let bytes: Vec<u8> = line
            .chars()
            .map(|c| u8::try_from(c).unwrap_or(b'?'))
            .collect();
        writer.write_all(&bytes)?;
        writer.write_all(b"\n")?;
    } else {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Rewrite `input` into `output`.
///
/// # Errors
/// `GcodeError::InputNotFound` if `input` is not an existing file (nothing
/// is written in that case), or an I/O error from reading or writing.
pub fn rewrite_file(input: &Path, output: &Path, config: &InsertConfig) -> Result<TransformStats> {
    if !input.is_file() {
        return Err(GcodeError::InputNotFound {
            path: input.to_path_buf(),
        }
        .into());
    }

    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, File::open(input)?);

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    let stats = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        transform_stream(config, reader, &mut writer)?
    };

    temp.persist(output).map_err(|e| e.error)?;

    tracing::info!(
        "Rewrote {} -> {} ({} tool changes, {} insertions, {} coolant lines dropped)",
        input.display(),
        output.display(),
        stats.tool_changes,
        stats.insertions,
        stats.coolant_suppressed
    );

    Ok(stats)
}

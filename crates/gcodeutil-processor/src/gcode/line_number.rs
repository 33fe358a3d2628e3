//! Leading `N` line numbers
//!
//! Numbers are only read from the line that triggers an insertion; nothing
//! is tracked across the file.

use gcodeutil_core::GcodeError;

/// Parse the leading `N<digits>` word of a line.
///
/// Returns `Ok(None)` when the line has no `N` word and an error when the
/// word is present but not a usable number.
pub fn try_line_number(line: &str) -> Result<Option<u32>, GcodeError> {
    let Some(rest) = line.trim_start().strip_prefix(['N', 'n']) else {
        return Ok(None);
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(GcodeError::LineNumberUnparsable {
            line: line.to_string(),
            reason: "no digits after N".to_string(),
        });
    }
    if rest[digits..].starts_with('.') {
        return Err(GcodeError::LineNumberUnparsable {
            line: line.to_string(),
            reason: "fractional line number".to_string(),
        });
    }

    rest[..digits]
        .parse::<u32>()
        .map(Some)
        .map_err(|e| GcodeError::LineNumberUnparsable {
            line: line.to_string(),
            reason: e.to_string(),
        })
}

/// Line number of `line`, or 0 when absent or unparsable.
pub fn line_number(line: &str) -> u32 {
    match try_line_number(line) {
        Ok(number) => number.unwrap_or(0),
        Err(e) => {
            tracing::debug!("{}; numbering disabled for this block", e);
            0
        }
    }
}

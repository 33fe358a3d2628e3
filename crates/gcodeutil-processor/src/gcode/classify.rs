//! Line classification for the tool-change rewriter
//!
//! Only a handful of codes matter here, so lines are scanned for address
//! words (a letter followed by its number) instead of being parsed.
//! Comments in parentheses or after `;` are ignored.

/// Category of a source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineClass {
    /// `M6` tool change or `M98` subroutine call
    ToolChange,
    /// `M8` coolant on
    Coolant,
    /// `G4` dwell
    Dwell,
    /// `G0`/`G00` rapid with both X and Y present
    RapidXy,
    /// Anything else
    Plain,
}

impl LineClass {
    /// Short lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToolChange => "tool_change",
            Self::Coolant => "coolant",
            Self::Dwell => "dwell",
            Self::RapidXy => "rapid_xy",
            Self::Plain => "plain",
        }
    }
}

impl std::fmt::Display for LineClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a single source line.
///
/// Checks run in a fixed order: tool change, coolant, dwell, rapid. A line
/// holding both `M6` and `M8` is therefore a tool change.
pub fn classify(line: &str) -> LineClass {
    let code = strip_comments(line.trim()).to_ascii_uppercase();
    let words = address_words(&code);

    if words.iter().any(Word::is_tool_change) {
        LineClass::ToolChange
    } else if words.iter().any(|w| w.is_code('M', 8)) {
        LineClass::Coolant
    } else if words.iter().any(|w| w.is_code('G', 4)) {
        LineClass::Dwell
    } else if is_rapid(&words) && code.contains('X') && code.contains('Y') {
        LineClass::RapidXy
    } else {
        LineClass::Plain
    }
}

/// A letter and the number glued to it, e.g. `G` + `00`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Word<'a> {
    letter: u8,
    value: &'a str,
}

impl Word<'_> {
    /// True if this is `letter` followed by an integer equal to `number`.
    /// Leading zeros are allowed (`M08`), fractions and extra digits are not.
    fn is_code(&self, letter: char, number: u32) -> bool {
        self.letter == letter as u8
            && !self.value.is_empty()
            && self.value.bytes().all(|b| b.is_ascii_digit())
            && self.value.parse::<u32>().ok() == Some(number)
    }

    fn is_tool_change(&self) -> bool {
        self.is_code('M', 6) || self.is_code('M', 98)
    }
}

/// Scan an uppercased, comment-free line into address words.
fn address_words(code: &str) -> Vec<Word<'_>> {
    let bytes = code.as_bytes();
    let mut words = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_alphabetic() {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && matches!(bytes[end], b'0'..=b'9' | b'.' | b'-' | b'+') {
                end += 1;
            }
            words.push(Word {
                letter: bytes[i],
                value: &code[start..end],
            });
            i = end;
        } else {
            i += 1;
        }
    }

    words
}

/// The command word is the first word after an optional `N` line number.
fn is_rapid(words: &[Word<'_>]) -> bool {
    words
        .iter()
        .find(|w| w.letter != b'N')
        .is_some_and(|w| w.is_code('G', 0))
}

fn strip_comments(line: &str) -> String {
    let mut code = String::with_capacity(line.len());
    let mut depth = 0usize;

    for ch in line.chars() {
        match ch {
            ';' if depth == 0 => break,
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => code.push(ch),
            _ => {}
        }
    }

    code
}

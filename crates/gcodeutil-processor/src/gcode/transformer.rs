//! Tool change transformer
//!
//! Single-pass state machine that injects the configured commands around
//! every tool change:
//!
//! - the "before" block is written ahead of the `M6`/`M98` line, numbered
//!   backwards from that line's `N` number
//! - the "after" block is written once the first `G0 X.. Y..` following the
//!   tool change has been emitted, numbered forward from that move
//! - dwell lines seen in between are held back and emitted right after the
//!   rapid move, ahead of the "after" block
//! - coolant-on lines are dropped; the injected commands own coolant control

use std::collections::VecDeque;

use super::classify::{classify, LineClass};
use super::line_number::line_number;

/// Commands injected around each tool change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertConfig {
    before: Vec<String>,
    after: Vec<String>,
}

impl InsertConfig {
    /// Build a configuration; entries are trimmed and blank ones dropped.
    pub fn new<B, A>(before: B, after: A) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            before: normalize(before),
            after: normalize(after),
        }
    }

    /// Replace the "before" list, keeping the "after" list.
    pub fn with_before<B>(mut self, before: B) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        self.before = normalize(before);
        self
    }

    /// Split a comma-separated command list such as `"M8,G4 P1"`.
    pub fn parse_list(list: &str) -> Vec<String> {
        normalize(list.split(','))
    }

    /// Commands inserted before the tool change line
    pub fn before(&self) -> &[String] {
        &self.before
    }

    /// Commands inserted after the synchronising rapid move
    pub fn after(&self) -> &[String] {
        &self.after
    }
}

impl Default for InsertConfig {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), ["M8", "G4 P1"])
    }
}

fn normalize<I>(commands: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    commands
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Transformer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformState {
    /// No tool change awaiting its rapid move
    Idle,
    /// A tool change was seen; waiting for `G0 X.. Y..`
    AwaitingSync,
}

/// Counters collected over one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Source lines consumed
    pub lines_read: usize,
    /// Lines emitted, injected ones included
    pub lines_written: usize,
    /// Tool change lines seen
    pub tool_changes: usize,
    /// Windows closed by a rapid move (one "after" block each)
    pub insertions: usize,
    /// Lines synthesised from the configuration
    pub injected_lines: usize,
    /// Coolant lines dropped
    pub coolant_suppressed: usize,
    /// Dwell lines moved behind a rapid move
    pub dwells_requeued: usize,
    /// Dwell lines dropped because another tool change reset the window
    pub dwells_discarded: usize,
    /// Windows still open at end of input
    pub unclosed_windows: usize,
}

/// Line-by-line tool change transformer
///
/// # Example
/// ```ignore
/// let config = InsertConfig::new(Vec::<String>::new(), ["M8"]);
/// let mut transformer = ToolChangeTransformer::new(&config);
/// for line in source.lines() {
///     for out in transformer.process_line(line) {
///         println!("{}", out);
///     }
/// }
/// for out in transformer.finish() {
///     println!("{}", out);
/// }
/// ```
#[derive(Debug)]
pub struct ToolChangeTransformer<'a> {
    config: &'a InsertConfig,
    state: TransformState,
    pending: VecDeque<String>,
    window_opened_at: usize,
    stats: TransformStats,
}

impl<'a> ToolChangeTransformer<'a> {
    /// Create a transformer in the `Idle` state
    pub fn new(config: &'a InsertConfig) -> Self {
        Self {
            config,
            state: TransformState::Idle,
            pending: VecDeque::new(),
            window_opened_at: 0,
            stats: TransformStats::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> TransformState {
        self.state
    }

    /// Number of dwell lines currently held back
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Counters so far
    pub fn stats(&self) -> &TransformStats {
        &self.stats
    }

    /// Consume the transformer, returning its counters
    pub fn into_stats(self) -> TransformStats {
        self.stats
    }

    /// Feed one source line; returns the lines to emit, possibly none.
    pub fn process_line(&mut self, line: &str) -> Vec<String> {
        self.stats.lines_read += 1;
        let class = classify(line);
        tracing::trace!(line = self.stats.lines_read, %class, state = ?self.state, "classified");

        let mut out = Vec::new();
        match (self.state, class) {
            (TransformState::Idle, LineClass::ToolChange) => {
                let config = self.config;
                let first = seed(line_number(line), -(config.before.len() as i64));
                self.emit_block(&mut out, &config.before, first);
                self.open_window(line, &mut out);
            }
            (TransformState::AwaitingSync, LineClass::ToolChange) => {
                if !self.pending.is_empty() {
                    tracing::warn!(
                        "Tool change at line {} reset the window opened at line {}; discarding {} dwell line(s)",
                        self.stats.lines_read,
                        self.window_opened_at,
                        self.pending.len()
                    );
                    self.stats.dwells_discarded += self.pending.len();
                }
                self.open_window(line, &mut out);
            }
            (_, LineClass::Coolant) => {
                tracing::debug!("Dropping coolant line {}: {}", self.stats.lines_read, line);
                self.stats.coolant_suppressed += 1;
            }
            (TransformState::AwaitingSync, LineClass::Dwell) => {
                self.pending.push_back(line.to_string());
            }
            (TransformState::AwaitingSync, LineClass::RapidXy) => {
                self.close_window(line, &mut out);
            }
            _ => out.push(line.to_string()),
        }

        self.stats.lines_written += out.len();
        out
    }

    /// Flush anything still held back at end of input.
    ///
    /// An open window gets its dwell lines back verbatim but no "after"
    /// block, since the rapid move it was waiting for never came.
    pub fn finish(&mut self) -> Vec<String> {
        if self.state == TransformState::Idle {
            return Vec::new();
        }

        tracing::warn!(
            "Tool change at line {} has no following G0 X/Y move; nothing inserted after it",
            self.window_opened_at
        );
        self.stats.unclosed_windows += 1;
        self.state = TransformState::Idle;

        let out: Vec<String> = self.pending.drain(..).collect();
        self.stats.lines_written += out.len();
        out
    }

    fn open_window(&mut self, line: &str, out: &mut Vec<String>) {
        out.push(line.to_string());
        self.pending.clear();
        self.state = TransformState::AwaitingSync;
        self.window_opened_at = self.stats.lines_read;
        self.stats.tool_changes += 1;
    }

    fn close_window(&mut self, line: &str, out: &mut Vec<String>) {
        // Rapid move and held dwells keep their own N labels; only the
        // injected block is numbered.
        out.push(line.to_string());
        self.stats.dwells_requeued += self.pending.len();
        out.extend(self.pending.drain(..));

        let config = self.config;
        self.emit_block(out, &config.after, seed(line_number(line), 1));
        self.state = TransformState::Idle;
        self.stats.insertions += 1;
        tracing::debug!(
            "Closed tool change window from line {} at line {}",
            self.window_opened_at,
            self.stats.lines_read
        );
    }

    fn emit_block(&mut self, out: &mut Vec<String>, commands: &[String], seed: i64) {
        for (offset, command) in commands.iter().enumerate() {
            if seed > 0 {
                out.push(format!("N{} {}", seed + offset as i64, command));
            } else {
                out.push(command.clone());
            }
        }
        self.stats.injected_lines += commands.len();
    }
}

/// First number of an injected block; 0 or below disables numbering.
fn seed(number: u32, offset: i64) -> i64 {
    if number == 0 {
        0
    } else {
        i64::from(number) + offset
    }
}

/// Output of [`transform_lines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Emitted lines, in order
    pub lines: Vec<String>,
    /// Counters for the pass
    pub stats: TransformStats,
}

/// Run a whole program through a fresh transformer.
pub fn transform_lines<I>(config: &InsertConfig, lines: I) -> TransformOutput
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut transformer = ToolChangeTransformer::new(config);
    let mut output = Vec::new();
    for line in lines {
        output.extend(transformer.process_line(line.as_ref()));
    }
    output.extend(transformer.finish());

    TransformOutput {
        lines: output,
        stats: transformer.into_stats(),
    }
}

//! Line-numbered, dedented rendering of a failing statement
//!
//! Stack locations usually point somewhere inside a statement that spans
//! several lines. The excerpt shows the whole statement plus a little
//! context, with the statement's first line marked:
//!
//! ```text
//!      9 let c = 3;
//!  >   10 check(
//!     11     a,
//! ```

use crate::error::{SourceError, SourceResult};
use crate::statement::{locate_statement, parse_rust, StatementSpan};
use std::fmt;

/// Context lines shown around a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Lines shown before the statement's first line
    pub leading: usize,
    /// Lines shown after the failing line
    pub following: usize,
}

impl Window {
    /// Create window
    #[inline]
    #[must_use]
    pub fn new(leading: usize, following: usize) -> Self {
        Self { leading, following }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self {
            leading: 1,
            following: 2,
        }
    }
}

/// One rendered excerpt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptLine {
    /// Original 1-based line number
    pub number: usize,
    /// Dedented text
    pub text: String,
    /// Set on the statement's first line
    pub marked: bool,
}

impl fmt::Display for ExcerptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.marked { '>' } else { ' ' };
        let rendered = format!(" {} {:>4} {}", marker, self.number, self.text);
        f.write_str(rendered.trim_end())
    }
}

/// Reconstructed statement with surrounding context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceExcerpt {
    statement: StatementSpan,
    failing_line: usize,
    lines: Vec<ExcerptLine>,
}

impl SourceExcerpt {
    /// Statement the failing line belongs to
    #[inline]
    #[must_use]
    pub fn statement(&self) -> StatementSpan {
        self.statement
    }

    /// Line the lookup started from
    #[inline]
    #[must_use]
    pub fn failing_line(&self) -> usize {
        self.failing_line
    }

    /// Rendered lines in file order
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[ExcerptLine] {
        &self.lines
    }

    /// Line numbers covered by the excerpt
    #[must_use]
    pub fn line_numbers(&self) -> Vec<usize> {
        self.lines.iter().map(|l| l.number).collect()
    }
}

impl fmt::Display for SourceExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Rebuild the statement containing `line` from Rust source text
///
/// # Errors
/// Returns error if `line` is outside the source, parsing fails, or no
/// statement starts on or spans `line`
pub fn reconstruct_source(source: &str, line: usize, window: Window) -> SourceResult<SourceExcerpt> {
    let all_lines: Vec<&str> = source.lines().collect();
    if line == 0 || line > all_lines.len() {
        return Err(SourceError::LineOutOfRange {
            line,
            line_count: all_lines.len(),
        });
    }

    let tree = parse_rust(source)?;
    let statement =
        locate_statement(source, &tree, line).ok_or(SourceError::StatementNotFound { line })?;

    let first = statement.start_line.saturating_sub(window.leading).max(1);
    let last = (line + window.following).min(all_lines.len());
    let dedented = dedent(&all_lines[first - 1..last]);

    let lines = (first..=last)
        .zip(dedented)
        .map(|(number, text)| ExcerptLine {
            number,
            text,
            marked: number == statement.start_line,
        })
        .collect();

    Ok(SourceExcerpt {
        statement,
        failing_line: line,
        lines,
    })
}

/// Remove the whitespace margin shared by every non-blank line
///
/// Blank lines do not take part in the margin and come back empty.
#[must_use]
pub fn dedent(lines: &[&str]) -> Vec<String> {
    let margin = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| &l[..l.len() - l.trim_start_matches([' ', '\t']).len()])
        .reduce(common_prefix)
        .unwrap_or("");

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.strip_prefix(margin).unwrap_or(l).to_string()
            }
        })
        .collect()
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map_or(0, |((i, c), _)| i + c.len_utf8());
    &a[..len]
}

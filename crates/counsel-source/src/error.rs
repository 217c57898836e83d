//! Error types for source reconstruction
//!
//! Every variant means "the excerpt could not be built". Callers treat
//! these as a missing `Source:` section, never as a verdict on the
//! assertion that triggered the lookup.

use std::path::PathBuf;

/// Errors while locating and rendering a source statement
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Source file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Path as resolved on disk
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// tree-sitter rejected the Rust grammar
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// tree-sitter produced no tree
    #[error("parse failed")]
    ParseFailed,

    /// Requested line is not part of the file
    #[error("line {line} is outside the source ({line_count} lines)")]
    LineOutOfRange {
        /// Requested 1-based line
        line: usize,
        /// Number of lines in the source
        line_count: usize,
    },

    /// No statement starts on or spans the requested line
    #[error("no statement encloses line {line}")]
    StatementNotFound {
        /// Requested 1-based line
        line: usize,
    },
}

impl SourceError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for reconstruction
pub type SourceResult<T> = Result<T, SourceError>;

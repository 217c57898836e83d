//! Counsel Source Reconstruction
//!
//! Turns a `(file, line)` pair reported by a failing assertion into the
//! complete Rust statement that line belongs to.
//!
//! # Overview
//!
//! - **SourceCache**: per-process cache of source text, keyed by path
//! - **Statement lookup**: tree-sitter-rust walk that maps a line to its
//!   enclosing statement
//! - **SourceExcerpt**: dedented, line-numbered rendering with the
//!   statement's first line marked by `>`
//!
//! # Example
//!
//! ```rust
//! use counsel_source::{reconstruct_source, Window};
//!
//! let source = "fn f() {\n    let total = add(\n        1,\n        2,\n    );\n}\n";
//! let excerpt = reconstruct_source(source, 4, Window::default()).unwrap();
//!
//! assert_eq!(excerpt.statement().start_line, 2);
//! assert!(excerpt.lines().iter().any(|l| l.marked && l.number == 2));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod error;
pub mod excerpt;
pub mod statement;

// Re-exports for convenience
pub use cache::{reconstruct, resolve_path, SourceCache};
pub use error::{SourceError, SourceResult};
pub use excerpt::{dedent, reconstruct_source, ExcerptLine, SourceExcerpt, Window};
pub use statement::{enclosing_statement, locate_statement, parse_rust, StatementSpan};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Testing utilities for the Counsel workspace
//!
//! Shared fixtures: on-disk Rust sources, sample statements with known
//! line layouts, and tracing setup.

#![allow(missing_docs)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Once;
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process
///
/// Honors `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Temporary `.rs` file that lives as long as the fixture
pub struct SourceFixture {
    file: NamedTempFile,
}

impl SourceFixture {
    pub fn new(source: &str) -> Self {
        Self::with_suffix(source, ".rs")
    }

    pub fn with_suffix(source: &str, suffix: &str) -> Self {
        let mut file = tempfile::Builder::new()
            .prefix("counsel-fixture-")
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(source.as_bytes()).unwrap();
        file.flush().unwrap();
        Self { file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn overwrite(&self, source: &str) {
        fs::write(self.file.path(), source).unwrap();
    }
}

/// Test body whose `check(...)` call spans lines 10 to 13
pub const SPANNING_STATEMENT: &str = "\
fn helper() -> u32 {
    1
}

#[test]
fn test_totals() {
    let a = 1;
    let b = 2;
    let c = 3;
    check(
        a,
        b,
        c);
    let d = 4;
    let e = 5;
}
";

/// First line of the spanning statement in [`SPANNING_STATEMENT`]
pub const SPANNING_START: usize = 10;

/// Last line of the spanning statement in [`SPANNING_STATEMENT`]
pub const SPANNING_END: usize = 13;

/// Source whose only content after line 1 is a multi-line string
pub const MULTI_LINE_STRING: &str = "\
fn test_text() {
    let s = \"first
second
third\";
    s.len();
}
";

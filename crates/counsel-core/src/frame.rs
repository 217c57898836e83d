//! The test frame a failure belongs to
//!
//! Holds everything captured synchronously at the assertion call: the
//! caller's source location (through `#[track_caller]`), the explicitly
//! captured locals and the name of the running test.

use crate::locals::LocalsSnapshot;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::thread;

/// Where an assertion was called from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file as recorded by rustc
    pub file: String,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl SourceLocation {
    /// Create location
    #[inline]
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location of the outermost `#[track_caller]` call site
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    /// File as a path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        Path::new(&self.file)
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Locals, location and test name of one failing assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFrame {
    locals: LocalsSnapshot,
    location: SourceLocation,
    test_name: Option<String>,
}

impl TestFrame {
    /// Create frame with an explicit test name
    #[inline]
    #[must_use]
    pub fn new(locals: LocalsSnapshot, location: SourceLocation, test_name: Option<String>) -> Self {
        Self {
            locals,
            location,
            test_name,
        }
    }

    /// Capture a frame at the caller's location on the current thread
    #[must_use]
    #[track_caller]
    pub fn capture(locals: LocalsSnapshot) -> Self {
        Self::new(locals, SourceLocation::caller(), current_test_name())
    }

    /// Captured locals
    #[inline]
    #[must_use]
    pub fn locals(&self) -> &LocalsSnapshot {
        &self.locals
    }

    /// Assertion call site
    #[inline]
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Running test, when known
    #[inline]
    #[must_use]
    pub fn test_name(&self) -> Option<&str> {
        self.test_name.as_deref()
    }
}

/// Name of the running test
///
/// libtest runs each test on a thread named after the test's path. Tests
/// run on the main thread (a single test thread, or outside libtest) have
/// no name.
#[must_use]
pub fn current_test_name() -> Option<String> {
    thread::current()
        .name()
        .filter(|name| *name != "main")
        .map(str::to_string)
}

//! Counsel Core
//!
//! Assertions whose failures explain themselves. Each assertion carries
//! an annotation: a `message` saying what went wrong and `advice` saying
//! what to do about it, both templates over locals captured by the test.
//! A failed assertion reports:
//!
//! ```text
//! 5 != 6
//!
//! x was 5
//!
//! Source:
//!  >   12 tc.with_locals(locals!(x))
//!      13     .assert_equal(x, 6, ("x was {x}", "expected six"))?;
//! Locals:
//!     x=5
//! Advice:
//!     expected six
//! ```
//!
//! # Overview
//!
//! - **Annotation**: normalization of pairs, sequences, maps and JSON
//! - **LocalsSnapshot**: values captured with [`locals!`]
//! - **AnnotatedFailure**: expanded, wrapped, lazily rendered report
//! - **AnnotatedAssertions**: the assertion surface, every method
//!   validating its annotation before the check runs
//!
//! # Example
//!
//! ```rust
//! use counsel_core::prelude::*;
//!
//! fn totals() -> Result<(), AssertionError> {
//!     let tc = AnnotatedTestCase::new();
//!     let total = 2 + 2;
//!     tc.with_locals(locals!(total)).assert_equal(
//!         total,
//!         4,
//!         message("total was {total}").advice("check the adder"),
//!     )?;
//!     Ok(())
//! }
//!
//! assert!(totals().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod annotation;
pub mod checks;
pub mod config;
pub mod error;
pub mod failure;
pub mod frame;
pub mod intercept;
pub mod locals;
pub mod template;
pub mod wrap;

// Re-exports for convenience
pub use annotation::{normalize, validate, Annotation, AnnotationMap, RawAnnotation, REQUIRED_KEYS};
pub use checks::Verdict;
pub use config::ReportConfig;
pub use error::{AnnotationError, AssertResult, AssertionError, ConfigError, TemplateError};
pub use failure::AnnotatedFailure;
pub use frame::{current_test_name, SourceLocation, TestFrame};
pub use intercept::{advice, message, AnnotatedAssertions, AnnotatedTestCase, AnnotationArgs, WithLocals};
pub use locals::LocalsSnapshot;

/// Everything a test module needs
pub mod prelude {
    pub use crate::intercept::{advice, message, AnnotatedAssertions, AnnotatedTestCase, AnnotationArgs};
    pub use crate::{locals, AssertResult, AssertionError, LocalsSnapshot, ReportConfig};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

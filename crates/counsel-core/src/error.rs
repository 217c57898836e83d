//! Error types for annotated assertions
//!
//! Provides error handling for:
//! - Annotation authoring mistakes (wrong shape, missing keys)
//! - Message/advice templates that reference unknown locals
//! - Report configuration loading
//! - The enriched assertion failure itself

use crate::failure::AnnotatedFailure;
use std::fmt;
use std::path::PathBuf;

/// Annotation supplied with an assertion call is unusable
///
/// Raised before the assertion's check runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    /// Neither an ordered sequence nor a mapping
    #[error("annotation type not supported: {type_name}")]
    UnsupportedShape {
        /// Name of the rejected type
        type_name: String,
    },

    /// Required keys absent after normalization
    #[error("annotation missing required fields: {}", .missing.join(", "))]
    MissingKeys {
        /// Every missing key, in required-key order
        missing: Vec<&'static str>,
    },
}

/// Message or advice template could not be expanded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Placeholder names a local that was not captured
    #[error("template references undefined local '{name}': {template}")]
    UndefinedName {
        /// Placeholder name
        name: String,
        /// Template being expanded
        template: String,
    },

    /// Unbalanced brace or invalid placeholder
    #[error("malformed template at byte {position} ({reason}): {template}")]
    Malformed {
        /// Template being expanded
        template: String,
        /// Byte offset of the offending brace
        position: usize,
        /// What is wrong
        reason: &'static str,
    },
}

/// Report configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML or field types
    #[error("invalid report config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Outcome of an annotated assertion that did not pass
///
/// `Debug` prints the same text as `Display`, so a test returning
/// `Result<(), AssertionError>` shows the full report when it fails.
#[derive(thiserror::Error)]
pub enum AssertionError {
    /// Malformed annotation; the check never ran
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    /// Check failed but the report could not be expanded
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Check failed
    #[error("{0}")]
    Failed(Box<AnnotatedFailure>),
}

impl AssertionError {
    /// Enriched failure, if the check ran and failed
    #[inline]
    #[must_use]
    pub fn failure(&self) -> Option<&AnnotatedFailure> {
        match self {
            Self::Failed(failure) => Some(&**failure),
            _ => None,
        }
    }

    /// Check if the error is a test-authoring mistake rather than a
    /// failed check
    #[inline]
    #[must_use]
    pub fn is_authoring_error(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

impl From<AnnotatedFailure> for AssertionError {
    fn from(failure: AnnotatedFailure) -> Self {
        Self::Failed(Box::new(failure))
    }
}

impl fmt::Debug for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Result of an annotated assertion
pub type AssertResult = Result<(), AssertionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_listed_together() {
        let err = AnnotationError::MissingKeys {
            missing: vec!["message", "advice"],
        };
        assert_eq!(
            err.to_string(),
            "annotation missing required fields: message, advice"
        );
    }

    #[test]
    fn unsupported_shape_names_type() {
        let err = AnnotationError::UnsupportedShape {
            type_name: "&str".to_string(),
        };
        assert_eq!(err.to_string(), "annotation type not supported: &str");
    }

    #[test]
    fn authoring_errors_are_classified() {
        let err: AssertionError = AnnotationError::MissingKeys {
            missing: vec!["advice"],
        }
        .into();
        assert!(err.is_authoring_error());
        assert!(err.failure().is_none());

        let err: AssertionError = TemplateError::UndefinedName {
            name: "x".to_string(),
            template: "{x}".to_string(),
        }
        .into();
        assert!(err.is_authoring_error());
    }

    #[test]
    fn debug_matches_display() {
        let err: AssertionError = AnnotationError::MissingKeys {
            missing: vec!["advice"],
        }
        .into();
        assert_eq!(format!("{err:?}"), err.to_string());
    }
}

//! Report configuration
//!
//! Widths, excerpt window and locals filtering for rendered failures.
//! Defaults reproduce the standard report layout; a TOML file can
//! override any subset of fields.

use crate::error::ConfigError;
use counsel_source::Window;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Rendering options for [`AnnotatedFailure`](crate::AnnotatedFailure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Wrap width for the expanded message
    pub message_width: usize,
    /// Wrap width for the expanded advice
    pub advice_width: usize,
    /// Source lines shown before the failing statement
    pub leading_lines: usize,
    /// Source lines shown after the failing line
    pub following_lines: usize,
    /// Locals never listed in the `Locals:` section
    pub reserved_locals: Vec<String>,
    /// Hide locals whose name starts with `_`
    pub hide_underscored: bool,
    /// Reconstruct the failing statement at all
    pub source_excerpts: bool,
}

impl ReportConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With message and advice wrap widths
    #[inline]
    #[must_use]
    pub fn with_widths(mut self, message_width: usize, advice_width: usize) -> Self {
        self.message_width = message_width;
        self.advice_width = advice_width;
        self
    }

    /// With source excerpt window
    #[inline]
    #[must_use]
    pub fn with_window(mut self, leading: usize, following: usize) -> Self {
        self.leading_lines = leading;
        self.following_lines = following;
        self
    }

    /// With an extra reserved local name
    #[inline]
    #[must_use]
    pub fn with_reserved(mut self, name: impl Into<String>) -> Self {
        self.reserved_locals.push(name.into());
        self
    }

    /// With source excerpts enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_source_excerpts(mut self, enabled: bool) -> Self {
        self.source_excerpts = enabled;
        self
    }

    /// Excerpt window for the source reconstructor
    #[inline]
    #[must_use]
    pub fn window(&self) -> Window {
        Window::new(self.leading_lines, self.following_lines)
    }

    /// Check whether a local is shown in the `Locals:` section
    #[must_use]
    pub fn shows_local(&self, name: &str) -> bool {
        !(self.reserved_locals.iter().any(|r| r == name)
            || (self.hide_underscored && name.starts_with('_')))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML for this type
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            message_width: 74,
            advice_width: 64,
            leading_lines: 1,
            following_lines: 2,
            reserved_locals: vec!["message".into(), "advice".into(), "self".into()],
            hide_underscored: true,
            source_excerpts: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_test_utils::SourceFixture;

    #[test]
    fn defaults() {
        let config = ReportConfig::new();
        assert_eq!(config.message_width, 74);
        assert_eq!(config.advice_width, 64);
        assert_eq!(config.window(), Window::new(1, 2));
        assert!(config.source_excerpts);
    }

    #[test]
    fn reserved_and_underscored_locals_hidden() {
        let config = ReportConfig::new();
        assert!(!config.shows_local("message"));
        assert!(!config.shows_local("advice"));
        assert!(!config.shows_local("self"));
        assert!(!config.shows_local("_guard"));
        assert!(config.shows_local("total"));

        let config = ReportConfig {
            hide_underscored: false,
            ..ReportConfig::new()
        };
        assert!(config.shows_local("_guard"));
    }

    #[test]
    fn builders() {
        let config = ReportConfig::new()
            .with_widths(40, 30)
            .with_window(0, 0)
            .with_reserved("tc")
            .with_source_excerpts(false);
        assert_eq!(config.message_width, 40);
        assert_eq!(config.advice_width, 30);
        assert_eq!(config.window(), Window::new(0, 0));
        assert!(!config.shows_local("tc"));
        assert!(!config.source_excerpts);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ReportConfig::from_toml_str("message_width = 50\nsource_excerpts = false\n").unwrap();
        assert_eq!(config.message_width, 50);
        assert_eq!(config.advice_width, 64);
        assert!(!config.source_excerpts);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = ReportConfig::from_toml_str("message_width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let fixture = SourceFixture::with_suffix(
            "leading_lines = 3\nreserved_locals = [\"tc\"]\n",
            ".toml",
        );
        let config = ReportConfig::load(fixture.path()).unwrap();
        assert_eq!(config.leading_lines, 3);
        assert_eq!(config.reserved_locals, vec!["tc".to_string()]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ReportConfig::load(Path::new("/nonexistent/counsel.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

//! The enriched failure of an annotated assertion
//!
//! Templates are expanded and wrapped when the failure is built, so an
//! authoring mistake in a template surfaces as soon as the check fails.
//! The source excerpt and the full report are rendered on first access
//! and memoized.

use crate::annotation::Annotation;
use crate::config::ReportConfig;
use crate::error::TemplateError;
use crate::frame::{SourceLocation, TestFrame};
use crate::locals::LocalsSnapshot;
use crate::template::expand;
use crate::wrap::wrap;
use once_cell::sync::OnceCell;
use std::fmt;

/// A failed check with its annotation, locals and source context
pub struct AnnotatedFailure {
    annotation: Annotation,
    standard_message: String,
    frame: TestFrame,
    config: ReportConfig,
    excerpt: OnceCell<Result<String, String>>,
    report: OnceCell<String>,
}

impl AnnotatedFailure {
    /// Build a failure from the annotation templates and the check's
    /// standard message
    ///
    /// # Errors
    /// Returns error if the message or advice template cannot be expanded
    /// against the frame's locals
    pub fn new(
        annotation: Annotation,
        standard_message: impl Into<String>,
        frame: TestFrame,
        config: &ReportConfig,
    ) -> Result<Self, TemplateError> {
        let message = expand(&annotation.message, frame.locals())?;
        let advice = expand(&annotation.advice, frame.locals())?;

        tracing::debug!(
            "Annotated assertion failed at {} in {}",
            frame.location(),
            frame.test_name().unwrap_or("<unknown test>")
        );

        Ok(Self {
            annotation: Annotation::new(
                wrap_message(&message, config.message_width),
                wrap_advice(&advice, config.advice_width),
            ),
            standard_message: standard_message.into(),
            frame,
            config: config.clone(),
            excerpt: OnceCell::new(),
            report: OnceCell::new(),
        })
    }

    /// Expanded and wrapped message and advice
    #[inline]
    #[must_use]
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Description produced by the failed check
    #[inline]
    #[must_use]
    pub fn standard_message(&self) -> &str {
        &self.standard_message
    }

    /// Every captured local, hidden ones included
    #[inline]
    #[must_use]
    pub fn locals(&self) -> &LocalsSnapshot {
        self.frame.locals()
    }

    /// Assertion call site
    #[inline]
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        self.frame.location()
    }

    /// Source file of the call site
    #[inline]
    #[must_use]
    pub fn file(&self) -> &str {
        &self.frame.location().file
    }

    /// Line of the call site
    #[inline]
    #[must_use]
    pub fn line(&self) -> u32 {
        self.frame.location().line
    }

    /// Test the assertion ran in, when known
    #[inline]
    #[must_use]
    pub fn test_name(&self) -> Option<&str> {
        self.frame.test_name()
    }

    /// Rendering options the failure was built with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Rendered statement around the call site
    ///
    /// # Errors
    /// Returns the reason the statement could not be reconstructed
    pub fn source_excerpt(&self) -> Result<&str, &str> {
        match self.excerpt.get_or_init(|| self.render_excerpt()) {
            Ok(text) => Ok(text.as_str()),
            Err(reason) => Err(reason.as_str()),
        }
    }

    /// Full report text
    pub fn report(&self) -> &str {
        self.report.get_or_init(|| self.render_report())
    }

    /// Locals listed in the report, as `name=value`
    pub fn shown_locals(&self) -> impl Iterator<Item = String> + '_ {
        self.frame
            .locals()
            .iter()
            .filter(|(name, _)| self.config.shows_local(name))
            .map(|(name, value)| format!("{name}={value}"))
    }

    fn render_excerpt(&self) -> Result<String, String> {
        if !self.config.source_excerpts {
            return Err("source excerpts disabled".to_string());
        }

        let location = self.frame.location();
        let line = usize::try_from(location.line).map_err(|e| e.to_string())?;
        counsel_source::reconstruct(location.path(), line, self.config.window())
            .map(|excerpt| excerpt.to_string())
            .map_err(|e| {
                tracing::warn!("Source reconstruction failed at {}: {}", location, e);
                e.to_string()
            })
    }

    fn render_report(&self) -> String {
        let source = match self.source_excerpt() {
            Ok(text) => text.to_string(),
            Err(reason) => format!("  <source unavailable: {reason}>"),
        };
        let locals = self.shown_locals().collect::<Vec<_>>().join("\n\t");

        format!(
            "{}\n\n{}\n\nSource:\n{}\nLocals:\n\t{}\nAdvice:\n\t{}",
            self.standard_message, self.annotation.message, source, locals, self.annotation.advice,
        )
    }
}

impl fmt::Display for AnnotatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.report())
    }
}

impl fmt::Debug for AnnotatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedFailure")
            .field("standard_message", &self.standard_message)
            .field("annotation", &self.annotation)
            .field("location", self.frame.location())
            .field("test_name", &self.frame.test_name())
            .finish_non_exhaustive()
    }
}

/// Wrap an expanded message, lines joined with newlines
#[must_use]
pub fn wrap_message(text: &str, width: usize) -> String {
    wrap(text, width).join("\n")
}

/// Wrap expanded advice, continuation lines indented by a tab
#[must_use]
pub fn wrap_advice(text: &str, width: usize) -> String {
    wrap(text, width).join("\n\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_test_utils::{SourceFixture, SPANNING_END, SPANNING_STATEMENT};
    use pretty_assertions::assert_eq;

    fn frame_at(file: &str, line: usize, locals: LocalsSnapshot) -> TestFrame {
        let line = u32::try_from(line).unwrap();
        TestFrame::new(locals, SourceLocation::new(file, line, 5), Some("suite::test_totals".into()))
    }

    #[test]
    fn renders_full_report() {
        let fixture = SourceFixture::new(SPANNING_STATEMENT);
        let locals = LocalsSnapshot::new()
            .with("x", "5")
            .with("_scratch", "9")
            .with("message", "m")
            .with("y", "7");
        let frame = frame_at(&fixture.path().to_string_lossy(), SPANNING_END, locals);

        let failure = AnnotatedFailure::new(
            Annotation::new("x was {x}", "check x against {y}"),
            "5 != 7",
            frame,
            &ReportConfig::new(),
        )
        .unwrap();

        let expected = "\
5 != 7

x was 5

Source:
      9 let c = 3;
 >   10 check(
     11     a,
     12     b,
     13     c);
     14 let d = 4;
     15 let e = 5;
Locals:
\tx=5
\ty=7
Advice:
\tcheck x against 7";
        assert_eq!(failure.report(), expected);
        assert_eq!(failure.to_string(), expected);
    }

    #[test]
    fn missing_source_is_marked_not_fatal() {
        let frame = frame_at("/nonexistent/counsel/test.rs", 3, LocalsSnapshot::new());
        let failure =
            AnnotatedFailure::new(Annotation::new("m", "a"), "false is not true", frame, &ReportConfig::new())
                .unwrap();

        assert!(failure.source_excerpt().is_err());
        assert!(failure.report().starts_with("false is not true\n\nm\n\nSource:\n  <source unavailable: "));
        assert!(failure.report().ends_with("Locals:\n\t\nAdvice:\n\ta"));
    }

    #[test]
    fn disabled_excerpts_skip_reconstruction() {
        let fixture = SourceFixture::new(SPANNING_STATEMENT);
        let frame = frame_at(&fixture.path().to_string_lossy(), SPANNING_END, LocalsSnapshot::new());
        let config = ReportConfig::new().with_source_excerpts(false);
        let failure = AnnotatedFailure::new(Annotation::new("m", "a"), "s", frame, &config).unwrap();

        assert_eq!(failure.source_excerpt(), Err("source excerpts disabled"));
    }

    #[test]
    fn template_error_propagates() {
        let frame = frame_at("t.rs", 1, LocalsSnapshot::new().with("x", "1"));
        let err = AnnotatedFailure::new(Annotation::new("{x}", "{missing}"), "s", frame, &ReportConfig::new())
            .unwrap_err();
        assert!(matches!(err, TemplateError::UndefinedName { ref name, .. } if name == "missing"));
    }

    #[test]
    fn wraps_message_and_advice() {
        let frame = frame_at("t.rs", 1, LocalsSnapshot::new());
        let config = ReportConfig::new().with_widths(10, 10);
        let failure = AnnotatedFailure::new(
            Annotation::new("one two three four", "five six seven eight"),
            "s",
            frame,
            &config,
        )
        .unwrap();

        assert_eq!(failure.annotation().message, "one two\nthree four");
        assert_eq!(failure.annotation().advice, "five six\n\tseven\n\teight");
    }

    #[test]
    fn report_is_memoized() {
        let fixture = SourceFixture::new(SPANNING_STATEMENT);
        let frame = frame_at(&fixture.path().to_string_lossy(), SPANNING_END, LocalsSnapshot::new());
        let failure = AnnotatedFailure::new(Annotation::new("m", "a"), "s", frame, &ReportConfig::new()).unwrap();

        let first = failure.report().to_string();
        fixture.overwrite("fn other() {}\n");
        assert_eq!(failure.report(), first);
        assert!(std::ptr::eq(failure.report(), failure.report()));
    }

    #[test]
    fn accessors_mirror_frame() {
        let frame = frame_at("tests/a.rs", 12, LocalsSnapshot::new().with("x", "1"));
        let failure = AnnotatedFailure::new(Annotation::new("m", "a"), "s", frame, &ReportConfig::new()).unwrap();

        assert_eq!(failure.file(), "tests/a.rs");
        assert_eq!(failure.line(), 12);
        assert_eq!(failure.test_name(), Some("suite::test_totals"));
        assert_eq!(failure.standard_message(), "s");
        assert_eq!(failure.locals().get("x"), Some("1"));
    }
}

//! Annotated assertion surface
//!
//! Every assertion takes its annotation through [`AnnotationArgs`] and
//! funnels through [`AnnotatedAssertions::intercept`], which normalizes
//! and validates the annotation before the check runs and builds the
//! [`AnnotatedFailure`] when it fails.
//!
//! An annotation can arrive three ways in one call:
//! - `message`/`advice` keywords, built with [`message`] and [`advice`]
//! - a legacy `msg` annotation, built with [`AnnotationArgs::msg`]
//! - a trailing positional annotation: a pair, sequence, map or JSON value
//!
//! Keywords win over `msg`, which wins over the positional annotation.
//! When either keyword is given, both are taken together and the
//! positional annotation is ignored, even if a keyword is missing.

use crate::annotation::{normalize, validate, Annotation, AnnotationMap, RawAnnotation};
use crate::checks::{self, Verdict, DEFAULT_PLACES};
use crate::config::ReportConfig;
use crate::error::{AnnotationError, AssertResult};
use crate::failure::AnnotatedFailure;
use crate::frame::TestFrame;
use crate::locals::LocalsSnapshot;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::BuildHasher;

/// Annotation channels of a single assertion call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationArgs {
    positional: Option<RawAnnotation>,
    msg: Option<RawAnnotation>,
    message: Option<String>,
    advice: Option<String>,
}

impl AnnotationArgs {
    /// Create args with no annotation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Args carrying a positional annotation
    #[inline]
    #[must_use]
    pub fn positional(raw: impl Into<RawAnnotation>) -> Self {
        Self {
            positional: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Args carrying a legacy `msg` annotation
    #[inline]
    #[must_use]
    pub fn msg(raw: impl Into<RawAnnotation>) -> Self {
        Self::new().with_msg(raw)
    }

    /// With a legacy `msg` annotation
    #[inline]
    #[must_use]
    pub fn with_msg(mut self, raw: impl Into<RawAnnotation>) -> Self {
        self.msg = Some(raw.into());
        self
    }

    /// With a positional annotation
    #[inline]
    #[must_use]
    pub fn with_positional(mut self, raw: impl Into<RawAnnotation>) -> Self {
        self.positional = Some(raw.into());
        self
    }

    /// With the `message` keyword
    #[inline]
    #[must_use]
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.message = Some(text.into());
        self
    }

    /// With the `advice` keyword
    #[inline]
    #[must_use]
    pub fn advice(mut self, text: impl Into<String>) -> Self {
        self.advice = Some(text.into());
        self
    }

    /// Check if either keyword was given
    #[inline]
    #[must_use]
    pub fn has_keywords(&self) -> bool {
        self.message.is_some() || self.advice.is_some()
    }

    /// Pick the winning channel, normalize it and validate the result
    ///
    /// # Errors
    /// Returns error if the winning annotation has an unsupported shape or
    /// lacks a required key. No annotation at all lacks both keys.
    pub fn into_annotation(self) -> Result<Annotation, AnnotationError> {
        let map = if self.has_keywords() {
            let mut bundle = AnnotationMap::new();
            if let Some(message) = self.message {
                bundle.insert("message".to_string(), message);
            }
            if let Some(advice) = self.advice {
                bundle.insert("advice".to_string(), advice);
            }
            normalize(RawAnnotation::Mapping(bundle))?
        } else if let Some(raw) = self.msg.or(self.positional) {
            normalize(raw)?
        } else {
            AnnotationMap::new()
        };

        validate(&map)?;
        Annotation::from_map(map)
    }
}

/// Args carrying only the `message` keyword
#[inline]
#[must_use]
pub fn message(text: impl Into<String>) -> AnnotationArgs {
    AnnotationArgs::new().message(text)
}

/// Args carrying only the `advice` keyword
#[inline]
#[must_use]
pub fn advice(text: impl Into<String>) -> AnnotationArgs {
    AnnotationArgs::new().advice(text)
}

impl From<RawAnnotation> for AnnotationArgs {
    fn from(raw: RawAnnotation) -> Self {
        Self::positional(raw)
    }
}

impl From<Annotation> for AnnotationArgs {
    fn from(annotation: Annotation) -> Self {
        Self::positional(annotation)
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for AnnotationArgs {
    fn from(pair: (A, B)) -> Self {
        Self::positional(pair)
    }
}

impl<S: Into<String>> From<Vec<S>> for AnnotationArgs {
    fn from(items: Vec<S>) -> Self {
        Self::positional(items)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for AnnotationArgs {
    fn from(items: [S; N]) -> Self {
        Self::positional(items)
    }
}

impl<S: AsRef<str>> From<&[S]> for AnnotationArgs {
    fn from(items: &[S]) -> Self {
        Self::positional(items)
    }
}

impl<K: Into<String>, V: Into<String>, H: BuildHasher> From<HashMap<K, V, H>> for AnnotationArgs {
    fn from(map: HashMap<K, V, H>) -> Self {
        Self::positional(map)
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for AnnotationArgs {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::positional(map)
    }
}

impl<K: Into<String>, V: Into<String>, H> From<IndexMap<K, V, H>> for AnnotationArgs {
    fn from(map: IndexMap<K, V, H>) -> Self {
        Self::positional(map)
    }
}

impl From<Value> for AnnotationArgs {
    fn from(value: Value) -> Self {
        Self::positional(value)
    }
}

impl From<&str> for AnnotationArgs {
    fn from(text: &str) -> Self {
        Self::positional(text)
    }
}

impl From<String> for AnnotationArgs {
    fn from(text: String) -> Self {
        Self::positional(text)
    }
}

/// Assertions whose failures carry an annotated report
///
/// Implementors supply the report configuration and the captured locals;
/// every assertion is provided and runs through [`intercept`].
///
/// [`intercept`]: AnnotatedAssertions::intercept
pub trait AnnotatedAssertions {
    /// Rendering options for failures
    fn report_config(&self) -> &ReportConfig;

    /// Locals attached to the next failure
    fn captured_locals(&self) -> &LocalsSnapshot;

    /// Validate the annotation, run `check`, and enrich its failure
    ///
    /// The annotation is validated before `check` is called.
    ///
    /// # Errors
    /// Returns [`AssertionError::Annotation`] for an unusable annotation,
    /// [`AssertionError::Template`] if the failed check's report cannot be
    /// expanded and [`AssertionError::Failed`] if the check fails
    ///
    /// [`AssertionError::Annotation`]: crate::AssertionError::Annotation
    /// [`AssertionError::Template`]: crate::AssertionError::Template
    /// [`AssertionError::Failed`]: crate::AssertionError::Failed
    #[track_caller]
    fn intercept<F>(&self, args: impl Into<AnnotationArgs>, check: F) -> AssertResult
    where
        F: FnOnce() -> Verdict,
    {
        let annotation = args.into().into_annotation()?;

        match check() {
            Ok(()) => Ok(()),
            Err(standard_message) => {
                let frame = TestFrame::capture(self.captured_locals().clone());
                let failure =
                    AnnotatedFailure::new(annotation, standard_message, frame, self.report_config())?;
                Err(failure.into())
            }
        }
    }

    /// Fail with the verdict of an arbitrary check
    #[track_caller]
    fn assert_that<F>(&self, check: F, args: impl Into<AnnotationArgs>) -> AssertResult
    where
        F: FnOnce() -> Verdict,
    {
        self.intercept(args, check)
    }

    /// Assert `value` is true
    #[track_caller]
    fn assert_true(&self, value: bool, args: impl Into<AnnotationArgs>) -> AssertResult {
        self.intercept(args, || checks::is_true(value))
    }

    /// Assert `value` is false
    #[track_caller]
    fn assert_false(&self, value: bool, args: impl Into<AnnotationArgs>) -> AssertResult {
        self.intercept(args, || checks::is_false(value))
    }

    /// Assert `first == second`
    #[track_caller]
    fn assert_equal<T, U>(&self, first: T, second: U, args: impl Into<AnnotationArgs>) -> AssertResult
    where
        T: PartialEq<U> + Debug,
        U: Debug,
    {
        self.intercept(args, || checks::equal(first, second))
    }

    /// Assert `first != second`
    #[track_caller]
    fn assert_not_equal<T, U>(&self, first: T, second: U, args: impl Into<AnnotationArgs>) -> AssertResult
    where
        T: PartialEq<U> + Debug,
        U: Debug,
    {
        self.intercept(args, || checks::not_equal(first, second))
    }

    /// Assert `value` is `Some`
    #[track_caller]
    fn assert_some<T>(&self, value: &Option<T>, args: impl Into<AnnotationArgs>) -> AssertResult {
        self.intercept(args, || checks::is_some(value))
    }

    /// Assert `value` is `None`
    #[track_caller]
    fn assert_none<T: Debug>(&self, value: &Option<T>, args: impl Into<AnnotationArgs>) -> AssertResult {
        self.intercept(args, || checks::is_none(value))
    }

    /// Assert `value` is `Ok`
    #[track_caller]
    fn assert_ok<T, E: Debug>(&self, value: &Result<T, E>, args: impl Into<AnnotationArgs>) -> AssertResult {
        self.intercept(args, || checks::is_ok(value))
    }

    /// Assert `value` is `Err`
    #[track_caller]
    fn assert_err<T: Debug, E>(&self, value: &Result<T, E>, args: impl Into<AnnotationArgs>) -> AssertResult {
        self.intercept(args, || checks::is_err(value))
    }

    /// Assert `needle` occurs in `haystack`
    #[track_caller]
    fn assert_contains(&self, haystack: &str, needle: &str, args: impl Into<AnnotationArgs>) -> AssertResult {
        self.intercept(args, || checks::contains(haystack, needle))
    }

    /// Assert `member` is an element of `container`
    #[track_caller]
    fn assert_in<T: PartialEq + Debug>(
        &self,
        member: &T,
        container: &[T],
        args: impl Into<AnnotationArgs>,
    ) -> AssertResult {
        self.intercept(args, || checks::is_in(member, container))
    }

    /// Assert `member` is not an element of `container`
    #[track_caller]
    fn assert_not_in<T: PartialEq + Debug>(
        &self,
        member: &T,
        container: &[T],
        args: impl Into<AnnotationArgs>,
    ) -> AssertResult {
        self.intercept(args, || checks::not_in(member, container))
    }

    /// Assert `first > second`
    #[track_caller]
    fn assert_greater<T, U>(&self, first: T, second: U, args: impl Into<AnnotationArgs>) -> AssertResult
    where
        T: PartialOrd<U> + Debug,
        U: Debug,
    {
        self.intercept(args, || checks::greater(first, second))
    }

    /// Assert `first >= second`
    #[track_caller]
    fn assert_greater_equal<T, U>(&self, first: T, second: U, args: impl Into<AnnotationArgs>) -> AssertResult
    where
        T: PartialOrd<U> + Debug,
        U: Debug,
    {
        self.intercept(args, || checks::greater_equal(first, second))
    }

    /// Assert `first < second`
    #[track_caller]
    fn assert_less<T, U>(&self, first: T, second: U, args: impl Into<AnnotationArgs>) -> AssertResult
    where
        T: PartialOrd<U> + Debug,
        U: Debug,
    {
        self.intercept(args, || checks::less(first, second))
    }

    /// Assert `first <= second`
    #[track_caller]
    fn assert_less_equal<T, U>(&self, first: T, second: U, args: impl Into<AnnotationArgs>) -> AssertResult
    where
        T: PartialOrd<U> + Debug,
        U: Debug,
    {
        self.intercept(args, || checks::less_equal(first, second))
    }

    /// Assert `first` and `second` agree to seven decimal places
    #[track_caller]
    fn assert_almost_equal(&self, first: f64, second: f64, args: impl Into<AnnotationArgs>) -> AssertResult {
        self.assert_almost_equal_places(first, second, DEFAULT_PLACES, args)
    }

    /// Assert `first` and `second` agree to `places` decimal places
    #[track_caller]
    fn assert_almost_equal_places(
        &self,
        first: f64,
        second: f64,
        places: i32,
        args: impl Into<AnnotationArgs>,
    ) -> AssertResult {
        self.intercept(args, || checks::almost_equal(first, second, places))
    }

    /// Assert `pattern` matches somewhere in `text`
    #[track_caller]
    fn assert_matches(&self, text: &str, pattern: &Regex, args: impl Into<AnnotationArgs>) -> AssertResult {
        self.intercept(args, || checks::matches(text, pattern))
    }
}

static NO_LOCALS: Lazy<LocalsSnapshot> = Lazy::new(LocalsSnapshot::new);

/// Assertion surface for tests that capture no locals
#[derive(Debug, Clone, Default)]
pub struct AnnotatedTestCase {
    config: ReportConfig,
}

impl AnnotatedTestCase {
    /// Create test case with the default report layout
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create test case with custom rendering options
    #[inline]
    #[must_use]
    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Assertions that attach `locals` to their failures
    ///
    /// ```rust
    /// use counsel_core::prelude::*;
    ///
    /// let tc = AnnotatedTestCase::new();
    /// let x = 5;
    /// let err = tc
    ///     .with_locals(locals!(x))
    ///     .assert_equal(x, 6, ("x was {x}", "expected six"))
    ///     .unwrap_err();
    ///
    /// assert!(err.to_string().contains("x was 5"));
    /// ```
    #[inline]
    #[must_use]
    pub fn with_locals(&self, locals: LocalsSnapshot) -> WithLocals<'_> {
        WithLocals {
            config: &self.config,
            locals,
        }
    }
}

impl AnnotatedAssertions for AnnotatedTestCase {
    fn report_config(&self) -> &ReportConfig {
        &self.config
    }

    fn captured_locals(&self) -> &LocalsSnapshot {
        &NO_LOCALS
    }
}

/// Assertion surface bound to a locals snapshot
#[derive(Debug, Clone)]
pub struct WithLocals<'a> {
    config: &'a ReportConfig,
    locals: LocalsSnapshot,
}

impl AnnotatedAssertions for WithLocals<'_> {
    fn report_config(&self) -> &ReportConfig {
        self.config
    }

    fn captured_locals(&self) -> &LocalsSnapshot {
        &self.locals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssertionError;
    use std::cell::Cell;

    #[test]
    fn positional_pair() {
        let annotation = AnnotationArgs::from(("m", "a")).into_annotation().unwrap();
        assert_eq!(annotation, Annotation::new("m", "a"));
    }

    #[test]
    fn keywords_win_over_positional() {
        let args = AnnotationArgs::from(("pos m", "pos a")).message("kw m").advice("kw a");
        assert_eq!(args.into_annotation().unwrap(), Annotation::new("kw m", "kw a"));
    }

    #[test]
    fn single_keyword_takes_the_bundle() {
        let args = AnnotationArgs::from(("pos m", "pos a")).message("kw m");
        assert_eq!(
            args.into_annotation(),
            Err(AnnotationError::MissingKeys {
                missing: vec!["advice"]
            })
        );
    }

    #[test]
    fn msg_wins_over_positional() {
        let args = AnnotationArgs::msg(("msg m", "msg a")).with_positional(("pos m", "pos a"));
        assert_eq!(args.into_annotation().unwrap(), Annotation::new("msg m", "msg a"));
    }

    #[test]
    fn no_annotation_misses_both_keys() {
        assert_eq!(
            AnnotationArgs::new().into_annotation(),
            Err(AnnotationError::MissingKeys {
                missing: vec!["message", "advice"]
            })
        );
    }

    #[test]
    fn plain_string_rejected() {
        let err = AnnotationArgs::from("just text").into_annotation().unwrap_err();
        assert!(matches!(err, AnnotationError::UnsupportedShape { .. }));
    }

    #[test]
    fn invalid_annotation_skips_check() {
        let tc = AnnotatedTestCase::new();
        let calls = Cell::new(0);
        let result = tc.intercept(message("only a message"), || {
            calls.set(calls.get() + 1);
            Ok(())
        });

        assert!(matches!(result, Err(AssertionError::Annotation(_))));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn passing_check_is_ok() {
        let tc = AnnotatedTestCase::new();
        assert!(tc.assert_equal(1 + 1, 2, ("m", "a")).is_ok());
        assert!(tc.assert_in(&"b", &["a", "b"], message("m").advice("a")).is_ok());
    }

    #[test]
    fn failure_records_call_site() {
        let tc = AnnotatedTestCase::with_config(ReportConfig::new().with_source_excerpts(false));
        let line = line!() + 1;
        let err = tc.assert_true(false, ("m", "a")).unwrap_err();

        let failure = err.failure().unwrap();
        assert_eq!(failure.line(), line);
        assert!(failure.file().ends_with("intercept.rs"));
        assert_eq!(failure.standard_message(), "false is not true");
    }

    #[test]
    fn plain_test_case_reports_no_locals() {
        let tc = AnnotatedTestCase::new();
        assert!(tc.captured_locals().is_empty());

        let err = tc.assert_true(false, ("m", "a")).unwrap_err();
        assert!(err.failure().unwrap().locals().is_empty());
    }

    #[test]
    fn template_errors_surface_after_failed_check() {
        let tc = AnnotatedTestCase::new();
        let err = tc.assert_false(true, ("value {v}", "a")).unwrap_err();
        assert!(matches!(err, AssertionError::Template(_)));

        assert!(tc.assert_false(false, ("value {v}", "a")).is_ok());
    }
}

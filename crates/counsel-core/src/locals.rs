//! Captured test locals
//!
//! Rust offers no way to read a caller's variables after the fact, so
//! tests name the values a failure report may need with [`locals!`]. Each
//! value is rendered to an owned string at capture time: later mutation
//! of the original binding never shows up in a report.
//!
//! [`locals!`]: crate::locals!

use indexmap::IndexMap;

/// Ordered name → rendered value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalsSnapshot {
    values: IndexMap<String, String>,
}

impl LocalsSnapshot {
    /// Create empty snapshot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rendered value, replacing an earlier binding of `name`
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// With a rendered value
    #[inline]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Rendered value of `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Check if `name` was captured
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Captured pairs in capture order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Captured names in capture order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of captured values
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalsSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Capture named values into a [`LocalsSnapshot`]
///
/// Field syntax follows `tracing`:
///
/// - `x` or `?x` captures `x` with its `Debug` form
/// - `%x` captures `x` with its `Display` form
/// - `name = expr`, `name = ?expr`, `name = %expr` capture an expression
///
/// Without a sigil the `Debug` form is used, so a string local renders
/// quoted (`"five"`) in templates and the report. Use `%x` to render it
/// as plain text.
///
/// ```rust
/// use counsel_core::locals;
///
/// let expected = 5;
/// let actual = "five";
/// let snapshot = locals!(expected, %actual, total = expected * 2);
///
/// assert_eq!(snapshot.get("expected"), Some("5"));
/// assert_eq!(snapshot.get("actual"), Some("five"));
/// assert_eq!(locals!(actual).get("actual"), Some("\"five\""));
/// assert_eq!(snapshot.get("total"), Some("10"));
/// ```
#[macro_export]
macro_rules! locals {
    () => {
        $crate::LocalsSnapshot::new()
    };
    ($($fields:tt)+) => {{
        let mut snapshot = $crate::LocalsSnapshot::new();
        $crate::__capture_locals!(snapshot; $($fields)+);
        snapshot
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __capture_locals {
    ($s:ident;) => {};
    ($s:ident; % $name:ident $(, $($rest:tt)*)?) => {
        $s.insert(stringify!($name), format!("{}", $name));
        $( $crate::__capture_locals!($s; $($rest)*); )?
    };
    ($s:ident; ? $name:ident $(, $($rest:tt)*)?) => {
        $s.insert(stringify!($name), format!("{:?}", $name));
        $( $crate::__capture_locals!($s; $($rest)*); )?
    };
    ($s:ident; $name:ident = % $value:expr $(, $($rest:tt)*)?) => {
        $s.insert(stringify!($name), format!("{}", $value));
        $( $crate::__capture_locals!($s; $($rest)*); )?
    };
    ($s:ident; $name:ident = ? $value:expr $(, $($rest:tt)*)?) => {
        $s.insert(stringify!($name), format!("{:?}", $value));
        $( $crate::__capture_locals!($s; $($rest)*); )?
    };
    ($s:ident; $name:ident = $value:expr $(, $($rest:tt)*)?) => {
        $s.insert(stringify!($name), format!("{:?}", $value));
        $( $crate::__capture_locals!($s; $($rest)*); )?
    };
    ($s:ident; $name:ident $(, $($rest:tt)*)?) => {
        $s.insert(stringify!($name), format!("{:?}", $name));
        $( $crate::__capture_locals!($s; $($rest)*); )?
    };
}

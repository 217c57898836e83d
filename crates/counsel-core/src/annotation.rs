//! Annotation normalization
//!
//! Authors attach a message and some advice to every assertion. Both can
//! arrive in several shapes:
//! - an ordered pair or sequence: `("message", "advice")`
//! - a mapping: `{"message": ..., "advice": ...}`
//! - JSON loaded from elsewhere
//!
//! [`normalize`] turns any of them into one canonical mapping and
//! [`validate`] checks the required keys. Neither expands templates.

use crate::error::AnnotationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Keys every annotation must provide, in positional order
pub const REQUIRED_KEYS: [&str; 2] = ["message", "advice"];

/// Canonical annotation mapping
pub type AnnotationMap = IndexMap<String, String>;

/// Annotation exactly as the author supplied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAnnotation {
    /// Ordered values, zipped against [`REQUIRED_KEYS`]
    Sequence(Vec<String>),
    /// Key-value pairs, used as-is
    Mapping(AnnotationMap),
    /// Any other shape
    Unsupported {
        /// Name of the supplied type
        type_name: String,
    },
}

impl RawAnnotation {
    fn unsupported<T: ?Sized>() -> Self {
        Self::Unsupported {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }
}

/// Normalize a raw annotation into a mapping
///
/// # Errors
/// Returns [`AnnotationError::UnsupportedShape`] for anything that is
/// neither a sequence nor a mapping
pub fn normalize(raw: RawAnnotation) -> Result<AnnotationMap, AnnotationError> {
    match raw {
        RawAnnotation::Sequence(items) => Ok(REQUIRED_KEYS
            .iter()
            .map(|k| (*k).to_string())
            .zip(items)
            .collect()),
        RawAnnotation::Mapping(map) => Ok(map),
        RawAnnotation::Unsupported { type_name } => {
            Err(AnnotationError::UnsupportedShape { type_name })
        }
    }
}

/// Check that every required key is present
///
/// # Errors
/// Returns one [`AnnotationError::MissingKeys`] naming all missing keys
pub fn validate(map: &AnnotationMap) -> Result<(), AnnotationError> {
    let missing: Vec<&'static str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(*k))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnnotationError::MissingKeys { missing })
    }
}

/// Validated message and advice templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// What went wrong, as a template over the captured locals
    pub message: String,
    /// What to do about it, as a template over the captured locals
    pub advice: String,
}

impl Annotation {
    /// Create annotation
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>, advice: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            advice: advice.into(),
        }
    }

    /// Build from a normalized mapping, ignoring extra keys
    ///
    /// # Errors
    /// Returns error if a required key is missing
    pub fn from_map(mut map: AnnotationMap) -> Result<Self, AnnotationError> {
        validate(&map)?;
        let message = map.shift_remove("message").unwrap_or_default();
        let advice = map.shift_remove("advice").unwrap_or_default();
        Ok(Self { message, advice })
    }
}

impl TryFrom<RawAnnotation> for Annotation {
    type Error = AnnotationError;

    fn try_from(raw: RawAnnotation) -> Result<Self, Self::Error> {
        Self::from_map(normalize(raw)?)
    }
}

impl From<Annotation> for RawAnnotation {
    fn from(annotation: Annotation) -> Self {
        let mut map = AnnotationMap::new();
        map.insert("message".to_string(), annotation.message);
        map.insert("advice".to_string(), annotation.advice);
        Self::Mapping(map)
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for RawAnnotation {
    fn from((message, advice): (A, B)) -> Self {
        Self::Sequence(vec![message.into(), advice.into()])
    }
}

impl<S: Into<String>> From<Vec<S>> for RawAnnotation {
    fn from(items: Vec<S>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for RawAnnotation {
    fn from(items: [S; N]) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<S: AsRef<str>> From<&[S]> for RawAnnotation {
    fn from(items: &[S]) -> Self {
        Self::Sequence(items.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

impl<K: Into<String>, V: Into<String>, H: BuildHasher> From<HashMap<K, V, H>> for RawAnnotation {
    fn from(map: HashMap<K, V, H>) -> Self {
        Self::Mapping(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for RawAnnotation {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Mapping(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, H> From<IndexMap<K, V, H>> for RawAnnotation {
    fn from(map: IndexMap<K, V, H>) -> Self {
        Self::Mapping(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<&str> for RawAnnotation {
    fn from(_: &str) -> Self {
        Self::unsupported::<&str>()
    }
}

impl From<String> for RawAnnotation {
    fn from(_: String) -> Self {
        Self::unsupported::<String>()
    }
}

impl From<Value> for RawAnnotation {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items.into_iter().map(json_text).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, json_text(v))).collect())
            }
            other => Self::Unsupported {
                type_name: format!("json {}", json_kind(&other)),
            },
        }
    }
}

fn json_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

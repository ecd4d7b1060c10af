//! Dynamically-typed specification values.
//!
//! A product's specifications are a [`ValueBag`]: field key to [`SpecValue`].
//! The bag is not checked against any schema when stored; interpretation
//! happens at the validator, the form engine, and the tabular mapper, each of
//! which goes through the explicit conversions defined here.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single specification value.
///
/// Serialized untagged so that a bag reads and writes as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<SpecValue>),
    Object(BTreeMap<String, SpecValue>),
}

impl SpecValue {
    /// Parse structured text (JSON) into a value.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serialize to compact JSON text.
    pub fn to_json_string(&self) -> String {
        // Serializing this enum cannot fail: map keys are strings.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Serialize to indented JSON text, as shown in structured-text editors.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// True for null, the empty string, and the empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            SpecValue::Null => true,
            SpecValue::Text(text) => text.is_empty(),
            SpecValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SpecValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric view: numbers as-is, text parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SpecValue::Number(n) => Some(*n),
            SpecValue::Text(text) => parse_f64(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SpecValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SpecValue]> {
        match self {
            SpecValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text shown to a reader: strings verbatim, numbers without trailing
    /// zeros, booleans as `true`/`false`, lists and objects as JSON.
    pub fn to_display_string(&self) -> String {
        match self {
            SpecValue::Null => String::new(),
            SpecValue::Bool(b) => b.to_string(),
            SpecValue::Number(n) => format_numeric(*n),
            SpecValue::Text(text) => text.clone(),
            SpecValue::List(_) | SpecValue::Object(_) => self.to_json_string(),
        }
    }
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<&str> for SpecValue {
    fn from(value: &str) -> Self {
        SpecValue::Text(value.to_string())
    }
}

impl From<String> for SpecValue {
    fn from(value: String) -> Self {
        SpecValue::Text(value)
    }
}

impl From<f64> for SpecValue {
    fn from(value: f64) -> Self {
        SpecValue::Number(value)
    }
}

impl From<bool> for SpecValue {
    fn from(value: bool) -> Self {
        SpecValue::Bool(value)
    }
}

impl From<Vec<SpecValue>> for SpecValue {
    fn from(value: Vec<SpecValue>) -> Self {
        SpecValue::List(value)
    }
}

/// Field key to value mapping attached to one product.
///
/// Keys absent from the current schema are kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueBag(BTreeMap<String, SpecValue>);

impl ValueBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SpecValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SpecValue) -> Option<SpecValue> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<SpecValue> {
        self.0.remove(key)
    }

    /// Copy of this bag with one key replaced.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: SpecValue) -> Self {
        let mut next = self.clone();
        next.insert(key, value);
        next
    }

    /// Copy of this bag with one key removed.
    #[must_use]
    pub fn without(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.remove(key);
        next
    }

    /// Overlay `other` on top of this bag; keys only present here survive.
    pub fn merge(&mut self, other: ValueBag) {
        self.0.extend(other.0);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpecValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, SpecValue)> for ValueBag {
    fn from_iter<I: IntoIterator<Item = (String, SpecValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, SpecValue)> for ValueBag {
    fn from_iter<I: IntoIterator<Item = (&'a str, SpecValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

/// Format a number without a trailing fractional zero.
///
/// ```
/// use catalog_model::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(-0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    format!("{v}")
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

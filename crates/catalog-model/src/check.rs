//! Structural integrity checks for a series schema.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::schema::{SeriesSchemaDefinition, is_valid_field_key};

/// One structural problem in a schema definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum SchemaIssue {
    DuplicateFieldKey { key: String },
    InvalidFieldKey { key: String },
    MissingOptions { key: String },
    DuplicateOptionValue { key: String, value: String },
    InvertedRange { key: String, min: String, max: String },
    DuplicateGroupKey { key: String },
    InvalidPattern { key: String, reason: String },
}

impl SchemaIssue {
    /// Key of the field or group the issue is about.
    pub fn key(&self) -> &str {
        match self {
            SchemaIssue::DuplicateFieldKey { key }
            | SchemaIssue::InvalidFieldKey { key }
            | SchemaIssue::MissingOptions { key }
            | SchemaIssue::DuplicateOptionValue { key, .. }
            | SchemaIssue::InvertedRange { key, .. }
            | SchemaIssue::DuplicateGroupKey { key }
            | SchemaIssue::InvalidPattern { key, .. } => key,
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaIssue::DuplicateFieldKey { key } => write!(f, "duplicate field key `{key}`"),
            SchemaIssue::InvalidFieldKey { key } => {
                write!(f, "field key `{key}` must match [a-z0-9_]+")
            }
            SchemaIssue::MissingOptions { key } => {
                write!(f, "field `{key}` is a select field without options")
            }
            SchemaIssue::DuplicateOptionValue { key, value } => {
                write!(f, "field `{key}` repeats option value `{value}`")
            }
            SchemaIssue::InvertedRange { key, min, max } => {
                write!(f, "field `{key}` has min {min} greater than max {max}")
            }
            SchemaIssue::DuplicateGroupKey { key } => write!(f, "duplicate group key `{key}`"),
            SchemaIssue::InvalidPattern { key, reason } => {
                write!(f, "field `{key}` has an invalid pattern: {reason}")
            }
        }
    }
}

impl SeriesSchemaDefinition {
    /// Every structural problem in the schema, in declaration order.
    pub fn check(&self) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        let mut seen_keys = BTreeSet::new();

        for field in &self.fields {
            let key = field.key.clone();
            if !seen_keys.insert(field.key.as_str()) {
                issues.push(SchemaIssue::DuplicateFieldKey { key: key.clone() });
            }
            if !is_valid_field_key(&field.key) {
                issues.push(SchemaIssue::InvalidFieldKey { key: key.clone() });
            }
            if field.field_type.has_options() {
                if field.options.is_empty() {
                    issues.push(SchemaIssue::MissingOptions { key: key.clone() });
                }
                let mut values = BTreeSet::new();
                for option in &field.options {
                    if !values.insert(option.value()) {
                        issues.push(SchemaIssue::DuplicateOptionValue {
                            key: key.clone(),
                            value: option.value().to_string(),
                        });
                    }
                }
            }
            if let (Some(min), Some(max)) = (field.min, field.max)
                && min > max
            {
                issues.push(SchemaIssue::InvertedRange {
                    key: key.clone(),
                    min: crate::format_numeric(min),
                    max: crate::format_numeric(max),
                });
            }
            if let Some(pattern) = field.pattern()
                && let Err(err) = regex::Regex::new(pattern)
            {
                issues.push(SchemaIssue::InvalidPattern {
                    key,
                    reason: err.to_string(),
                });
            }
        }

        let mut seen_groups = BTreeSet::new();
        for group in &self.groups {
            if !seen_groups.insert(group.key.as_str()) {
                issues.push(SchemaIssue::DuplicateGroupKey {
                    key: group.key.clone(),
                });
            }
        }

        issues
    }
}

//! Schema validator.
//!
//! Given a series schema and a product's value bag, produce one message per
//! failing field. Validation is pure: the same inputs always yield the same
//! [`FieldErrors`], and user data problems are reported as data, never as
//! `Err`. The only error this crate returns is [`SchemaError`], raised when
//! the schema itself cannot be compiled (an invalid regex pattern).

mod errors;

pub use errors::FieldErrors;

use std::collections::BTreeMap;

use regex::Regex;
use thiserror::Error;

use catalog_model::{FieldType, Locale, Messages, SchemaField, SeriesSchemaDefinition, SpecValue, ValueBag};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("field `{key}` has an invalid pattern: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },
}

/// A schema compiled for repeated validation.
#[derive(Debug, Clone)]
pub struct Validator {
    schema: SeriesSchemaDefinition,
    patterns: BTreeMap<String, Regex>,
    messages: Messages,
}

impl Validator {
    pub fn new(schema: &SeriesSchemaDefinition) -> Result<Self, SchemaError> {
        Self::with_locale(schema, Locale::default())
    }

    pub fn with_locale(
        schema: &SeriesSchemaDefinition,
        locale: Locale,
    ) -> Result<Self, SchemaError> {
        let mut patterns = BTreeMap::new();
        for field in &schema.fields {
            if !field.field_type.is_text_like() {
                continue;
            }
            if let Some(pattern) = field.pattern() {
                let regex = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                    key: field.key.clone(),
                    source,
                })?;
                patterns.insert(field.key.clone(), regex);
            }
        }
        Ok(Self {
            schema: schema.clone(),
            patterns,
            messages: Messages::new(locale),
        })
    }

    pub fn schema(&self) -> &SeriesSchemaDefinition {
        &self.schema
    }

    pub fn messages(&self) -> Messages {
        self.messages
    }

    /// Validate every field of the schema against `values`.
    pub fn validate(&self, values: &ValueBag) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for field in &self.schema.fields {
            if let Some(message) = self.check_field(field, values.get(&field.key)) {
                errors.insert(field.key.clone(), message);
            }
        }
        tracing::trace!(failing = errors.len(), "validated value bag");
        errors
    }

    /// Validate a single field by key. Unknown keys are always valid.
    pub fn validate_field(&self, key: &str, values: &ValueBag) -> Option<String> {
        let field = self.schema.field(key)?;
        self.check_field(field, values.get(key))
    }

    fn check_field(&self, field: &SchemaField, value: Option<&SpecValue>) -> Option<String> {
        let value = match value {
            Some(value) if !value.is_empty() => value,
            _ => {
                return field
                    .required
                    .then(|| self.messages.required(&field.label));
            }
        };

        match field.field_type {
            FieldType::Number => self.check_number(field, value),
            FieldType::Text | FieldType::Textarea => self.check_pattern(field, value),
            // Option membership and structure are deliberately not checked.
            FieldType::Select
            | FieldType::Multiselect
            | FieldType::Boolean
            | FieldType::Json
            | FieldType::Image
            | FieldType::Color => None,
        }
    }

    fn check_number(&self, field: &SchemaField, value: &SpecValue) -> Option<String> {
        let Some(number) = value.as_f64() else {
            return Some(self.messages.not_a_number(&field.label));
        };
        if let Some(min) = field.min
            && number < min
        {
            return Some(self.messages.below_min(&field.label, min));
        }
        if let Some(max) = field.max
            && number > max
        {
            return Some(self.messages.above_max(&field.label, max));
        }
        None
    }

    fn check_pattern(&self, field: &SchemaField, value: &SpecValue) -> Option<String> {
        let regex = self.patterns.get(&field.key)?;
        let text = value.as_str()?;
        if regex.is_match(text) {
            return None;
        }
        let custom = field
            .validation
            .as_ref()
            .and_then(|validation| validation.message.clone())
            .filter(|message| !message.is_empty());
        Some(custom.unwrap_or_else(|| self.messages.invalid_format(&field.label)))
    }
}

/// Compile `schema` and validate `values` against it in one call.
pub fn validate(
    schema: &SeriesSchemaDefinition,
    values: &ValueBag,
) -> Result<FieldErrors, SchemaError> {
    Ok(Validator::new(schema)?.validate(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str, field_type: FieldType) -> SchemaField {
        SchemaField::new(key, key.to_uppercase(), field_type)
    }

    fn bag(entries: &[(&str, SpecValue)]) -> ValueBag {
        entries.iter().cloned().collect()
    }

    #[test]
    fn optional_empty_values_skip_every_check() {
        let schema = SeriesSchemaDefinition::new(
            vec![
                field("n", FieldType::Number).with_range(Some(1.0), None),
                field("t", FieldType::Text).with_pattern("^IP\\d{2}$", None),
            ],
            vec![],
        );
        let validator = Validator::new(&schema).unwrap();
        let errors = validator.validate(&bag(&[("n", SpecValue::Null), ("t", "".into())]));
        assert!(errors.is_empty());
    }

    #[test]
    fn numeric_text_is_accepted_for_number_fields() {
        let schema = SeriesSchemaDefinition::new(
            vec![field("n", FieldType::Number).with_range(Some(0.0), Some(10.0))],
            vec![],
        );
        let validator = Validator::new(&schema).unwrap();
        assert!(validator.validate(&bag(&[("n", "7.5".into())])).is_empty());
        assert_eq!(
            validator.validate_field("n", &bag(&[("n", "abc".into())])),
            Some("N必须是数字".to_string())
        );
        assert_eq!(
            validator.validate_field("n", &bag(&[("n", SpecValue::Bool(true))])),
            Some("N必须是数字".to_string())
        );
    }

    #[test]
    fn pattern_uses_custom_message_then_default() {
        let schema = SeriesSchemaDefinition::new(
            vec![
                field("a", FieldType::Text).with_pattern("^IP\\d{2}$", Some("应为IPxx".to_string())),
                field("b", FieldType::Textarea).with_pattern("^\\d+$", None),
            ],
            vec![],
        );
        let validator = Validator::new(&schema).unwrap();
        let errors = validator.validate(&bag(&[("a", "IP6".into()), ("b", "x".into())]));
        assert_eq!(errors.get("a"), Some("应为IPxx"));
        assert_eq!(errors.get("b"), Some("B格式不正确"));
    }

    #[test]
    fn pattern_ignores_non_string_values_and_non_text_fields() {
        let schema = SeriesSchemaDefinition::new(
            vec![
                field("a", FieldType::Text).with_pattern("^x$", None),
                field("c", FieldType::Color).with_pattern("^#[0-9a-f]{6}$", None),
            ],
            vec![],
        );
        let validator = Validator::new(&schema).unwrap();
        let errors = validator.validate(&bag(&[("a", SpecValue::Number(3.0)), ("c", "red".into())]));
        assert!(errors.is_empty());
    }

    #[test]
    fn invalid_pattern_is_a_schema_error() {
        let schema = SeriesSchemaDefinition::new(
            vec![field("a", FieldType::Text).with_pattern("([", None)],
            vec![],
        );
        let err = Validator::new(&schema).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { ref key, .. } if key == "a"));
    }

    #[test]
    fn english_messages() {
        let schema = SeriesSchemaDefinition::new(
            vec![SchemaField::new("v", "Voltage", FieldType::Select).required()],
            vec![],
        );
        let validator = Validator::with_locale(&schema, Locale::En).unwrap();
        let errors = validator.validate(&ValueBag::new());
        assert_eq!(errors.get("v"), Some("Voltage is required"));
    }
}

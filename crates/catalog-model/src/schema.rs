//! Series schema: fields, groups and the schema definition itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{SpecValue, ValueBag};

/// The kind of value a field holds, and the control used to edit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Select,
    Multiselect,
    Boolean,
    Textarea,
    Json,
    Image,
    Color,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Select,
        FieldType::Multiselect,
        FieldType::Boolean,
        FieldType::Textarea,
        FieldType::Json,
        FieldType::Image,
        FieldType::Color,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Boolean => "boolean",
            FieldType::Textarea => "textarea",
            FieldType::Json => "json",
            FieldType::Image => "image",
            FieldType::Color => "color",
        }
    }

    /// Select-like fields must declare options.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect)
    }

    /// Types whose values are checked against `validation.pattern`.
    pub fn is_text_like(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea)
    }

    /// Values of these types are written and read as JSON in table cells.
    pub fn is_structured(&self) -> bool {
        matches!(self, FieldType::Json | FieldType::Multiselect)
    }

    /// The value is stored as the cell text itself.
    pub fn stores_text(&self) -> bool {
        matches!(
            self,
            FieldType::Text
                | FieldType::Textarea
                | FieldType::Select
                | FieldType::Image
                | FieldType::Color
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An option of a select or multiselect field.
///
/// Accepts both `"24V"` and `{"value": "24V", "label": "24 V DC"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Plain(String),
    Labeled { value: String, label: String },
}

impl FieldOption {
    pub fn value(&self) -> &str {
        match self {
            FieldOption::Plain(value) => value,
            FieldOption::Labeled { value, .. } => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FieldOption::Plain(value) => value,
            FieldOption::Labeled { label, .. } => label,
        }
    }
}

impl From<&str> for FieldOption {
    fn from(value: &str) -> Self {
        FieldOption::Plain(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowWhenOperator {
    Equals,
    NotEquals,
    Contains,
    In,
}

/// Conditional visibility: the field is shown only while the condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowWhen {
    pub field: String,
    pub operator: ShowWhenOperator,
    #[serde(default)]
    pub value: SpecValue,
}

impl ShowWhen {
    pub fn is_satisfied(&self, values: &ValueBag) -> bool {
        let actual = values.get(&self.field).unwrap_or(&SpecValue::Null);
        match self.operator {
            ShowWhenOperator::Equals => loosely_equal(actual, &self.value),
            ShowWhenOperator::NotEquals => !loosely_equal(actual, &self.value),
            ShowWhenOperator::Contains => match actual {
                SpecValue::List(items) => items.iter().any(|item| loosely_equal(item, &self.value)),
                SpecValue::Text(text) => text.contains(&self.value.to_display_string()),
                _ => false,
            },
            ShowWhenOperator::In => match &self.value {
                SpecValue::List(candidates) => {
                    candidates.iter().any(|candidate| loosely_equal(actual, candidate))
                }
                _ => false,
            },
        }
    }
}

/// Equality that treats `4` and `"4"` alike, as values typed into forms and
/// values read from CSV cells meet here.
fn loosely_equal(left: &SpecValue, right: &SpecValue) -> bool {
    match (left, right) {
        (SpecValue::Number(_), SpecValue::Text(_)) | (SpecValue::Text(_), SpecValue::Number(_)) => {
            left.to_display_string() == right.to_display_string()
        }
        _ => left == right,
    }
}

/// One user-defined attribute of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<SpecValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_when: Option<ShowWhen>,
}

impl SchemaField {
    /// A minimal field; the remaining attributes are filled with the builders
    /// below or by struct update.
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            required: false,
            default_value: None,
            placeholder: None,
            description: None,
            group: None,
            unit: None,
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
            validation: None,
            show_when: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_options<I, O>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<FieldOption>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>, message: Option<String>) -> Self {
        self.validation = Some(FieldValidation {
            pattern: Some(pattern.into()),
            message,
        });
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: SpecValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn pattern(&self) -> Option<&str> {
        self.validation
            .as_ref()
            .and_then(|validation| validation.pattern.as_deref())
            .filter(|pattern| !pattern.is_empty())
    }

    /// Label of the option whose value is `value`, if any.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.value() == value)
            .map(FieldOption::label)
    }

    /// Label followed by the unit, e.g. `额定电流 (A)`.
    pub fn label_with_unit(&self) -> String {
        match self.unit.as_deref().filter(|unit| !unit.is_empty()) {
            Some(unit) => format!("{} ({unit})", self.label),
            None => self.label.clone(),
        }
    }
}

/// A display section of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaGroup {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub collapsible: bool,
    #[serde(default)]
    pub default_collapsed: bool,
}

impl SchemaGroup {
    pub fn new(key: impl Into<String>, label: impl Into<String>, order: i32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            order,
            description: None,
            collapsible: true,
            default_collapsed: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    1
}

/// The full schema owned by a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSchemaDefinition {
    #[serde(default)]
    pub fields: Vec<SchemaField>,
    #[serde(default)]
    pub groups: Vec<SchemaGroup>,
    #[serde(default = "default_version")]
    pub version: u32,
}

impl Default for SeriesSchemaDefinition {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            groups: Vec::new(),
            version: default_version(),
        }
    }
}

impl SeriesSchemaDefinition {
    pub fn new(fields: Vec<SchemaField>, groups: Vec<SchemaGroup>) -> Self {
        Self {
            fields,
            groups,
            version: default_version(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, key: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn group(&self, key: &str) -> Option<&SchemaGroup> {
        self.groups.iter().find(|group| group.key == key)
    }

    /// First field whose label matches exactly.
    pub fn field_by_label(&self, label: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|field| field.label == label)
    }

    /// Groups sorted by `order`; ties keep declaration order.
    pub fn ordered_groups(&self) -> Vec<&SchemaGroup> {
        let mut groups: Vec<&SchemaGroup> = self.groups.iter().collect();
        groups.sort_by_key(|group| group.order);
        groups
    }

    /// Values of every field that declares a default.
    pub fn defaults(&self) -> ValueBag {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .default_value
                    .clone()
                    .map(|value| (field.key.clone(), value))
            })
            .collect()
    }

    /// Keys present in both schemas whose field type differs.
    pub fn changed_field_types(&self, next: &SeriesSchemaDefinition) -> Vec<String> {
        self.fields
            .iter()
            .filter_map(|field| {
                next.field(&field.key)
                    .filter(|other| other.field_type != field.field_type)
                    .map(|_| field.key.clone())
            })
            .collect()
    }
}

/// Normalize user input into a field key: lowercase, and every character
/// outside `[a-z0-9_]` becomes `_`.
pub fn normalize_field_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn is_valid_field_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_stored_schema_json() {
        let raw = r#"{
            "fields": [
                {"key": "voltage_rating", "label": "额定电源", "type": "select",
                 "options": ["24V", {"value": "12V", "label": "12 V DC"}], "required": true,
                 "group": "electrical"},
                {"key": "current_load", "label": "额定电流", "type": "number",
                 "min": 0, "max": 10, "unit": "A", "default": 2},
                {"key": "led", "label": "LED", "type": "json",
                 "showWhen": {"field": "has_led", "operator": "equals", "value": true}}
            ],
            "groups": [{"key": "electrical", "label": "电气参数", "order": 1, "defaultCollapsed": true}]
        }"#;
        let schema: SeriesSchemaDefinition = serde_json::from_str(raw).unwrap();

        assert_eq!(schema.version, 1);
        let voltage = schema.field("voltage_rating").unwrap();
        assert_eq!(voltage.field_type, FieldType::Select);
        assert_eq!(voltage.option_label("12V"), Some("12 V DC"));
        assert_eq!(voltage.option_label("24V"), Some("24V"));
        let current = schema.field("current_load").unwrap();
        assert_eq!(current.default_value, Some(SpecValue::Number(2.0)));
        assert_eq!(current.label_with_unit(), "额定电流 (A)");
        let led = schema.field("led").unwrap();
        assert_eq!(
            led.show_when.as_ref().map(|when| when.operator),
            Some(ShowWhenOperator::Equals)
        );
        let group = schema.group("electrical").unwrap();
        assert!(group.collapsible);
        assert!(group.default_collapsed);
    }

    #[test]
    fn serializes_type_and_default_under_wire_names() {
        let field = SchemaField::new("port_count", "端口数", FieldType::Number)
            .with_default(SpecValue::Number(4.0));
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["default"], 4.0);
        assert!(json.get("showWhen").is_none());
    }

    #[test]
    fn ordered_groups_are_stable_on_ties() {
        let schema = SeriesSchemaDefinition::new(
            vec![],
            vec![
                SchemaGroup::new("b", "B", 2),
                SchemaGroup::new("a", "A", 1),
                SchemaGroup::new("c", "C", 1),
            ],
        );
        let keys: Vec<&str> = schema
            .ordered_groups()
            .iter()
            .map(|group| group.key.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "c", "b"]);
    }

    #[test]
    fn show_when_operators() {
        let values: ValueBag = [
            ("cable_type", SpecValue::from("PVC")),
            ("port_count", SpecValue::Number(4.0)),
            ("tags", SpecValue::List(vec!["ip67".into(), "led".into()])),
        ]
        .into_iter()
        .collect();

        let when = |field: &str, operator, value: SpecValue| ShowWhen {
            field: field.to_string(),
            operator,
            value,
        };

        assert!(when("cable_type", ShowWhenOperator::Equals, "PVC".into()).is_satisfied(&values));
        assert!(when("port_count", ShowWhenOperator::Equals, "4".into()).is_satisfied(&values));
        assert!(when("cable_type", ShowWhenOperator::NotEquals, "PUR".into()).is_satisfied(&values));
        assert!(when("tags", ShowWhenOperator::Contains, "led".into()).is_satisfied(&values));
        assert!(when("cable_type", ShowWhenOperator::Contains, "V".into()).is_satisfied(&values));
        assert!(
            when(
                "cable_type",
                ShowWhenOperator::In,
                SpecValue::List(vec!["PUR".into(), "PVC".into()])
            )
            .is_satisfied(&values)
        );
        assert!(!when("missing", ShowWhenOperator::Equals, "x".into()).is_satisfied(&values));
    }

    #[test]
    fn field_keys_normalize() {
        assert_eq!(normalize_field_key("Voltage Rating"), "voltage_rating");
        assert_eq!(normalize_field_key("IP-Rating(2)"), "ip_rating_2_");
        assert!(is_valid_field_key("ip_rating_2"));
        assert!(!is_valid_field_key("IP"));
        assert!(!is_valid_field_key(""));
    }

    #[test]
    fn detects_type_changes_between_versions() {
        let before = SeriesSchemaDefinition::new(
            vec![
                SchemaField::new("a", "A", FieldType::Text),
                SchemaField::new("b", "B", FieldType::Number),
            ],
            vec![],
        );
        let after = SeriesSchemaDefinition::new(
            vec![
                SchemaField::new("a", "A", FieldType::Select),
                SchemaField::new("b", "B", FieldType::Number),
                SchemaField::new("c", "C", FieldType::Boolean),
            ],
            vec![],
        );
        assert_eq!(before.changed_field_types(&after), vec!["a".to_string()]);
    }
}

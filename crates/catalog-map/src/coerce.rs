//! Conversions between table cells and specification values.

use catalog_model::{FieldType, SpecValue, ValueBag, parse_f64};

use crate::resolve::{ColumnTarget, ResolvedColumn};

/// Result of reading one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// Blank cell; the key is left unset.
    Unset,
    Value(SpecValue),
    /// A number cell that did not parse and was stored as `0`.
    NumberDefaulted { raw: String },
}

impl Coerced {
    pub fn into_value(self) -> Option<SpecValue> {
        match self {
            Coerced::Unset => None,
            Coerced::Value(value) => Some(value),
            Coerced::NumberDefaulted { .. } => Some(SpecValue::Number(0.0)),
        }
    }
}

/// Cell reader configured with the truthy literals accepted for booleans.
#[derive(Debug, Clone)]
pub struct CellCoercer {
    yes_literals: Vec<String>,
}

impl Default for CellCoercer {
    fn default() -> Self {
        Self::new(["是", "yes"])
    }
}

impl CellCoercer {
    /// `yes_literals` are accepted in addition to `true` and `1`.
    pub fn new<I, S>(yes_literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            yes_literals: yes_literals
                .into_iter()
                .map(|literal| literal.as_ref().trim().to_lowercase())
                .filter(|literal| !literal.is_empty())
                .collect(),
        }
    }

    pub fn is_truthy(&self, raw: &str) -> bool {
        let lowered = raw.trim().to_lowercase();
        lowered == "true" || lowered == "1" || self.yes_literals.contains(&lowered)
    }

    /// Coerce a cell of a column that matched a field.
    ///
    /// An empty cell leaves the key unset. Whitespace-only cells are kept for
    /// fields stored as text and treated as empty for every other type.
    pub fn coerce(&self, field_type: FieldType, raw: &str) -> Coerced {
        if raw.is_empty() || (!field_type.stores_text() && raw.trim().is_empty()) {
            return Coerced::Unset;
        }
        match field_type {
            FieldType::Number => match parse_f64(raw) {
                Some(number) => Coerced::Value(SpecValue::Number(number)),
                None => Coerced::NumberDefaulted {
                    raw: raw.to_string(),
                },
            },
            FieldType::Boolean => Coerced::Value(SpecValue::Bool(self.is_truthy(raw))),
            FieldType::Json | FieldType::Multiselect => Coerced::Value(
                SpecValue::from_json_str(raw).unwrap_or_else(|_| SpecValue::Text(raw.to_string())),
            ),
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Select
            | FieldType::Image
            | FieldType::Color => Coerced::Value(SpecValue::Text(raw.to_string())),
        }
    }

    /// Read a cell for a resolved column. Derived columns keep the raw text.
    pub fn read(&self, target: &ColumnTarget, raw: &str) -> Coerced {
        match target {
            ColumnTarget::Field { field_type, .. } => self.coerce(*field_type, raw),
            ColumnTarget::Derived { .. } if raw.trim().is_empty() => Coerced::Unset,
            ColumnTarget::Derived { .. } => Coerced::Value(SpecValue::Text(raw.to_string())),
        }
    }

    /// Build a value bag from one data row.
    pub fn map_row(&self, columns: &[ResolvedColumn], cells: &[String]) -> MappedRow {
        let mut row = MappedRow::default();
        for column in columns {
            let raw = cells.get(column.index).map(String::as_str).unwrap_or("");
            let key = column.target.key();
            match self.read(&column.target, raw) {
                Coerced::Unset => {}
                Coerced::Value(value) => {
                    row.values.insert(key, value);
                }
                Coerced::NumberDefaulted { raw } => {
                    row.values.insert(key, SpecValue::Number(0.0));
                    row.defaulted.push(DefaultedCell {
                        key: key.to_string(),
                        raw,
                    });
                }
            }
        }
        row
    }
}

/// A number cell replaced by `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultedCell {
    pub key: String,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedRow {
    pub values: ValueBag,
    pub defaulted: Vec<DefaultedCell>,
}

/// Text written to a cell: numbers without trailing zeros, booleans as
/// `true`/`false`, lists and objects as JSON, absent values as blank.
///
/// Cells of `json` and `multiselect` fields are read back as JSON, so every
/// value of those fields is written as JSON, strings included.
pub fn stringify_value(field_type: FieldType, value: Option<&SpecValue>) -> String {
    match value {
        None | Some(SpecValue::Null) => String::new(),
        Some(value) if field_type.is_structured() => value.to_json_string(),
        Some(value) => value.to_display_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_cells_parse_or_default_to_zero() {
        let coercer = CellCoercer::default();
        assert_eq!(
            coercer.coerce(FieldType::Number, " 2.5 "),
            Coerced::Value(SpecValue::Number(2.5))
        );
        let defaulted = coercer.coerce(FieldType::Number, "two");
        assert_eq!(
            defaulted,
            Coerced::NumberDefaulted {
                raw: "two".to_string()
            }
        );
        assert_eq!(defaulted.into_value(), Some(SpecValue::Number(0.0)));
    }

    #[test]
    fn boolean_literals() {
        let coercer = CellCoercer::default();
        for yes in ["true", "TRUE", "1", "是", "Yes"] {
            assert_eq!(
                coercer.coerce(FieldType::Boolean, yes),
                Coerced::Value(SpecValue::Bool(true)),
                "{yes}"
            );
        }
        for no in ["false", "0", "否", "y"] {
            assert_eq!(
                coercer.coerce(FieldType::Boolean, no),
                Coerced::Value(SpecValue::Bool(false)),
                "{no}"
            );
        }
        let strict = CellCoercer::new(Vec::<String>::new());
        assert!(!strict.is_truthy("yes"));
    }

    #[test]
    fn blank_cells_leave_keys_unset() {
        let coercer = CellCoercer::default();
        assert_eq!(coercer.coerce(FieldType::Number, ""), Coerced::Unset);
        assert_eq!(coercer.coerce(FieldType::Number, "  "), Coerced::Unset);
        assert_eq!(coercer.coerce(FieldType::Boolean, " "), Coerced::Unset);
        assert_eq!(coercer.coerce(FieldType::Text, ""), Coerced::Unset);
    }

    #[test]
    fn whitespace_text_is_a_value() {
        let coercer = CellCoercer::default();
        assert_eq!(
            coercer.coerce(FieldType::Text, "  "),
            Coerced::Value(SpecValue::Text("  ".to_string()))
        );
        assert_eq!(
            coercer.coerce(FieldType::Textarea, "\n"),
            Coerced::Value(SpecValue::Text("\n".to_string()))
        );
    }

    #[test]
    fn structured_cells_parse_as_json_when_possible() {
        let coercer = CellCoercer::default();
        assert_eq!(
            coercer.coerce(FieldType::Multiselect, r#"["led","shield"]"#),
            Coerced::Value(SpecValue::List(vec!["led".into(), "shield".into()]))
        );
        assert_eq!(
            coercer.coerce(FieldType::Json, "{broken"),
            Coerced::Value(SpecValue::Text("{broken".to_string()))
        );
    }

    #[test]
    fn select_text_is_kept_verbatim() {
        let coercer = CellCoercer::default();
        assert_eq!(
            coercer.coerce(FieldType::Select, "4"),
            Coerced::Value(SpecValue::Text("4".to_string()))
        );
    }

    #[test]
    fn derived_columns_are_not_coerced() {
        let coercer = CellCoercer::default();
        let target = ColumnTarget::Derived {
            key: "cable_color".to_string(),
        };
        assert_eq!(
            coercer.read(&target, "007"),
            Coerced::Value(SpecValue::Text("007".to_string()))
        );
    }

    #[test]
    fn stringify_by_type() {
        assert_eq!(
            stringify_value(FieldType::Number, Some(&SpecValue::Number(24.0))),
            "24"
        );
        assert_eq!(
            stringify_value(FieldType::Boolean, Some(&SpecValue::Bool(true))),
            "true"
        );
        assert_eq!(stringify_value(FieldType::Text, Some(&"42".into())), "42");
        assert_eq!(stringify_value(FieldType::Text, None), "");
    }

    #[test]
    fn structured_fields_quote_strings() {
        let coercer = CellCoercer::default();
        for text in ["42", "true", "[1]", "led"] {
            let value = SpecValue::Text(text.to_string());
            let cell = stringify_value(FieldType::Json, Some(&value));
            assert_eq!(cell, format!("\"{text}\""));
            assert_eq!(coercer.coerce(FieldType::Json, &cell), Coerced::Value(value));
        }
        assert_eq!(
            stringify_value(FieldType::Multiselect, Some(&SpecValue::Number(2.0))),
            "2.0"
        );
    }
}

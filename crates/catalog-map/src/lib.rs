//! Mapping between series schemas and flat tables.
//!
//! The export side turns a value bag into one cell per schema field, in
//! declaration order, headed by the field label. The import side resolves
//! headers back to fields ([`ColumnResolver`]) and coerces each cell by the
//! field type ([`CellCoercer`]).

#![deny(unsafe_code)]

mod coerce;
mod resolve;
mod utils;

pub use coerce::{CellCoercer, Coerced, DefaultedCell, MappedRow, stringify_value};
pub use resolve::{
    ColumnResolver, ColumnTarget, LabelSuggestion, ResolvedColumn, SUGGESTION_MIN_SCORE,
};
pub use utils::{clean_header, derive_key, normalize_text};

use catalog_model::{SeriesSchemaDefinition, ValueBag};

/// One header per schema field, in declaration order.
pub fn schema_headers(schema: &SeriesSchemaDefinition) -> Vec<String> {
    schema
        .fields
        .iter()
        .map(|field| field.label.clone())
        .collect()
}

/// One cell per schema field; keys outside the schema are not exported.
pub fn schema_cells(schema: &SeriesSchemaDefinition, values: &ValueBag) -> Vec<String> {
    schema
        .fields
        .iter()
        .map(|field| stringify_value(field.field_type, values.get(&field.key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{FieldType, SchemaField, SpecValue};

    #[test]
    fn export_follows_declaration_order_and_drops_stale_keys() {
        let schema = SeriesSchemaDefinition::new(
            vec![
                SchemaField::new("b", "第二", FieldType::Number),
                SchemaField::new("a", "第一", FieldType::Boolean),
            ],
            vec![],
        );
        let values = ValueBag::new()
            .with("a", SpecValue::Bool(false))
            .with("b", SpecValue::Number(3.0))
            .with("stale", "x".into());

        assert_eq!(schema_headers(&schema), vec!["第二", "第一"]);
        assert_eq!(schema_cells(&schema, &values), vec!["3", "false"]);
    }
}

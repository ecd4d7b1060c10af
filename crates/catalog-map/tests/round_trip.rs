//! Export then re-import through the mapper reproduces every schema field.

use std::collections::BTreeMap;

use catalog_map::{CellCoercer, ColumnResolver, schema_cells, schema_headers};
use catalog_model::{FieldType, SchemaField, SeriesSchemaDefinition, SpecValue, ValueBag};
use catalog_validate::validate;
use proptest::prelude::*;

fn reimport(schema: &SeriesSchemaDefinition, values: &ValueBag) -> ValueBag {
    let headers = schema_headers(schema);
    let cells = schema_cells(schema, values);
    let columns = ColumnResolver::new(schema).resolve_headers(&headers, 0);
    CellCoercer::default().map_row(&columns, &cells).values
}

#[test]
fn voltage_rating_round_trips() {
    let schema = SeriesSchemaDefinition::new(
        vec![
            SchemaField::new("voltage_rating", "额定电源", FieldType::Select)
                .with_options(["24V", "12V"])
                .required(),
        ],
        vec![],
    );
    let values = ValueBag::new().with("voltage_rating", "24V".into());
    assert_eq!(schema_cells(&schema, &values), vec!["24V"]);
    assert_eq!(reimport(&schema, &values), values);
}

#[test]
fn keys_outside_the_schema_are_lost() {
    let schema = SeriesSchemaDefinition::new(
        vec![SchemaField::new("current_load", "电流负载能力", FieldType::Number)],
        vec![],
    );
    let values = ValueBag::new()
        .with("current_load", SpecValue::Number(2.0))
        .with("legacy", "x".into());
    let back = reimport(&schema, &values);
    assert_eq!(back, ValueBag::new().with("current_load", SpecValue::Number(2.0)));
}

#[test]
fn whitespace_text_survives_for_required_fields() {
    let schema = SeriesSchemaDefinition::new(
        vec![SchemaField::new("note", "备注", FieldType::Text).required()],
        vec![],
    );
    let values = ValueBag::new().with("note", " ".into());
    assert!(validate(&schema, &values).unwrap().is_empty());

    let back = reimport(&schema, &values);
    assert_eq!(back, values);
    assert!(validate(&schema, &back).unwrap().is_empty());
}

#[test]
fn json_looking_strings_stay_strings() {
    let schema = SeriesSchemaDefinition::new(
        vec![
            SchemaField::new("led", "LED", FieldType::Json),
            SchemaField::new("extras", "附加", FieldType::Multiselect)
                .with_options(["led", "true"]),
        ],
        vec![],
    );
    for text in ["42", "true", "[1]", "null", "{broken"] {
        let values = ValueBag::new()
            .with("led", text.into())
            .with("extras", SpecValue::List(vec!["true".into()]));
        assert_eq!(reimport(&schema, &values), values, "{text}");
    }
}

fn non_blank_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9,\"\n ]{0,8}[a-zA-Z0-9]"
}

fn typed_value(field_type: FieldType) -> BoxedStrategy<SpecValue> {
    match field_type {
        FieldType::Number => (-1.0e6f64..1.0e6).prop_map(SpecValue::Number).boxed(),
        FieldType::Boolean => any::<bool>().prop_map(SpecValue::Bool).boxed(),
        FieldType::Multiselect => proptest::collection::vec(non_blank_text(), 1..4)
            .prop_map(|items| SpecValue::List(items.into_iter().map(SpecValue::Text).collect()))
            .boxed(),
        FieldType::Json => prop_oneof![
            proptest::collection::btree_map("[a-z]{1,6}", non_blank_text(), 1..4).prop_map(
                |map| {
                    SpecValue::Object(
                        map.into_iter()
                            .map(|(k, v)| (k, SpecValue::Text(v)))
                            .collect::<BTreeMap<_, _>>(),
                    )
                }
            ),
            "-?[0-9]{1,4}|true|false|null|\\[[0-9]\\]| {1,3}".prop_map(SpecValue::Text),
        ]
        .boxed(),
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Select
        | FieldType::Image
        | FieldType::Color => prop_oneof![non_blank_text(), " {1,3}"]
            .prop_map(SpecValue::Text)
            .boxed(),
    }
}

fn schema_and_values() -> impl Strategy<Value = (SeriesSchemaDefinition, ValueBag)> {
    proptest::collection::vec(proptest::sample::select(FieldType::ALL.to_vec()), 1..8)
        .prop_flat_map(|types| {
            let values: Vec<BoxedStrategy<Option<SpecValue>>> = types
                .iter()
                .map(|field_type| proptest::option::of(typed_value(*field_type)).boxed())
                .collect();
            (Just(types), values)
        })
        .prop_map(|(types, values)| {
            let fields: Vec<SchemaField> = types
                .iter()
                .enumerate()
                .map(|(i, field_type)| {
                    SchemaField::new(format!("field_{i}"), format!("字段 {i}"), *field_type)
                })
                .collect();
            let bag: ValueBag = values
                .into_iter()
                .enumerate()
                .filter_map(|(i, value)| value.map(|value| (format!("field_{i}"), value)))
                .collect();
            (SeriesSchemaDefinition::new(fields, vec![]), bag)
        })
}

proptest! {
    #[test]
    fn parse_row_of_to_row_is_identity((schema, values) in schema_and_values()) {
        prop_assert_eq!(reimport(&schema, &values), values);
    }
}

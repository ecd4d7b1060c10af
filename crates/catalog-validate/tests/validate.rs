use catalog_model::{FieldType, SchemaField, SeriesSchemaDefinition, SpecValue, ValueBag};
use catalog_validate::{Validator, validate};
use proptest::prelude::*;

fn voltage_schema() -> SeriesSchemaDefinition {
    SeriesSchemaDefinition::new(
        vec![
            SchemaField::new("voltage_rating", "额定电源", FieldType::Select)
                .with_options(["24V", "12V"])
                .required(),
        ],
        vec![],
    )
}

fn bounded_schema() -> SeriesSchemaDefinition {
    SeriesSchemaDefinition::new(
        vec![
            SchemaField::new("current_load", "电流负载能力", FieldType::Number)
                .with_range(Some(0.0), Some(10.0)),
        ],
        vec![],
    )
}

fn single(key: &str, value: SpecValue) -> ValueBag {
    ValueBag::new().with(key, value)
}

#[test]
fn required_select_reports_label_message() {
    let errors = validate(&voltage_schema(), &ValueBag::new()).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("voltage_rating"), Some("额定电源是必填项"));

    let errors = validate(&voltage_schema(), &single("voltage_rating", "24V".into())).unwrap();
    assert!(errors.is_empty());
}

#[test]
fn select_value_outside_options_is_tolerated() {
    let errors = validate(&voltage_schema(), &single("voltage_rating", "48V".into())).unwrap();
    assert!(errors.is_empty());
}

#[test]
fn number_bounds_are_inclusive() {
    let validator = Validator::new(&bounded_schema()).unwrap();
    for passing in [0.0, 10.0, 5.5] {
        let errors = validator.validate(&single("current_load", SpecValue::Number(passing)));
        assert!(errors.is_empty(), "{passing} should pass");
    }
    let low = validator.validate(&single("current_load", SpecValue::Number(-1.0)));
    assert_eq!(low.get("current_load"), Some("电流负载能力不能小于0"));
    let high = validator.validate(&single("current_load", SpecValue::Number(11.0)));
    assert_eq!(high.get("current_load"), Some("电流负载能力不能大于10"));
}

#[test]
fn validation_is_idempotent() {
    let validator = Validator::new(&bounded_schema()).unwrap();
    let values = single("current_load", SpecValue::Number(42.0));
    let first = validator.validate(&values);
    let second = validator.validate(&values);
    assert_eq!(first, second);
    assert_eq!(validate(&bounded_schema(), &values).unwrap(), first);
}

#[test]
fn empty_multiselect_counts_as_missing() {
    let schema = SeriesSchemaDefinition::new(
        vec![
            SchemaField::new("features", "功能", FieldType::Multiselect)
                .with_options(["led", "shield"])
                .required(),
        ],
        vec![],
    );
    let errors = validate(&schema, &single("features", SpecValue::List(vec![]))).unwrap();
    assert_eq!(errors.get("features"), Some("功能是必填项"));
}

#[test]
fn stale_keys_do_not_produce_errors() {
    let values = single("voltage_rating", "24V".into()).with("retired_field", "x".into());
    assert!(validate(&voltage_schema(), &values).unwrap().is_empty());
}

fn any_field_type() -> impl Strategy<Value = FieldType> {
    proptest::sample::select(FieldType::ALL.to_vec())
}

fn empty_value() -> impl Strategy<Value = Option<SpecValue>> {
    prop_oneof![
        Just(None),
        Just(Some(SpecValue::Null)),
        Just(Some(SpecValue::Text(String::new()))),
        Just(Some(SpecValue::List(vec![]))),
    ]
}

proptest! {
    #[test]
    fn required_fields_always_fail_when_empty(field_type in any_field_type(), value in empty_value()) {
        let schema = SeriesSchemaDefinition::new(
            vec![SchemaField::new("f", "字段", field_type).required()],
            vec![],
        );
        let values = match value {
            Some(value) => single("f", value),
            None => ValueBag::new(),
        };
        let errors = validate(&schema, &values).unwrap();
        prop_assert_eq!(errors.get("f"), Some("字段是必填项"));
    }

    #[test]
    fn non_empty_values_never_fail_required(text in "[a-zA-Z0-9]{1,12}") {
        let schema = SeriesSchemaDefinition::new(
            vec![SchemaField::new("f", "字段", FieldType::Text).required()],
            vec![],
        );
        let errors = validate(&schema, &single("f", SpecValue::Text(text))).unwrap();
        prop_assert!(errors.is_empty());
    }

    #[test]
    fn numbers_inside_bounds_pass(n in 0.0f64..=10.0) {
        let errors = validate(&bounded_schema(), &single("current_load", SpecValue::Number(n))).unwrap();
        prop_assert!(errors.is_empty());
    }
}

use std::collections::BTreeMap;

use catalog_form::{Control, FormAction, FormState, FormView, UNGROUPED_KEY, partition_fields};
use catalog_model::{
    FieldType, Locale, Messages, SchemaField, SchemaGroup, SeriesSchemaDefinition, ShowWhen,
    ShowWhenOperator, SpecValue, ValueBag,
};
use proptest::prelude::*;

fn distributor_schema() -> SeriesSchemaDefinition {
    SeriesSchemaDefinition::new(
        vec![
            SchemaField::new("notes", "备注", FieldType::Textarea),
            SchemaField::new("cable_type", "线缆类型", FieldType::Select)
                .with_options(["PVC", "PUR"])
                .in_group("cable"),
            SchemaField {
                show_when: Some(ShowWhen {
                    field: "cable_type".to_string(),
                    operator: ShowWhenOperator::Equals,
                    value: SpecValue::from("PUR"),
                }),
                ..SchemaField::new("bend_cycles", "弯曲次数", FieldType::Number).in_group("cable")
            },
            SchemaField::new("port_count", "端口数量", FieldType::Number)
                .with_unit("个")
                .in_group("physical"),
            SchemaField::new("photo", "产品图片", FieldType::Image).in_group("missing"),
            SchemaField::new("housing_color", "外壳颜色", FieldType::Color),
        ],
        vec![
            SchemaGroup::new("cable", "线缆参数", 3),
            SchemaGroup::new("physical", "物理参数", 2),
            SchemaGroup::new("empty", "空分组", 1),
        ],
    )
}

fn outline(view: &FormView) -> String {
    view.sections
        .iter()
        .map(|section| {
            let fields: Vec<String> = section
                .fields
                .iter()
                .map(|field| {
                    if field.hidden {
                        format!("({})", field.key)
                    } else {
                        field.key.clone()
                    }
                })
                .collect();
            format!("{} [{}]: {}", section.key, section.label, fields.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn sections_follow_group_order_with_ungrouped_last() {
    let state = FormState::new(&distributor_schema(), ValueBag::new()).unwrap();
    let view = FormView::build(&state, Messages::default());
    insta::assert_snapshot!(outline(&view), @r"
    physical [物理参数]: port_count
    cable [线缆参数]: cable_type, (bend_cycles)
    _ungrouped [其他]: notes, photo, housing_color
    ");
}

#[test]
fn show_when_reveals_fields_without_moving_them() {
    let state = FormState::new(&distributor_schema(), ValueBag::new())
        .unwrap()
        .reduce(FormAction::SelectOption {
            key: "cable_type".to_string(),
            option: Some("PUR".to_string()),
        })
        .state;
    let view = FormView::build(&state, Messages::new(Locale::En));
    insta::assert_snapshot!(outline(&view), @r"
    physical [物理参数]: port_count
    cable [线缆参数]: cable_type, bend_cycles
    _ungrouped [Other]: notes, photo, housing_color
    ");
}

#[test]
fn each_field_type_maps_to_one_control() {
    let state = FormState::new(&distributor_schema(), ValueBag::new()).unwrap();
    let view = FormView::build(&state, Messages::default());

    assert!(matches!(
        view.field("cable_type").map(|f| &f.control),
        Some(Control::Select { options }) if options.len() == 2 && options.iter().all(|o| !o.checked)
    ));
    assert!(matches!(
        view.field("port_count").map(|f| &f.control),
        Some(Control::NumberInput { unit: Some(unit), .. }) if unit == "个"
    ));
    assert!(matches!(
        view.field("photo").map(|f| &f.control),
        Some(Control::ImageInput { has_preview: false, .. })
    ));
    assert!(matches!(
        view.field("housing_color").map(|f| &f.control),
        Some(Control::ColorInput { value }) if value == "#000000"
    ));
    assert!(matches!(
        view.field("notes").map(|f| &f.control),
        Some(Control::TextArea { rows: 4, .. })
    ));
    assert_eq!(
        view.field("cable_type").and_then(|f| f.placeholder.as_deref()),
        Some("请选择...")
    );
}

#[test]
fn placeholders_follow_the_locale() {
    let state = FormState::new(&distributor_schema(), ValueBag::new()).unwrap();
    let placeholder = |view: &FormView, key: &str| {
        view.field(key)
            .and_then(|field| field.placeholder.clone())
            .unwrap_or_default()
    };

    let zh = FormView::build(&state, Messages::default());
    assert_eq!(placeholder(&zh, "photo"), "输入图片URL或上传");

    let en = FormView::build(&state, Messages::new(Locale::En));
    assert_eq!(placeholder(&en, "cable_type"), "Select...");
    assert_eq!(placeholder(&en, "photo"), "Enter an image URL or upload");
}

#[test]
fn touched_errors_show_next_to_their_field() {
    let schema = SeriesSchemaDefinition::new(
        vec![SchemaField::new("ip_rating", "外壳防护等级", FieldType::Text).required()],
        vec![],
    );
    let state = FormState::new(&schema, ValueBag::new())
        .unwrap()
        .reduce(FormAction::Touch {
            key: "ip_rating".to_string(),
        })
        .state;
    let view = FormView::build(&state, Messages::default());
    assert_eq!(
        view.field("ip_rating").and_then(|f| f.error.as_deref()),
        Some("外壳防护等级是必填项")
    );
}

fn arbitrary_schema() -> impl Strategy<Value = SeriesSchemaDefinition> {
    let group_keys = prop_oneof![
        Just(None),
        Just(Some("a".to_string())),
        Just(Some("b".to_string())),
        Just(Some("dangling".to_string())),
    ];
    let groups = proptest::collection::vec(
        (proptest::sample::select(vec!["a", "b", "c"]), -3i32..3),
        0..4,
    );
    (proptest::collection::vec(group_keys, 0..12), groups).prop_map(|(field_groups, groups)| {
        let fields = field_groups
            .into_iter()
            .enumerate()
            .map(|(i, group)| SchemaField {
                group,
                ..SchemaField::new(format!("f{i}"), format!("F{i}"), FieldType::Text)
            })
            .collect();
        let groups = groups
            .into_iter()
            .map(|(key, order)| SchemaGroup::new(key, key.to_uppercase(), order))
            .collect();
        SeriesSchemaDefinition::new(fields, groups)
    })
}

proptest! {
    #[test]
    fn every_field_lands_in_exactly_one_bucket(schema in arbitrary_schema()) {
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let buckets = partition_fields(&schema);
        for bucket in &buckets {
            for field in &bucket.fields {
                *seen.entry(field.key.clone()).or_default() += 1;
            }
        }
        prop_assert_eq!(seen.len(), schema.fields.len());
        prop_assert!(seen.values().all(|count| *count == 1));
        if let Some(position) = buckets.iter().position(|b| b.key() == UNGROUPED_KEY) {
            prop_assert_eq!(position, buckets.len() - 1);
        }
    }
}

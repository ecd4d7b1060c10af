//! Render-ready description of a form.
//!
//! The view is rebuilt from a [`FormState`] after every transition; it holds
//! no state of its own, so any UI layer can draw it.

use serde::Serialize;

use catalog_model::{FieldType, Messages, SchemaField, SpecValue};

use crate::partition::partition_fields;
use crate::state::FormState;

const DEFAULT_COLOR: &str = "#000000";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// The interactive control used for one field type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    TextInput {
        value: String,
    },
    NumberInput {
        value: String,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
        unit: Option<String>,
    },
    /// Exclusive choice.
    Select {
        options: Vec<OptionView>,
    },
    /// Set of checkboxes; each toggles membership.
    Checklist {
        options: Vec<OptionView>,
    },
    Switch {
        on: bool,
    },
    TextArea {
        value: String,
        rows: u8,
    },
    JsonEditor {
        text: String,
        parse_error: Option<String>,
    },
    ImageInput {
        url: String,
        has_preview: bool,
    },
    ColorInput {
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: String,
    pub label: String,
    pub required: bool,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub error: Option<String>,
    pub hidden: bool,
    pub control: Control,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub key: String,
    pub label: String,
    pub description: Option<String>,
    pub collapsible: bool,
    pub collapsed: bool,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub sections: Vec<SectionView>,
}

impl FormView {
    /// Sections in group order, empty groups omitted, ungrouped fields last.
    pub fn build(state: &FormState, messages: Messages) -> Self {
        let sections = partition_fields(state.schema())
            .into_iter()
            .filter(|bucket| !bucket.fields.is_empty())
            .map(|bucket| {
                let fields = bucket
                    .fields
                    .iter()
                    .map(|field| field_view(state, field, messages))
                    .collect();
                match bucket.group {
                    Some(group) => SectionView {
                        key: group.key.clone(),
                        label: group.label.clone(),
                        description: group.description.clone(),
                        collapsible: group.collapsible,
                        collapsed: state.is_collapsed(&group.key),
                        fields,
                    },
                    None => SectionView {
                        key: bucket.key().to_string(),
                        label: messages.ungrouped().to_string(),
                        description: None,
                        collapsible: true,
                        collapsed: false,
                        fields,
                    },
                }
            })
            .collect();
        Self { sections }
    }

    pub fn field(&self, key: &str) -> Option<&FieldView> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .find(|field| field.key == key)
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|section| section.fields.len()).sum()
    }
}

fn field_view(state: &FormState, field: &SchemaField, messages: Messages) -> FieldView {
    let hidden = field
        .show_when
        .as_ref()
        .is_some_and(|condition| !condition.is_satisfied(state.values()));
    let placeholder = field.placeholder.clone().or_else(|| match field.field_type {
        FieldType::Select => Some(messages.select_placeholder().to_string()),
        FieldType::Image => Some(messages.image_url_placeholder().to_string()),
        _ => None,
    });
    FieldView {
        key: field.key.clone(),
        label: field.label.clone(),
        required: field.required,
        description: field.description.clone(),
        placeholder,
        error: state.error(&field.key).map(str::to_string),
        hidden,
        control: control(state, field),
    }
}

fn control(state: &FormState, field: &SchemaField) -> Control {
    let value = state.value(&field.key);
    let text = || value.map(SpecValue::to_display_string).unwrap_or_default();
    match field.field_type {
        FieldType::Text => Control::TextInput { value: text() },
        FieldType::Number => Control::NumberInput {
            value: text(),
            min: field.min,
            max: field.max,
            step: field.step,
            unit: field.unit.clone(),
        },
        FieldType::Select => {
            let selected = text();
            Control::Select {
                options: options(field, |option| option == selected),
            }
        }
        FieldType::Multiselect => {
            let selected = state.selected_options(&field.key);
            Control::Checklist {
                options: options(field, |option| selected.iter().any(|s| s == option)),
            }
        }
        FieldType::Boolean => Control::Switch {
            on: value.and_then(SpecValue::as_bool).unwrap_or(false),
        },
        FieldType::Textarea => Control::TextArea {
            value: text(),
            rows: 4,
        },
        FieldType::Json => Control::JsonEditor {
            text: state.json_text(&field.key),
            parse_error: state.json_error(&field.key).map(str::to_string),
        },
        FieldType::Image => {
            let url = value
                .and_then(SpecValue::as_str)
                .unwrap_or_default()
                .to_string();
            Control::ImageInput {
                has_preview: !url.is_empty(),
                url,
            }
        }
        FieldType::Color => Control::ColorInput {
            value: value
                .and_then(SpecValue::as_str)
                .filter(|color| !color.is_empty())
                .unwrap_or(DEFAULT_COLOR)
                .to_string(),
        },
    }
}

fn options(field: &SchemaField, is_checked: impl Fn(&str) -> bool) -> Vec<OptionView> {
    field
        .options
        .iter()
        .map(|option| OptionView {
            value: option.value().to_string(),
            label: option.label().to_string(),
            checked: is_checked(option.value()),
        })
        .collect()
}

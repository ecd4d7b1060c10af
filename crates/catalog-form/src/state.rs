//! Form state and its transition function.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use catalog_model::{FieldType, SeriesSchemaDefinition, SpecValue, ValueBag, parse_f64};
use catalog_validate::{FieldErrors, SchemaError, Validator};

/// Something the user did to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// Replace the value of a field.
    SetValue { key: String, value: SpecValue },
    /// Remove a field's value from the bag.
    ClearValue { key: String },
    /// The field lost focus.
    Touch { key: String },
    Submit,
    /// Discard edits and return to the initial values.
    Reset,
    /// Expand or collapse a collapsible group.
    ToggleGroup { key: String },
    /// Add or remove one option of a multiselect field.
    ToggleOption { key: String, option: String },
    /// Choose the option of a select field; `None` clears it.
    SelectOption { key: String, option: Option<String> },
    /// Flip a boolean switch.
    ToggleSwitch { key: String },
    /// Raw text typed into a structured-text editor.
    EditJson { key: String, text: String },
    /// Raw text typed into a number input.
    InputNumber { key: String, text: String },
}

/// Notification produced by a transition, for the caller to act upon.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEffect {
    /// The bag changed; carries the whole new bag.
    Changed(ValueBag),
    /// Submission passed validation.
    Submitted(ValueBag),
    /// Submission failed; carries every failing field.
    Rejected(FieldErrors),
}

/// Uncommitted text of a structured-text editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDraft {
    pub text: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: FormState,
    pub effects: Vec<FormEffect>,
}

impl Transition {
    fn quiet(state: FormState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// Editable value bag bound to one schema.
///
/// Transitions never mutate the receiver; [`FormState::reduce`] returns the
/// next state together with the effects it produced.
#[derive(Debug, Clone)]
pub struct FormState {
    validator: Arc<Validator>,
    initial: ValueBag,
    values: ValueBag,
    touched: BTreeSet<String>,
    errors: FieldErrors,
    collapsed: BTreeSet<String>,
    drafts: BTreeMap<String, JsonDraft>,
}

impl FormState {
    pub fn new(schema: &SeriesSchemaDefinition, initial: ValueBag) -> Result<Self, SchemaError> {
        Ok(Self::with_validator(Arc::new(Validator::new(schema)?), initial))
    }

    /// Absent keys are seeded from field defaults; present keys, including
    /// ones unknown to the schema, are kept as given.
    pub fn with_validator(validator: Arc<Validator>, initial: ValueBag) -> Self {
        let schema = validator.schema();
        let mut values = initial;
        for (key, value) in schema.defaults().iter() {
            if !values.contains_key(key) {
                values.insert(key, value.clone());
            }
        }
        let collapsed = schema
            .groups
            .iter()
            .filter(|group| group.collapsible && group.default_collapsed)
            .map(|group| group.key.clone())
            .collect();
        Self {
            validator,
            initial: values.clone(),
            values,
            touched: BTreeSet::new(),
            errors: FieldErrors::default(),
            collapsed,
            drafts: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &SeriesSchemaDefinition {
        self.validator.schema()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn values(&self) -> &ValueBag {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&SpecValue> {
        self.values.get(key)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key)
    }

    pub fn is_touched(&self, key: &str) -> bool {
        self.touched.contains(key)
    }

    pub fn is_collapsed(&self, group: &str) -> bool {
        self.collapsed.contains(group)
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    /// Text shown in a structured-text editor: the pending draft if any,
    /// otherwise the committed value as indented JSON.
    pub fn json_text(&self, key: &str) -> String {
        if let Some(draft) = self.drafts.get(key) {
            return draft.text.clone();
        }
        match self.values.get(key) {
            Some(value) if !value.is_empty() => value.to_json_pretty(),
            _ => String::new(),
        }
    }

    pub fn json_error(&self, key: &str) -> Option<&str> {
        self.drafts.get(key).and_then(|draft| draft.error.as_deref())
    }

    /// Options currently checked in a multiselect field.
    pub fn selected_options(&self, key: &str) -> Vec<String> {
        self.selected_values(key)
            .iter()
            .map(SpecValue::to_display_string)
            .collect()
    }

    /// Members of a multiselect value. A single string counts as a
    /// one-element list.
    fn selected_values(&self, key: &str) -> Vec<SpecValue> {
        match self.values.get(key) {
            Some(SpecValue::List(items)) => items.clone(),
            Some(value @ SpecValue::Text(text)) if !text.is_empty() => vec![value.clone()],
            _ => Vec::new(),
        }
    }

    pub fn reduce(&self, action: FormAction) -> Transition {
        match action {
            FormAction::SetValue { key, value } => {
                let mut next = self.clone();
                next.drafts.remove(&key);
                next.commit(&key, Some(value))
            }
            FormAction::ClearValue { key } => {
                let mut next = self.clone();
                next.drafts.remove(&key);
                next.commit(&key, None)
            }
            FormAction::Touch { key } => {
                let mut next = self.clone();
                next.touched.insert(key.clone());
                next.revalidate(&key);
                Transition::quiet(next)
            }
            FormAction::Submit => self.submit(),
            FormAction::Reset => {
                let mut next = self.clone();
                next.values = self.initial.clone();
                next.touched.clear();
                next.errors = FieldErrors::default();
                next.drafts.clear();
                let changed = FormEffect::Changed(next.values.clone());
                Transition {
                    state: next,
                    effects: vec![changed],
                }
            }
            FormAction::ToggleGroup { key } => {
                let mut next = self.clone();
                let collapsible = self
                    .schema()
                    .group(&key)
                    .is_some_and(|group| group.collapsible);
                if collapsible && !next.collapsed.remove(&key) {
                    next.collapsed.insert(key);
                }
                Transition::quiet(next)
            }
            FormAction::ToggleOption { key, option } => {
                let mut selected = self.selected_values(&key);
                let option = SpecValue::Text(option);
                match selected.iter().position(|item| *item == option) {
                    Some(index) => {
                        selected.remove(index);
                    }
                    None => selected.push(option),
                }
                self.clone().commit(&key, Some(SpecValue::List(selected)))
            }
            FormAction::SelectOption { key, option } => {
                let value = option.filter(|option| !option.is_empty()).map(SpecValue::Text);
                self.clone().commit(&key, value)
            }
            FormAction::ToggleSwitch { key } => {
                let on = self
                    .values
                    .get(&key)
                    .and_then(SpecValue::as_bool)
                    .unwrap_or(false);
                self.clone().commit(&key, Some(SpecValue::Bool(!on)))
            }
            FormAction::EditJson { key, text } => self.edit_json(key, text),
            FormAction::InputNumber { key, text } => {
                let value = if text.trim().is_empty() {
                    None
                } else {
                    // Unparseable text is kept so validation can flag it.
                    Some(parse_f64(&text).map_or(SpecValue::Text(text), SpecValue::Number))
                };
                self.clone().commit(&key, value)
            }
        }
    }

    fn commit(mut self, key: &str, value: Option<SpecValue>) -> Transition {
        self.values = match value {
            Some(value) => self.values.with(key, value),
            None => self.values.without(key),
        };
        if self.touched.contains(key) {
            self.revalidate(key);
        }
        let changed = FormEffect::Changed(self.values.clone());
        Transition {
            state: self,
            effects: vec![changed],
        }
    }

    fn revalidate(&mut self, key: &str) {
        let outcome = self.validator.validate_field(key, &self.values);
        self.errors.set(key, outcome);
    }

    fn submit(&self) -> Transition {
        let mut next = self.clone();
        next.touched
            .extend(self.schema().fields.iter().map(|field| field.key.clone()));
        next.errors = self.validator.validate(&self.values);
        let effect = if next.errors.is_empty() {
            tracing::debug!(fields = self.schema().fields.len(), "form submitted");
            FormEffect::Submitted(next.values.clone())
        } else {
            tracing::debug!(errors = next.errors.len(), "form submission rejected");
            FormEffect::Rejected(next.errors.clone())
        };
        Transition {
            state: next,
            effects: vec![effect],
        }
    }

    fn edit_json(&self, key: String, text: String) -> Transition {
        let is_json_field = self
            .schema()
            .field(&key)
            .is_some_and(|field| field.field_type == FieldType::Json);
        if !is_json_field {
            return Transition::quiet(self.clone());
        }
        if text.trim().is_empty() {
            let mut next = self.clone();
            next.drafts.insert(key.clone(), JsonDraft { text, error: None });
            return next.commit(&key, None);
        }
        match SpecValue::from_json_str(&text) {
            Ok(value) => {
                let mut next = self.clone();
                next.drafts.insert(key.clone(), JsonDraft { text, error: None });
                next.commit(&key, Some(value))
            }
            Err(err) => {
                let mut next = self.clone();
                next.drafts.insert(
                    key,
                    JsonDraft {
                        text,
                        error: Some(err.to_string()),
                    },
                );
                Transition::quiet(next)
            }
        }
    }
}

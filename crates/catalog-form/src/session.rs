use catalog_model::ValueBag;
use catalog_validate::FieldErrors;

use crate::state::{FormAction, FormEffect, FormState};

type BagCallback<'a> = Box<dyn FnMut(&ValueBag) + 'a>;
type ErrorsCallback<'a> = Box<dyn FnMut(&FieldErrors) + 'a>;

/// A single editing session: owns the current state and forwards effects to
/// the caller's callbacks.
pub struct FormSession<'a> {
    state: FormState,
    on_change: Option<BagCallback<'a>>,
    on_submit: Option<BagCallback<'a>>,
    on_reject: Option<ErrorsCallback<'a>>,
}

impl<'a> FormSession<'a> {
    pub fn new(state: FormState) -> Self {
        Self {
            state,
            on_change: None,
            on_submit: None,
            on_reject: None,
        }
    }

    /// Called with the whole bag after every committed change.
    #[must_use]
    pub fn on_change(mut self, callback: impl FnMut(&ValueBag) + 'a) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Called with the bag when a submission passes validation.
    #[must_use]
    pub fn on_submit(mut self, callback: impl FnMut(&ValueBag) + 'a) -> Self {
        self.on_submit = Some(Box::new(callback));
        self
    }

    /// Called with every failing field when a submission is rejected.
    #[must_use]
    pub fn on_reject(mut self, callback: impl FnMut(&FieldErrors) + 'a) -> Self {
        self.on_reject = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn into_state(self) -> FormState {
        self.state
    }

    pub fn dispatch(&mut self, action: FormAction) -> Vec<FormEffect> {
        let transition = self.state.reduce(action);
        self.state = transition.state;
        for effect in &transition.effects {
            match effect {
                FormEffect::Changed(values) => {
                    if let Some(callback) = self.on_change.as_mut() {
                        callback(values);
                    }
                }
                FormEffect::Submitted(values) => {
                    if let Some(callback) = self.on_submit.as_mut() {
                        callback(values);
                    }
                }
                FormEffect::Rejected(errors) => {
                    if let Some(callback) = self.on_reject.as_mut() {
                        callback(errors);
                    }
                }
            }
        }
        transition.effects
    }

    pub fn set_value(&mut self, key: &str, value: catalog_model::SpecValue) -> Vec<FormEffect> {
        self.dispatch(FormAction::SetValue {
            key: key.to_string(),
            value,
        })
    }

    pub fn touch(&mut self, key: &str) -> Vec<FormEffect> {
        self.dispatch(FormAction::Touch {
            key: key.to_string(),
        })
    }

    pub fn submit(&mut self) -> Vec<FormEffect> {
        self.dispatch(FormAction::Submit)
    }
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A fallback must name a template that is already registered.
    #[error("cannot use `{id}` as fallback: template is not registered")]
    NotRegistered { id: String },
    #[error("template `{id}` not found and no fallback is set")]
    NotFound { id: String },
}

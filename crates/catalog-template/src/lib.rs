//! Template registry and the renderer contract.
//!
//! A renderer is a pure function from a [`RenderInput`] to a [`Document`].
//! The [`TemplateRegistry`] maps template ids to renderers plus their
//! [`TemplateMetadata`], with an optional fallback for unknown ids.

#![deny(unsafe_code)]

mod document;
mod error;
mod registry;
mod renderer;
mod writer;

pub use document::{Document, Node, NoticeLevel, Page, TextStyle};
pub use error::TemplateError;
pub use registry::{ProductTemplate, ResolvedTemplate, TemplateRegistry};
pub use renderer::{RenderInput, TemplateMetadata, TemplateRenderer};
pub use writer::DocumentWriter;

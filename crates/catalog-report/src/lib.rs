//! Built-in data sheet templates.
//!
//! Each template module exposes `metadata()` and a `render` function
//! satisfying the renderer contract; [`register_builtin_templates`] wires
//! them into a registry at startup. [`LayoutXmlWriter`] serializes the
//! rendered document tree.

pub mod blocks;
mod builtin;
pub mod m8_distributor;
pub mod m8_standard;
mod xml;

pub use builtin::{
    DEFAULT_FALLBACK, builtin_registry, builtin_templates, register_builtin_templates,
};
pub use xml::LayoutXmlWriter;

//! Template id to renderer lookup.
//!
//! The registry is filled once at startup and then shared read-only (wrap it
//! in an `Arc` to hand it to workers). Resolution never fails hard: an
//! unknown id falls back to the configured fallback template, and when that
//! is also unavailable the caller gets `None` or an error panel document.

use std::collections::BTreeMap;
use std::sync::Arc;

use catalog_model::{Messages, ProductWithRelations};

use crate::document::Document;
use crate::error::TemplateError;
use crate::renderer::{RenderInput, TemplateMetadata, TemplateRenderer};

#[derive(Clone)]
struct TemplateEntry {
    metadata: TemplateMetadata,
    renderer: Arc<dyn TemplateRenderer>,
}

/// A renderer found for a template id.
#[derive(Clone)]
pub struct ResolvedTemplate<'a> {
    pub requested: &'a str,
    pub metadata: &'a TemplateMetadata,
    pub renderer: &'a Arc<dyn TemplateRenderer>,
    /// The requested id was not registered and the fallback answered.
    pub used_fallback: bool,
}

impl ResolvedTemplate<'_> {
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn render(&self, input: &RenderInput<'_>) -> Document {
        self.renderer.render(input)
    }
}

impl std::fmt::Debug for ResolvedTemplate<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedTemplate")
            .field("requested", &self.requested)
            .field("id", &self.metadata.id)
            .field("used_fallback", &self.used_fallback)
            .finish()
    }
}

/// Outcome of resolving the template of a product.
#[derive(Debug)]
pub enum ProductTemplate<'a> {
    Ready(ResolvedTemplate<'a>),
    /// Nothing can render this product; show this document instead.
    Failed(Document),
}

#[derive(Default, Clone)]
pub struct TemplateRegistry {
    entries: BTreeMap<String, TemplateEntry>,
    fallback: Option<String>,
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.entries.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a template, replacing any template with the same id.
    pub fn register<R>(&mut self, metadata: TemplateMetadata, renderer: R)
    where
        R: TemplateRenderer + 'static,
    {
        self.register_arc(metadata, Arc::new(renderer));
    }

    pub fn register_arc(&mut self, metadata: TemplateMetadata, renderer: Arc<dyn TemplateRenderer>) {
        let id = metadata.id.clone();
        let entry = TemplateEntry { metadata, renderer };
        if self.entries.insert(id.clone(), entry).is_some() {
            tracing::warn!(template_id = %id, "template already registered; overwriting");
        } else {
            tracing::info!(template_id = %id, "template registered");
        }
    }

    pub fn register_all<I>(&mut self, templates: I)
    where
        I: IntoIterator<Item = (TemplateMetadata, Arc<dyn TemplateRenderer>)>,
    {
        for (metadata, renderer) in templates {
            self.register_arc(metadata, renderer);
        }
    }

    /// Remove a template. Removing the fallback template clears the fallback.
    pub fn unregister(&mut self, id: &str) -> Option<TemplateMetadata> {
        let removed = self.entries.remove(id)?;
        tracing::info!(template_id = %id, "template unregistered");
        if self.fallback.as_deref() == Some(id) {
            tracing::warn!(template_id = %id, "fallback template removed; no fallback is set");
            self.fallback = None;
        }
        Some(removed.metadata)
    }

    /// Use `id` for unknown template ids. `id` must already be registered.
    pub fn set_fallback(&mut self, id: &str) -> Result<(), TemplateError> {
        if !self.entries.contains_key(id) {
            return Err(TemplateError::NotRegistered { id: id.to_string() });
        }
        tracing::info!(template_id = %id, "fallback template set");
        self.fallback = Some(id.to_string());
        Ok(())
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Exact match, then the fallback, then `None`.
    pub fn resolve<'a>(&'a self, id: &'a str) -> Option<ResolvedTemplate<'a>> {
        if let Some(entry) = self.entries.get(id) {
            return Some(ResolvedTemplate {
                requested: id,
                metadata: &entry.metadata,
                renderer: &entry.renderer,
                used_fallback: false,
            });
        }
        let fallback = self
            .fallback
            .as_deref()
            .and_then(|fallback| self.entries.get(fallback));
        match fallback {
            Some(entry) => {
                tracing::warn!(
                    template_id = %id,
                    fallback = %entry.metadata.id,
                    "template not found; using fallback"
                );
                Some(ResolvedTemplate {
                    requested: id,
                    metadata: &entry.metadata,
                    renderer: &entry.renderer,
                    used_fallback: true,
                })
            }
            None => {
                tracing::error!(template_id = %id, "template not found and no fallback available");
                None
            }
        }
    }

    /// Resolve the template of a product's series, or describe the failure
    /// as a document a business user can read.
    pub fn resolve_for_product<'a>(
        &'a self,
        product: &'a ProductWithRelations,
        messages: Messages,
    ) -> ProductTemplate<'a> {
        let Some(template_id) = product.template_id() else {
            tracing::error!(sku = %product.product.sku, "product has no series; cannot pick a template");
            return ProductTemplate::Failed(Document::error_panel(
                messages.schema_missing(),
                Some(messages.schema_missing_detail().to_string()),
            ));
        };
        match self.resolve(template_id) {
            Some(resolved) => ProductTemplate::Ready(resolved),
            None => ProductTemplate::Failed(Document::error_panel(
                messages.template_load_failed(),
                Some(messages.template_not_found(template_id)),
            )),
        }
    }

    /// Render a product with its series' template, schema and layout.
    /// Resolution failures come back as an error panel document.
    pub fn render_product(
        &self,
        product: &ProductWithRelations,
        page: Option<u32>,
        messages: Messages,
    ) -> Document {
        match self.resolve_for_product(product, messages) {
            ProductTemplate::Ready(resolved) => {
                let input = RenderInput::for_product(product).with_page(page);
                resolved.render(&input)
            }
            ProductTemplate::Failed(document) => document,
        }
    }

    /// Render with the template registered under `id` (or the fallback).
    pub fn render(&self, id: &str, input: &RenderInput<'_>) -> Result<Document, TemplateError> {
        self.resolve(id)
            .map(|resolved| resolved.render(input))
            .ok_or_else(|| TemplateError::NotFound { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metadata(&self, id: &str) -> Option<&TemplateMetadata> {
        self.entries.get(id).map(|entry| &entry.metadata)
    }

    /// Metadata of every template, sorted by id.
    pub fn list(&self) -> Vec<&TemplateMetadata> {
        self.entries.values().map(|entry| &entry.metadata).collect()
    }
}

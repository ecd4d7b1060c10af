use serde::{Deserialize, Serialize};

use catalog_model::{LayoutConfig, Orientation, ProductWithRelations, SeriesSchemaDefinition};

use crate::document::Document;

/// Everything a renderer may read. Renderers only get shared references.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub product: &'a ProductWithRelations,
    pub schema: &'a SeriesSchemaDefinition,
    pub layout: Option<&'a LayoutConfig>,
    /// 1-based page to render; `None` renders the first page.
    pub page: Option<u32>,
}

impl<'a> RenderInput<'a> {
    pub fn new(product: &'a ProductWithRelations, schema: &'a SeriesSchemaDefinition) -> Self {
        Self {
            product,
            schema,
            layout: None,
            page: None,
        }
    }

    /// Input built from the product's own series: its schema and layout.
    /// Products without a series get an empty schema.
    pub fn for_product(product: &'a ProductWithRelations) -> Self {
        static EMPTY: SeriesSchemaDefinition = SeriesSchemaDefinition {
            fields: Vec::new(),
            groups: Vec::new(),
            version: 1,
        };
        Self {
            product,
            schema: product.schema().unwrap_or(&EMPTY),
            layout: product.layout(),
            page: None,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: Option<&'a LayoutConfig>) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Produces a document for one product.
///
/// Implemented for any `Fn(&RenderInput) -> Document` that is `Send + Sync`.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, input: &RenderInput<'_>) -> Document;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&RenderInput<'_>) -> Document + Send + Sync,
{
    fn render(&self, input: &RenderInput<'_>) -> Document {
        self(input)
    }
}

/// Display and capability information about a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Series codes or families the template is meant for.
    #[serde(default)]
    pub applicable_to: Vec<String>,
    pub version: String,
    #[serde(default)]
    pub supports_multi_page: bool,
    #[serde(default)]
    pub default_orientation: Orientation,
}

impl TemplateMetadata {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            applicable_to: Vec::new(),
            version: "1.0.0".to_string(),
            supports_multi_page: false,
            default_orientation: Orientation::Portrait,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn applicable_to<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable_to = targets.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn multi_page(mut self, supports: bool) -> Self {
        self.supports_multi_page = supports;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.default_orientation = orientation;
        self
    }
}

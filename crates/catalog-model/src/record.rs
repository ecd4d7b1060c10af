//! Series and product records as seen at the persistence boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;
use crate::ids::{RecordId, SeriesCode, Sku};
use crate::layout::LayoutConfig;
use crate::schema::SeriesSchemaDefinition;
use crate::value::ValueBag;

pub const SERIES_ENTITY: &str = "series";
pub const PRODUCT_ENTITY: &str = "product";

/// A product family: one schema, one template identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: RecordId,
    pub code: SeriesCode,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub template_id: String,
    #[serde(default)]
    pub schema_definition: SeriesSchemaDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_config: Option<LayoutConfig>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Series {
    /// New active series with an empty schema and an id derived from its code.
    pub fn new(code: SeriesCode, name: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            id: RecordId::derive(SERIES_ENTITY, code.as_str()),
            code,
            name: name.into(),
            description: None,
            template_id: template_id.into(),
            schema_definition: SeriesSchemaDefinition::default(),
            layout_config: None,
            sort_order: 0,
            is_active: true,
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: SeriesSchemaDefinition) -> Self {
        self.schema_definition = schema;
        self
    }

    /// Replace the schema, bumping its version past the current one.
    ///
    /// Returns the keys whose field type changed. Existing value bags are not
    /// rewritten, so those keys may now hold values of the old type.
    pub fn apply_schema_edit(&mut self, mut next: SeriesSchemaDefinition) -> Vec<String> {
        let changed = self.schema_definition.changed_field_types(&next);
        for key in &changed {
            tracing::warn!(
                series = %self.code,
                field = %key,
                "schema edit changes the type of an existing field"
            );
        }
        next.version = self.schema_definition.version.saturating_add(1);
        tracing::info!(series = %self.code, version = next.version, "schema updated");
        self.schema_definition = next;
        changed
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Editorial status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    #[default]
    Draft,
    Review,
    Approved,
    Published,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "DRAFT",
            ProductStatus::Review => "REVIEW",
            ProductStatus::Approved => "APPROVED",
            ProductStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Ok(ProductStatus::Draft),
            "REVIEW" => Ok(ProductStatus::Review),
            "APPROVED" => Ok(ProductStatus::Approved),
            "PUBLISHED" => Ok(ProductStatus::Published),
            _ => Err(ModelError::InvalidStatus(s.to_string())),
        }
    }
}

/// An orderable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartNumber {
    pub part_number: String,
    #[serde(default)]
    pub variant_config: ValueBag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl PartNumber {
    pub fn new(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            variant_config: ValueBag::new(),
            category: None,
        }
    }
}

/// A file attached to a product, e.g. a photo or a circuit diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAsset {
    pub usage: String,
    pub file_url: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RecordId,
    pub sku: Sku,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub series_id: RecordId,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub specifications: ValueBag,
    #[serde(default = "default_product_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub part_numbers: Vec<PartNumber>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<ProductAsset>,
}

fn default_product_version() -> u32 {
    1
}

impl Product {
    /// New draft product with an id derived from its SKU.
    pub fn new(sku: Sku, name: impl Into<String>, series_id: RecordId) -> Self {
        Self {
            id: RecordId::derive(PRODUCT_ENTITY, sku.as_str()),
            sku,
            name: name.into(),
            description: None,
            series_id,
            status: ProductStatus::Draft,
            specifications: ValueBag::new(),
            version: default_product_version(),
            part_numbers: Vec::new(),
            assets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_specifications(mut self, specifications: ValueBag) -> Self {
        self.specifications = specifications;
        self
    }

    /// First asset with the given usage, lowest sort order first.
    pub fn asset(&self, usage: &str) -> Option<&ProductAsset> {
        self.assets
            .iter()
            .filter(|asset| asset.usage == usage)
            .min_by_key(|asset| asset.sort_order)
    }
}

/// A product together with its owning series, as handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithRelations {
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Series>,
}

impl ProductWithRelations {
    pub fn new(product: Product, series: Option<Series>) -> Self {
        Self { product, series }
    }

    pub fn template_id(&self) -> Option<&str> {
        self.series.as_ref().map(|series| series.template_id.as_str())
    }

    pub fn schema(&self) -> Option<&SeriesSchemaDefinition> {
        self.series.as_ref().map(|series| &series.schema_definition)
    }

    pub fn layout(&self) -> Option<&LayoutConfig> {
        self.series
            .as_ref()
            .and_then(|series| series.layout_config.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, SchemaField};

    fn series() -> Series {
        Series::new(
            SeriesCode::new("M8-COMPACT").unwrap(),
            "M8 Compact",
            "layout-m8-standard",
        )
    }

    #[test]
    fn schema_edits_bump_version_and_report_type_changes() {
        let mut series = series().with_schema(SeriesSchemaDefinition::new(
            vec![SchemaField::new("port_count", "端口数", FieldType::Text)],
            vec![],
        ));
        assert_eq!(series.schema_definition.version, 1);

        let changed = series.apply_schema_edit(SeriesSchemaDefinition::new(
            vec![SchemaField::new("port_count", "端口数", FieldType::Number)],
            vec![],
        ));
        assert_eq!(changed, vec!["port_count".to_string()]);
        assert_eq!(series.schema_definition.version, 2);

        let changed = series.apply_schema_edit(series.schema_definition.clone());
        assert!(changed.is_empty());
        assert_eq!(series.schema_definition.version, 3);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "published".parse::<ProductStatus>().unwrap(),
            ProductStatus::Published
        );
        assert!("ARCHIVED".parse::<ProductStatus>().is_err());
        assert_eq!(ProductStatus::default().to_string(), "DRAFT");
    }

    #[test]
    fn product_ids_derive_from_sku() {
        let series = series();
        let a = Product::new(Sku::new("PROD-001").unwrap(), "A", series.id);
        let b = Product::new(Sku::new("PROD-001").unwrap(), "B", series.id);
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, series.id);
    }

    #[test]
    fn product_json_uses_camel_case() {
        let series = series();
        let product = Product::new(Sku::new("PROD-001").unwrap(), "A", series.id);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["status"], "DRAFT");
        assert_eq!(json["seriesId"], series.id.to_hex());
        assert!(json.get("partNumbers").is_none());
    }
}

//! Whole-catalog JSON bundles.
//!
//! Unlike the CSV tables, a bundle carries everything a series owns (schema,
//! layout, sort order) and the part numbers of each product, so a catalog can
//! be moved between stores without losing structure. Entries go through the
//! same skip/update rules as CSV rows and fail one at a time.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use catalog_model::{
    LayoutConfig, PRODUCT_ENTITY, PartNumber, Product, ProductStatus, SERIES_ENTITY, Series,
    SeriesCode, SeriesSchemaDefinition, Sku, ValueBag,
};

use crate::error::BundleError;
use crate::import::{ImportMode, ImportSummary, Importer, RowOutcome};
use crate::store::CatalogStore;

pub const BUNDLE_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<SeriesEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductEntry>>,
}

fn default_version() -> String {
    BUNDLE_VERSION.to_string()
}

impl CatalogBundle {
    pub fn from_json_str(text: &str) -> Result<Self, BundleError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, BundleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A series as carried in a bundle. Absent attributes are left alone on
/// update and defaulted on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesEntry {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_definition: Option<SeriesSchemaDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_config: Option<LayoutConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl From<&Series> for SeriesEntry {
    fn from(series: &Series) -> Self {
        Self {
            code: series.code.to_string(),
            name: Some(series.name.clone()),
            description: series.description.clone(),
            template_id: Some(series.template_id.clone()),
            schema_definition: Some(series.schema_definition.clone()),
            layout_config: series.layout_config.clone(),
            sort_order: Some(series.sort_order),
        }
    }
}

/// A product as carried in a bundle, keyed to its series by code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntry {
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub series_code: String,
    #[serde(default)]
    pub specifications: ValueBag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub part_numbers: Vec<PartNumber>,
}

impl ProductEntry {
    fn new(product: &Product, series_code: &SeriesCode) -> Self {
        Self {
            sku: product.sku.to_string(),
            name: Some(product.name.clone()),
            description: product.description.clone(),
            series_code: series_code.to_string(),
            specifications: product.specifications.clone(),
            status: Some(product.status),
            part_numbers: product.part_numbers.clone(),
        }
    }
}

/// Which record kinds a bundle export includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleScope {
    All,
    Series,
    Products,
}

impl BundleScope {
    fn includes_series(self) -> bool {
        matches!(self, BundleScope::All | BundleScope::Series)
    }

    fn includes_products(self) -> bool {
        matches!(self, BundleScope::All | BundleScope::Products)
    }
}

/// Active series by sort order and every product whose series is known,
/// by SKU.
pub fn export_bundle<S: CatalogStore>(
    store: &S,
    scope: BundleScope,
    exported_at: DateTime<Utc>,
) -> CatalogBundle {
    let series = scope.includes_series().then(|| {
        store
            .active_series()
            .iter()
            .map(SeriesEntry::from)
            .collect()
    });
    let products = scope.includes_products().then(|| {
        store
            .list_products()
            .iter()
            .filter_map(|product| {
                let Some(series) = store.series_by_id(&product.series_id) else {
                    tracing::debug!(sku = %product.sku, "product without series left out of bundle");
                    return None;
                };
                Some(ProductEntry::new(product, &series.code))
            })
            .collect()
    });
    CatalogBundle {
        exported_at: Some(exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        version: BUNDLE_VERSION.to_string(),
        series,
        products,
    }
}

/// Separate tallies for the two entry kinds of a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleSummary {
    pub series: ImportSummary,
    pub products: ImportSummary,
}

impl BundleSummary {
    pub fn failed(&self) -> usize {
        self.series.failed() + self.products.failed()
    }
}

impl Importer {
    /// Import a JSON bundle: series first, then products, so products may
    /// reference series from the same bundle.
    pub fn import_bundle<S: CatalogStore>(
        &self,
        store: &mut S,
        text: &str,
    ) -> Result<BundleSummary, BundleError> {
        let bundle = CatalogBundle::from_json_str(text)?;
        let summary = BundleSummary {
            series: self.import_series_entries(store, bundle.series.as_deref().unwrap_or_default()),
            products: self
                .import_product_entries(store, bundle.products.as_deref().unwrap_or_default()),
        };
        tracing::info!(
            series_created = summary.series.created,
            products_created = summary.products.created,
            errors = summary.failed(),
            "bundle import finished"
        );
        Ok(summary)
    }

    pub fn import_series_entries<S: CatalogStore>(
        &self,
        store: &mut S,
        entries: &[SeriesEntry],
    ) -> ImportSummary {
        let span = tracing::info_span!("import_bundle", entity = SERIES_ENTITY, mode = %self.options.mode);
        let _guard = span.enter();

        let mut summary = ImportSummary::new(SERIES_ENTITY);
        for (offset, entry) in entries.iter().enumerate() {
            let row = offset + 1;
            let code = entry.code.trim();
            if code.is_empty() {
                let key = format!("#{row}");
                let message = self
                    .messages
                    .series_row_error(&key, self.messages.missing_key());
                summary.fail(row, &key, message);
                continue;
            }
            match self.apply_series_entry(store, entry, code, &mut summary) {
                Ok(outcome) => summary.record(row, code, outcome),
                Err(reason) => {
                    summary.fail(row, code, self.messages.series_row_error(code, &reason));
                }
            }
        }
        summary
    }

    fn apply_series_entry<S: CatalogStore>(
        &self,
        store: &mut S,
        entry: &SeriesEntry,
        code: &str,
        summary: &mut ImportSummary,
    ) -> Result<RowOutcome, String> {
        let existing = store.series_by_code(code);
        if existing.is_some() && self.options.mode == ImportMode::Skip {
            return Ok(RowOutcome::Skipped);
        }

        if let Some(schema) = &entry.schema_definition {
            for issue in schema.check() {
                summary.notes.push(format!("series {code}: {issue}"));
            }
        }

        match existing {
            Some(mut series) => {
                if let Some(name) = &entry.name {
                    series.name = name.clone();
                }
                if entry.description.is_some() {
                    series.description = entry.description.clone();
                }
                if let Some(template_id) = &entry.template_id {
                    series.template_id = template_id.clone();
                }
                if let Some(schema) = &entry.schema_definition {
                    series.apply_schema_edit(schema.clone());
                }
                if entry.layout_config.is_some() {
                    series.layout_config = entry.layout_config.clone();
                }
                if let Some(sort_order) = entry.sort_order {
                    series.sort_order = sort_order;
                }
                store.put_series(series);
                Ok(RowOutcome::Updated)
            }
            None => {
                let code = SeriesCode::new(code).map_err(|err| err.to_string())?;
                let name = entry.name.clone().unwrap_or_else(|| code.to_string());
                let template_id = entry
                    .template_id
                    .as_deref()
                    .unwrap_or(self.options.default_template.as_str());
                let mut series = Series::new(code, name, template_id)
                    .with_schema(entry.schema_definition.clone().unwrap_or_default());
                series.description = entry.description.clone();
                series.layout_config = entry.layout_config.clone();
                series.sort_order = entry.sort_order.unwrap_or_default();
                store.put_series(series);
                Ok(RowOutcome::Created)
            }
        }
    }

    pub fn import_product_entries<S: CatalogStore>(
        &self,
        store: &mut S,
        entries: &[ProductEntry],
    ) -> ImportSummary {
        let span = tracing::info_span!("import_bundle", entity = PRODUCT_ENTITY, mode = %self.options.mode);
        let _guard = span.enter();

        let mut summary = ImportSummary::new(PRODUCT_ENTITY);
        for (offset, entry) in entries.iter().enumerate() {
            let row = offset + 1;
            let sku = entry.sku.trim();
            if sku.is_empty() {
                let key = format!("#{row}");
                let message = self
                    .messages
                    .product_row_error(&key, self.messages.missing_key());
                summary.fail(row, &key, message);
                continue;
            }
            match self.apply_product_entry(store, entry, sku) {
                Ok(outcome) => summary.record(row, sku, outcome),
                Err(reason) => {
                    summary.fail(row, sku, self.messages.product_row_error(sku, &reason));
                }
            }
        }
        summary
    }

    /// Specifications in the entry replace the stored bag. Part numbers are
    /// only taken for new products.
    fn apply_product_entry<S: CatalogStore>(
        &self,
        store: &mut S,
        entry: &ProductEntry,
        sku: &str,
    ) -> Result<RowOutcome, String> {
        let series = self.product_series(store, entry.series_code.trim())?;
        let existing = store.product_by_sku(sku);
        if existing.is_some() && self.options.mode == ImportMode::Skip {
            return Ok(RowOutcome::Skipped);
        }

        match existing {
            Some(mut product) => {
                if let Some(name) = &entry.name {
                    product.name = name.clone();
                }
                if entry.description.is_some() {
                    product.description = entry.description.clone();
                }
                product.series_id = series.id;
                product.specifications = entry.specifications.clone();
                product.status = entry.status.unwrap_or_default();
                product.version = product.version.saturating_add(1);
                store.put_product(product);
                Ok(RowOutcome::Updated)
            }
            None => {
                let sku = Sku::new(sku).map_err(|err| err.to_string())?;
                let name = entry.name.clone().unwrap_or_else(|| sku.to_string());
                let mut product = Product::new(sku, name, series.id)
                    .with_specifications(entry.specifications.clone());
                product.description = entry.description.clone();
                product.status = entry.status.unwrap_or_default();
                product.part_numbers = entry.part_numbers.clone();
                store.put_product(product);
                Ok(RowOutcome::Created)
            }
        }
    }
}

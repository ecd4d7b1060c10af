//! Persistence boundary for series and products.
//!
//! Records are addressable by id and by natural key (series code, SKU).
//! Reads hand back owned records; callers edit a copy and write it back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use catalog_model::{Product, RecordId, Series, SeriesCode, Sku};

use crate::error::StoreError;

pub trait CatalogStore {
    fn series_by_code(&self, code: &str) -> Option<Series>;
    fn series_by_id(&self, id: &RecordId) -> Option<Series>;
    fn product_by_sku(&self, sku: &str) -> Option<Product>;

    /// All series, inactive ones included, by sort order then code.
    fn list_series(&self) -> Vec<Series>;

    /// Series still in use, by sort order then code.
    fn active_series(&self) -> Vec<Series> {
        self.list_series()
            .into_iter()
            .filter(|series| series.is_active)
            .collect()
    }
    /// Products of one series, by SKU.
    fn products_of_series(&self, series_id: &RecordId) -> Vec<Product>;
    fn list_products(&self) -> Vec<Product>;

    /// Insert or replace by natural key.
    fn put_series(&mut self, series: Series);
    /// Insert or replace by natural key.
    fn put_product(&mut self, product: Product);

    /// Remove a series that owns no products.
    fn delete_series(&mut self, code: &str) -> Result<Series, StoreError>;

    /// Mark a series inactive. Its products and schema are kept.
    fn deactivate_series(&mut self, code: &str) -> Result<Series, StoreError> {
        let mut series = self
            .series_by_code(code)
            .ok_or_else(|| StoreError::SeriesNotFound {
                code: code.to_string(),
            })?;
        if series.is_active {
            series.deactivate();
            self.put_series(series.clone());
            tracing::info!(series = %series.code, "series deactivated");
        }
        Ok(series)
    }
    fn delete_product(&mut self, sku: &str) -> Result<Product, StoreError>;
}

/// Serializable contents of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub series: Vec<Series>,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    series: BTreeMap<SeriesCode, Series>,
    products: BTreeMap<Sku, Product>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let mut store = Self::new();
        for series in snapshot.series {
            store.put_series(series);
        }
        for product in snapshot.products {
            store.put_product(product);
        }
        store
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            series: self.list_series(),
            products: self.list_products(),
        }
    }
}

impl CatalogStore for MemoryStore {
    fn series_by_code(&self, code: &str) -> Option<Series> {
        let code = SeriesCode::new(code).ok()?;
        self.series.get(&code).cloned()
    }

    fn series_by_id(&self, id: &RecordId) -> Option<Series> {
        self.series.values().find(|series| series.id == *id).cloned()
    }

    fn product_by_sku(&self, sku: &str) -> Option<Product> {
        let sku = Sku::new(sku).ok()?;
        self.products.get(&sku).cloned()
    }

    fn list_series(&self) -> Vec<Series> {
        let mut series: Vec<Series> = self.series.values().cloned().collect();
        series.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.code.cmp(&b.code)));
        series
    }

    fn products_of_series(&self, series_id: &RecordId) -> Vec<Product> {
        self.products
            .values()
            .filter(|product| product.series_id == *series_id)
            .cloned()
            .collect()
    }

    fn list_products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    fn put_series(&mut self, series: Series) {
        self.series.insert(series.code.clone(), series);
    }

    fn put_product(&mut self, product: Product) {
        self.products.insert(product.sku.clone(), product);
    }

    fn delete_series(&mut self, code: &str) -> Result<Series, StoreError> {
        let not_found = || StoreError::SeriesNotFound {
            code: code.to_string(),
        };
        let key = SeriesCode::new(code).map_err(|_| not_found())?;
        let series = self.series.get(&key).ok_or_else(not_found)?;
        let products = self
            .products
            .values()
            .filter(|product| product.series_id == series.id)
            .count();
        if products > 0 {
            return Err(StoreError::SeriesInUse {
                code: key.to_string(),
                products,
            });
        }
        self.series.remove(&key).ok_or_else(not_found)
    }

    fn delete_product(&mut self, sku: &str) -> Result<Product, StoreError> {
        let not_found = || StoreError::ProductNotFound {
            sku: sku.to_string(),
        };
        let key = Sku::new(sku).map_err(|_| not_found())?;
        self.products.remove(&key).ok_or_else(not_found)
    }
}

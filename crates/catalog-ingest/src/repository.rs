//! JSON snapshot file backing a [`MemoryStore`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use catalog_model::{Product, RecordId, Series};

use crate::error::StoreError;
use crate::store::{CatalogSnapshot, CatalogStore, MemoryStore};

/// A catalog kept in one pretty-printed JSON file.
///
/// Changes stay in memory until [`JsonFileStore::save`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the snapshot at `path`. A missing file is an empty catalog.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "catalog file not found, starting empty");
            return Ok(Self {
                path,
                inner: MemoryStore::new(),
            });
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog from {}", path.display()))?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse catalog from {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            series = snapshot.series.len(),
            products = snapshot.products.len(),
            "catalog loaded"
        );
        Ok(Self {
            path,
            inner: MemoryStore::from_snapshot(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.inner.snapshot()
    }

    /// Write the current contents back to the file, creating parent
    /// directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.inner.snapshot())
            .context("Failed to serialize catalog")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write catalog to {}", self.path.display()))?;
        Ok(())
    }
}

impl CatalogStore for JsonFileStore {
    fn series_by_code(&self, code: &str) -> Option<Series> {
        self.inner.series_by_code(code)
    }

    fn series_by_id(&self, id: &RecordId) -> Option<Series> {
        self.inner.series_by_id(id)
    }

    fn product_by_sku(&self, sku: &str) -> Option<Product> {
        self.inner.product_by_sku(sku)
    }

    fn list_series(&self) -> Vec<Series> {
        self.inner.list_series()
    }

    fn products_of_series(&self, series_id: &RecordId) -> Vec<Product> {
        self.inner.products_of_series(series_id)
    }

    fn list_products(&self) -> Vec<Product> {
        self.inner.list_products()
    }

    fn put_series(&mut self, series: Series) {
        self.inner.put_series(series);
    }

    fn put_product(&mut self, product: Product) {
        self.inner.put_product(product);
    }

    fn delete_series(&mut self, code: &str) -> Result<Series, StoreError> {
        self.inner.delete_series(code)
    }

    fn delete_product(&mut self, sku: &str) -> Result<Product, StoreError> {
        self.inner.delete_product(sku)
    }
}

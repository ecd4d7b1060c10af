//! CSV and JSON import and export of catalog records.
//!
//! Product tables carry fixed base columns followed by one column per field
//! of the owning series' schema. Import is row-independent and reports an
//! [`ImportSummary`]; export is a view through the current schema. A
//! [`CatalogBundle`] moves whole series and products, schemas included.

#![deny(unsafe_code)]

mod bundle;
mod csv_table;
mod error;
mod export;
mod import;
mod repository;
mod store;

pub use bundle::{
    BUNDLE_VERSION, BundleScope, BundleSummary, CatalogBundle, ProductEntry, SeriesEntry,
    export_bundle,
};
pub use csv_table::CsvTable;
pub use error::{BundleError, CsvError, StoreError};
pub use export::{
    export_filename, export_filename_today, export_series, export_series_products,
    import_template,
};
pub use import::{ImportMode, ImportOptions, ImportSummary, Importer, RowOutcome, RowReport};
pub use repository::JsonFileStore;
pub use store::{CatalogSnapshot, CatalogStore, MemoryStore};

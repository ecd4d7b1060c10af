//! Current-schema CSV views of series and products.

use chrono::{Local, NaiveDate};

use catalog_map::{schema_cells, schema_headers};
use catalog_model::{Messages, Series};

use crate::csv_table::CsvTable;
use crate::error::StoreError;
use crate::store::CatalogStore;

/// Products of one series: base columns, then one column per field of the
/// series schema in declaration order. Values under keys the schema no
/// longer declares are not exported.
pub fn export_series_products<S: CatalogStore>(
    store: &S,
    code: &str,
    messages: Messages,
) -> Result<CsvTable, StoreError> {
    let series = store
        .series_by_code(code)
        .ok_or_else(|| StoreError::SeriesNotFound {
            code: code.to_string(),
        })?;
    let mut table = import_template(&series, messages);
    for product in store.products_of_series(&series.id) {
        let mut row = vec![
            product.sku.to_string(),
            product.name.clone(),
            series.code.to_string(),
            product.description.clone().unwrap_or_default(),
            product.status.to_string(),
        ];
        row.extend(schema_cells(&series.schema_definition, &product.specifications));
        table.push_row(row);
    }
    tracing::debug!(series = %series.code, rows = table.rows.len(), "products exported");
    Ok(table)
}

/// Active series with their base columns.
pub fn export_series<S: CatalogStore>(store: &S, messages: Messages) -> CsvTable {
    let headers = messages
        .series_headers()
        .iter()
        .map(|header| header.to_string())
        .collect();
    let mut table = CsvTable::new(headers);
    for series in store.active_series() {
        table.push_row(vec![
            series.code.to_string(),
            series.name,
            series.description.unwrap_or_default(),
            series.template_id,
            series.sort_order.to_string(),
        ]);
    }
    table
}

/// Header-only product table for one series, ready to be filled in.
pub fn import_template(series: &Series, messages: Messages) -> CsvTable {
    let mut headers: Vec<String> = messages
        .product_headers()
        .iter()
        .map(|header| header.to_string())
        .collect();
    headers.extend(schema_headers(&series.schema_definition));
    CsvTable::new(headers)
}

/// Suggested download name: `{entity}-{YYYY-MM-DD}.{extension}`.
pub fn export_filename(entity: &str, extension: &str, date: NaiveDate) -> String {
    format!("{entity}-{}.{extension}", date.format("%Y-%m-%d"))
}

pub fn export_filename_today(entity: &str, extension: &str) -> String {
    export_filename(entity, extension, Local::now().date_naive())
}

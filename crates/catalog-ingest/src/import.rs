//! Row-by-row import of series and products.
//!
//! Rows are independent: a row that cannot be applied is reported in the
//! summary and the remaining rows are still processed. Only a table that
//! cannot be read at all is an `Err`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use catalog_map::{CellCoercer, ColumnResolver, ResolvedColumn};
use catalog_model::{
    Locale, Messages, PRODUCT_ENTITY, Product, ProductStatus, SERIES_ENTITY, Series, SeriesCode,
    Sku,
};

use crate::csv_table::CsvTable;
use crate::error::CsvError;
use crate::store::CatalogStore;

/// What to do with a row whose natural key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Skip,
    Update,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Skip => "skip",
            ImportMode::Update => "update",
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(ImportMode::Skip),
            "update" => Ok(ImportMode::Update),
            _ => Err(format!("unknown import mode: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowOutcome {
    Created,
    Updated,
    Skipped,
    Error,
}

impl RowOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowOutcome::Created => "created",
            RowOutcome::Updated => "updated",
            RowOutcome::Skipped => "skipped",
            RowOutcome::Error => "error",
        }
    }
}

/// Outcome of one data row. `row` counts data rows from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    pub row: usize,
    pub key: String,
    pub outcome: RowOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub entity: String,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    /// One message per failed row, in row order, each naming the row's key.
    pub errors: Vec<String>,
    pub rows: Vec<RowReport>,
    /// Advisory notes: header suggestions and number cells stored as 0.
    pub notes: Vec<String>,
}

impl ImportSummary {
    pub(crate) fn new(entity: &str) -> Self {
        Self {
            entity: entity.to_string(),
            ..Self::default()
        }
    }

    pub fn succeeded(&self) -> usize {
        self.created + self.updated + self.skipped
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    /// The first `limit` error messages, followed by a count of the rest
    /// when some were left out.
    pub fn display_errors(&self, limit: usize, messages: Messages) -> Vec<String> {
        let mut shown: Vec<String> = self.errors.iter().take(limit).cloned().collect();
        if self.errors.len() > limit {
            shown.push(messages.more_errors(self.errors.len() - limit));
        }
        shown
    }

    pub(crate) fn record(&mut self, row: usize, key: &str, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created => self.created += 1,
            RowOutcome::Updated => self.updated += 1,
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Error => {}
        }
        self.rows.push(RowReport {
            row,
            key: key.to_string(),
            outcome,
            message: None,
        });
    }

    pub(crate) fn fail(&mut self, row: usize, key: &str, message: String) {
        tracing::warn!(row, key = %key, error = %message, "import row failed");
        self.errors.push(message.clone());
        self.rows.push(RowReport {
            row,
            key: key.to_string(),
            outcome: RowOutcome::Error,
            message: Some(message),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub mode: ImportMode,
    pub locale: Locale,
    /// Truthy literals for boolean cells besides `true` and `1`.
    pub yes_literals: Vec<String>,
    /// Template id for imported series whose template column is blank.
    pub default_template: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            mode: ImportMode::Skip,
            locale: Locale::default(),
            yes_literals: vec!["是".to_string(), "yes".to_string()],
            default_template: "layout-m8-standard".to_string(),
        }
    }
}

/// Base column positions, located by header in either locale.
struct BaseColumns {
    indexes: [Option<usize>; 5],
}

impl BaseColumns {
    fn locate(table: &CsvTable, zh: [&str; 5], en: [&str; 5]) -> Self {
        let mut indexes = [None; 5];
        for (slot, (zh, en)) in indexes.iter_mut().zip(zh.into_iter().zip(en)) {
            *slot = table.column(&[zh, en]);
        }
        Self { indexes }
    }

    fn require(&self, position: usize, header: &str) -> Result<usize, CsvError> {
        self.indexes[position].ok_or_else(|| CsvError::MissingBaseColumn {
            column: header.to_string(),
        })
    }

    fn contains(&self, index: usize) -> bool {
        self.indexes.contains(&Some(index))
    }

    /// Trimmed cell text; blank and absent cells are `None`.
    fn cell<'r>(&self, row: &'r [String], position: usize) -> Option<&'r str> {
        let index = self.indexes[position]?;
        row.get(index)
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }
}

/// A series resolved for the product rows that reference it.
struct SeriesColumns {
    series: Series,
    columns: Vec<ResolvedColumn>,
}

pub struct Importer {
    pub(crate) options: ImportOptions,
    pub(crate) messages: Messages,
    coercer: CellCoercer,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        let messages = Messages::new(options.locale);
        let coercer = CellCoercer::new(&options.yes_literals);
        Self {
            options,
            messages,
            coercer,
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Import product rows. Columns after the base ones are resolved against
    /// the schema of each row's series.
    pub fn import_products<S: CatalogStore>(
        &self,
        store: &mut S,
        text: &str,
    ) -> Result<ImportSummary, CsvError> {
        let span = tracing::info_span!("import", entity = PRODUCT_ENTITY, mode = %self.options.mode);
        let _guard = span.enter();

        let table = CsvTable::parse(text)?;
        let zh = Messages::new(Locale::ZhCn).product_headers();
        let en = Messages::new(Locale::En).product_headers();
        let base = BaseColumns::locate(&table, zh, en);
        base.require(0, zh[0])?;
        base.require(2, zh[2])?;

        let mut summary = ImportSummary::new(PRODUCT_ENTITY);
        let mut resolved: BTreeMap<String, SeriesColumns> = BTreeMap::new();

        for (offset, row) in table.rows.iter().enumerate() {
            let row_number = offset + 1;
            let Some(sku) = base.cell(row, 0) else {
                let key = format!("#{row_number}");
                let message = self
                    .messages
                    .product_row_error(&key, self.messages.missing_key());
                summary.fail(row_number, &key, message);
                continue;
            };
            let code = base.cell(row, 2).unwrap_or_default();

            if !resolved.contains_key(code) {
                let series = match self.product_series(store, code) {
                    Ok(series) => series,
                    Err(reason) => {
                        summary.fail(
                            row_number,
                            sku,
                            self.messages.product_row_error(sku, &reason),
                        );
                        continue;
                    }
                };
                let columns = self.resolve_columns(&table, &base, &series, &mut summary);
                resolved.insert(code.to_string(), SeriesColumns { series, columns });
            }
            let Some(target) = resolved.get(code) else {
                continue;
            };

            match self.apply_product_row(store, target, &base, row, row_number, sku, &mut summary) {
                Ok(outcome) => summary.record(row_number, sku, outcome),
                Err(reason) => {
                    summary.fail(row_number, sku, self.messages.product_row_error(sku, &reason));
                }
            }
        }

        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            errors = summary.failed(),
            "import finished"
        );
        Ok(summary)
    }

    /// The series a product row names. Inactive series take no products.
    pub(crate) fn product_series<S: CatalogStore>(
        &self,
        store: &S,
        code: &str,
    ) -> Result<Series, String> {
        match store.series_by_code(code) {
            None => Err(self.messages.series_not_found(code)),
            Some(series) if !series.is_active => Err(self.messages.series_inactive(code)),
            Some(series) => Ok(series),
        }
    }

    fn resolve_columns(
        &self,
        table: &CsvTable,
        base: &BaseColumns,
        series: &Series,
        summary: &mut ImportSummary,
    ) -> Vec<ResolvedColumn> {
        let resolver = ColumnResolver::new(&series.schema_definition);
        let columns: Vec<ResolvedColumn> = resolver
            .resolve_headers(&table.headers, 0)
            .into_iter()
            .filter(|column| !base.contains(column.index))
            .collect();
        for column in &columns {
            if let Some(suggestion) = &column.suggestion {
                summary.notes.push(format!(
                    "series {}: column \"{}\" matches no field label and is stored as `{}`; closest label is \"{}\" ({:.2})",
                    series.code,
                    column.header,
                    column.target.key(),
                    suggestion.label,
                    suggestion.score
                ));
            }
        }
        columns
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_product_row<S: CatalogStore>(
        &self,
        store: &mut S,
        target: &SeriesColumns,
        base: &BaseColumns,
        row: &[String],
        row_number: usize,
        sku: &str,
        summary: &mut ImportSummary,
    ) -> Result<RowOutcome, String> {
        let existing = store.product_by_sku(sku);
        if existing.is_some() && self.options.mode == ImportMode::Skip {
            return Ok(RowOutcome::Skipped);
        }

        let status = base
            .cell(row, 4)
            .map(str::parse::<ProductStatus>)
            .transpose()
            .map_err(|err| err.to_string())?;

        let mapped = self.coercer.map_row(&target.columns, row);
        for cell in &mapped.defaulted {
            tracing::warn!(
                row = row_number,
                sku = %sku,
                field = %cell.key,
                raw = %cell.raw,
                "number cell did not parse; stored 0"
            );
            summary.notes.push(format!(
                "row {row_number} ({sku}): `{}` value \"{}\" is not a number; stored 0",
                cell.key, cell.raw
            ));
        }

        let name = base.cell(row, 1);
        let description = base.cell(row, 3).map(str::to_string);
        match existing {
            Some(mut product) => {
                if let Some(name) = name {
                    product.name = name.to_string();
                }
                if description.is_some() {
                    product.description = description;
                }
                if let Some(status) = status {
                    product.status = status;
                }
                product.series_id = target.series.id;
                product.specifications.merge(mapped.values);
                product.version = product.version.saturating_add(1);
                store.put_product(product);
                Ok(RowOutcome::Updated)
            }
            None => {
                let sku = Sku::new(sku).map_err(|err| err.to_string())?;
                let mut product = Product::new(sku, name.unwrap_or_default(), target.series.id)
                    .with_specifications(mapped.values);
                if product.name.is_empty() {
                    product.name = product.sku.to_string();
                }
                product.description = description;
                product.status = status.unwrap_or_default();
                store.put_product(product);
                Ok(RowOutcome::Created)
            }
        }
    }

    /// Import series rows (code, name, description, template id, sort order).
    /// Schemas are not part of the table.
    pub fn import_series<S: CatalogStore>(
        &self,
        store: &mut S,
        text: &str,
    ) -> Result<ImportSummary, CsvError> {
        let span = tracing::info_span!("import", entity = SERIES_ENTITY, mode = %self.options.mode);
        let _guard = span.enter();

        let table = CsvTable::parse(text)?;
        let zh = Messages::new(Locale::ZhCn).series_headers();
        let en = Messages::new(Locale::En).series_headers();
        let base = BaseColumns::locate(&table, zh, en);
        base.require(0, zh[0])?;

        let mut summary = ImportSummary::new(SERIES_ENTITY);
        for (offset, row) in table.rows.iter().enumerate() {
            let row_number = offset + 1;
            let Some(code) = base.cell(row, 0) else {
                let key = format!("#{row_number}");
                let message = self
                    .messages
                    .series_row_error(&key, self.messages.missing_key());
                summary.fail(row_number, &key, message);
                continue;
            };
            match self.apply_series_row(store, &base, row, code) {
                Ok(outcome) => summary.record(row_number, code, outcome),
                Err(reason) => {
                    summary.fail(row_number, code, self.messages.series_row_error(code, &reason));
                }
            }
        }

        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            errors = summary.failed(),
            "import finished"
        );
        Ok(summary)
    }

    fn apply_series_row<S: CatalogStore>(
        &self,
        store: &mut S,
        base: &BaseColumns,
        row: &[String],
        code: &str,
    ) -> Result<RowOutcome, String> {
        let existing = store.series_by_code(code);
        if existing.is_some() && self.options.mode == ImportMode::Skip {
            return Ok(RowOutcome::Skipped);
        }

        let sort_order = base
            .cell(row, 4)
            .map(|raw| {
                raw.parse::<i32>()
                    .map_err(|_| format!("invalid sort order {raw:?}"))
            })
            .transpose()?;
        let name = base.cell(row, 1);
        let description = base.cell(row, 2).map(str::to_string);
        let template_id = base.cell(row, 3);

        match existing {
            Some(mut series) => {
                if let Some(name) = name {
                    series.name = name.to_string();
                }
                if description.is_some() {
                    series.description = description;
                }
                if let Some(template_id) = template_id {
                    series.template_id = template_id.to_string();
                }
                if let Some(sort_order) = sort_order {
                    series.sort_order = sort_order;
                }
                store.put_series(series);
                Ok(RowOutcome::Updated)
            }
            None => {
                let code = SeriesCode::new(code).map_err(|err| err.to_string())?;
                let name = name.unwrap_or(code.as_str()).to_string();
                let template_id = template_id.unwrap_or(self.options.default_template.as_str());
                let mut series = Series::new(code, name, template_id);
                series.description = description;
                series.sort_order = sort_order.unwrap_or_default();
                store.put_series(series);
                Ok(RowOutcome::Created)
            }
        }
    }
}

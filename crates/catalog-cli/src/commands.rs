use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, info_span, warn};

use catalog_ingest::{
    BundleScope, CatalogBundle, CatalogStore, ImportSummary, Importer, JsonFileStore, StoreError,
    export_bundle, export_filename_today, export_series, export_series_products, import_template,
};
use catalog_model::{Product, ProductWithRelations, SchemaIssue, Series};
use catalog_report::{LayoutXmlWriter, builtin_registry};
use catalog_template::{DocumentWriter, TemplateRegistry};
use catalog_validate::Validator;

use crate::cli::{
    DeactivateArgs, EntityArg, ExportArgs, FormatArg, ImportArgs, RenderArgs, SchemaCheckArgs,
    TemplateArgs, ValidateArgs,
};
use crate::config::CatalogConfig;

/// The catalog file, the configuration and the template registry, loaded
/// once per invocation.
pub struct Catalog {
    store: JsonFileStore,
    config: CatalogConfig,
    registry: TemplateRegistry,
}

impl Catalog {
    pub fn open(path: &Path, config: CatalogConfig) -> Result<Self> {
        let store = JsonFileStore::open(path)?;
        let registry = builtin_registry(Some(config.fallback_template.as_str()))
            .context("Failed to register built-in templates")?;
        Ok(Self {
            store,
            config,
            registry,
        })
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    fn series(&self, code: &str) -> Result<Series, StoreError> {
        self.store
            .series_by_code(code)
            .ok_or_else(|| StoreError::SeriesNotFound {
                code: code.to_string(),
            })
    }

    fn product_with_relations(&self, sku: &str) -> Result<ProductWithRelations, StoreError> {
        let product = self
            .store
            .product_by_sku(sku)
            .ok_or_else(|| StoreError::ProductNotFound {
                sku: sku.to_string(),
            })?;
        let series = self.store.series_by_id(&product.series_id);
        Ok(ProductWithRelations::new(product, series))
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub checked: usize,
    pub failures: Vec<ProductFailure>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Failing fields of one product, as (label or key, message).
#[derive(Debug)]
pub struct ProductFailure {
    pub sku: String,
    pub series: String,
    pub errors: Vec<(String, String)>,
}

pub fn run_validate(catalog: &Catalog, args: &ValidateArgs) -> Result<ValidationReport> {
    let products: Vec<Product> = match (&args.sku, &args.series) {
        (Some(sku), _) => vec![catalog.product_with_relations(sku)?.product],
        (None, Some(code)) => {
            let series = catalog.series(code)?;
            catalog.store.products_of_series(&series.id)
        }
        (None, None) => catalog.store.list_products(),
    };

    let locale = catalog.config.locale;
    let messages = catalog.config.messages();
    let mut validators: BTreeMap<String, Validator> = BTreeMap::new();
    let mut report = ValidationReport::default();
    for product in products {
        report.checked += 1;
        let Some(series) = catalog.store.series_by_id(&product.series_id) else {
            report.failures.push(ProductFailure {
                sku: product.sku.to_string(),
                series: "-".to_string(),
                errors: vec![(
                    "-".to_string(),
                    messages.schema_missing_detail().to_string(),
                )],
            });
            continue;
        };
        let code = series.code.to_string();
        if !validators.contains_key(&code) {
            let validator = Validator::with_locale(&series.schema_definition, locale)
                .with_context(|| format!("Series {code} has an invalid schema"))?;
            validators.insert(code.clone(), validator);
        }
        let Some(validator) = validators.get(&code) else {
            continue;
        };
        let errors = validator.validate(&product.specifications);
        if errors.is_empty() {
            continue;
        }
        let errors = errors
            .iter()
            .map(|(key, message)| {
                let label = series
                    .schema_definition
                    .field(key)
                    .map_or(key, |field| field.label.as_str());
                (label.to_string(), message.to_string())
            })
            .collect();
        report.failures.push(ProductFailure {
            sku: product.sku.to_string(),
            series: code,
            errors,
        });
    }
    info!(
        checked = report.checked,
        failing = report.failures.len(),
        "validation finished"
    );
    Ok(report)
}

/// Structural issues per series; series without issues are left out.
pub fn run_schema_check(
    catalog: &Catalog,
    args: &SchemaCheckArgs,
) -> Result<Vec<(String, Vec<SchemaIssue>)>> {
    let series = match &args.series {
        Some(code) => vec![catalog.series(code)?],
        None => catalog.store.list_series(),
    };
    Ok(series
        .into_iter()
        .filter_map(|series| {
            let issues = series.schema_definition.check();
            (!issues.is_empty()).then(|| (series.code.to_string(), issues))
        })
        .collect())
}

/// One summary per entity kind read from the file.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub summaries: Vec<ImportSummary>,
}

impl ImportReport {
    pub fn failed(&self) -> usize {
        self.summaries.iter().map(ImportSummary::failed).sum()
    }
}

/// Import the file and save the catalog unless this is a dry run.
pub fn run_import(catalog: &mut Catalog, args: &ImportArgs) -> Result<ImportReport> {
    let span = info_span!("import_file", file = %args.file.display());
    let _guard = span.enter();

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let importer = Importer::new(catalog.config.import_options(args.mode.map(Into::into)));
    let format = FormatArg::resolve(args.format, Some(&args.file), args.entity);
    let summaries = match (format, args.entity) {
        (FormatArg::Csv, EntityArg::Products) => {
            vec![importer.import_products(&mut catalog.store, &text)?]
        }
        (FormatArg::Csv, EntityArg::Series) => {
            vec![importer.import_series(&mut catalog.store, &text)?]
        }
        (FormatArg::Csv, EntityArg::All) => {
            anyhow::bail!("`all` can only be imported from a JSON catalog bundle")
        }
        (FormatArg::Json, EntityArg::All) => {
            let summary = importer.import_bundle(&mut catalog.store, &text)?;
            vec![summary.series, summary.products]
        }
        (FormatArg::Json, EntityArg::Series) => {
            let bundle = CatalogBundle::from_json_str(&text)?;
            let entries = bundle.series.unwrap_or_default();
            vec![importer.import_series_entries(&mut catalog.store, &entries)]
        }
        (FormatArg::Json, EntityArg::Products) => {
            let bundle = CatalogBundle::from_json_str(&text)?;
            let entries = bundle.products.unwrap_or_default();
            vec![importer.import_product_entries(&mut catalog.store, &entries)]
        }
    };

    if args.dry_run {
        info!("dry run, catalog not saved");
    } else {
        catalog.store.save()?;
        info!(path = %catalog.store.path().display(), "catalog saved");
    }
    Ok(ImportReport { summaries })
}

pub fn run_export(catalog: &Catalog, args: &ExportArgs) -> Result<PathBuf> {
    let format = FormatArg::resolve(args.format, args.output.as_deref(), args.entity);
    let path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(export_filename_today(args.entity.as_str(), format.extension()))
    });
    let contents = match format {
        FormatArg::Csv => export_table(catalog, args)?,
        FormatArg::Json => export_json(catalog, args)?,
    };
    write_text(&path, &contents)?;
    info!(path = %path.display(), format = format.extension(), "export written");
    Ok(path)
}

fn export_table(catalog: &Catalog, args: &ExportArgs) -> Result<String> {
    let messages = catalog.config.messages();
    let table = match (args.entity, &args.series) {
        (EntityArg::Products, Some(code)) => {
            export_series_products(&catalog.store, code, messages)?
        }
        (EntityArg::Products, None) => anyhow::bail!("--series is required to export products"),
        (EntityArg::Series, _) => export_series(&catalog.store, messages),
        (EntityArg::All, _) => anyhow::bail!("`all` can only be exported as a JSON catalog bundle"),
    };
    debug!(rows = table.rows.len(), "table exported");
    Ok(table.to_csv_string()?)
}

fn export_json(catalog: &Catalog, args: &ExportArgs) -> Result<String> {
    let scope = match args.entity {
        EntityArg::Products => BundleScope::Products,
        EntityArg::Series => BundleScope::Series,
        EntityArg::All => BundleScope::All,
    };
    let mut bundle = export_bundle(&catalog.store, scope, Utc::now());
    if let (Some(code), Some(products)) = (&args.series, bundle.products.as_mut()) {
        let code = catalog.series(code)?.code;
        products.retain(|entry| entry.series_code == code.as_str());
    }
    Ok(bundle.to_json_pretty()?)
}

/// Deactivate a series and save the catalog.
pub fn run_deactivate(catalog: &mut Catalog, args: &DeactivateArgs) -> Result<Series> {
    let series = catalog.store.deactivate_series(&args.series)?;
    catalog.store.save()?;
    Ok(series)
}

pub fn run_template(catalog: &Catalog, args: &TemplateArgs) -> Result<PathBuf> {
    let series = catalog.series(&args.series)?;
    let table = import_template(&series, catalog.config.messages());
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}-template.csv", series.code)));
    write_text(&path, &table.to_csv_string()?)?;
    Ok(path)
}

#[derive(Debug)]
pub struct RenderOutcome {
    pub path: PathBuf,
    /// The document is an error panel or carries an error notice.
    pub has_error: bool,
}

pub fn run_render(catalog: &Catalog, args: &RenderArgs) -> Result<RenderOutcome> {
    let product = catalog.product_with_relations(&args.sku)?;
    let document = catalog
        .registry
        .render_product(&product, args.page, catalog.config.messages());
    let has_error = document.has_error();
    if has_error {
        warn!(sku = %args.sku, "data sheet rendered with errors");
    }

    let writer = LayoutXmlWriter;
    let path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!("{}.{}", product.product.sku, writer.file_extension()))
    });
    let bytes = writer.to_bytes(&document)?;
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), content_type = writer.content_type(), "data sheet written");
    Ok(RenderOutcome { path, has_error })
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

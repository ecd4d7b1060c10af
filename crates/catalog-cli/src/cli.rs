//! CLI argument definitions for the catalog tool.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use catalog_ingest::ImportMode;

#[derive(Parser)]
#[command(
    name = "catalog",
    version,
    about = "Product catalog - schema-driven specifications, CSV import/export and data sheets",
    long_about = "Manage a product catalog whose specification fields are defined per series.\n\n\
                  Validates products against their series schema, moves series and products\n\
                  through CSV, and renders data sheets with the registered templates."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the JSON catalog file (series and products).
    #[arg(
        long = "catalog",
        value_name = "PATH",
        default_value = "catalog.json",
        global = true
    )]
    pub catalog: PathBuf,

    /// Configuration file (default: ./catalog.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate product specifications against their series schema.
    Validate(ValidateArgs),

    /// Check series schemas for structural problems.
    SchemaCheck(SchemaCheckArgs),

    /// Import series or products from a CSV file or a JSON catalog bundle.
    Import(ImportArgs),

    /// Export series or products to CSV or a JSON catalog bundle.
    Export(ExportArgs),

    /// Retire a series: it is no longer exported and takes no new products.
    Deactivate(DeactivateArgs),

    /// Write an empty product CSV with the columns of a series.
    Template(TemplateArgs),

    /// List the registered data sheet templates.
    Templates,

    /// Render the data sheet of one product.
    Render(RenderArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Only validate products of this series.
    #[arg(long = "series", value_name = "CODE")]
    pub series: Option<String>,

    /// Only validate this product.
    #[arg(long = "sku", value_name = "SKU", conflicts_with = "series")]
    pub sku: Option<String>,
}

#[derive(Parser)]
pub struct SchemaCheckArgs {
    /// Only check this series.
    #[arg(long = "series", value_name = "CODE")]
    pub series: Option<String>,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// What the rows describe.
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// CSV or JSON file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// File format (default: from the file extension).
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Handling of rows whose key already exists (default from config).
    #[arg(long = "mode", value_enum)]
    pub mode: Option<ImportModeArg>,

    /// Report what would change without saving the catalog.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// What to export.
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Series whose products are exported (required for CSV products).
    #[arg(long = "series", value_name = "CODE")]
    pub series: Option<String>,

    /// File format (default: from the output extension, JSON for `all`).
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Output file (default: <entity>-<date>.<ext> in the current directory).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DeactivateArgs {
    /// Series to deactivate.
    #[arg(value_name = "CODE")]
    pub series: String,
}

#[derive(Parser)]
pub struct TemplateArgs {
    /// Series whose schema provides the columns.
    #[arg(long = "series", value_name = "CODE")]
    pub series: String,

    /// Output file (default: <series>-template.csv).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Product to render.
    #[arg(long = "sku", value_name = "SKU")]
    pub sku: String,

    /// Page number printed on the sheet.
    #[arg(long = "page", value_name = "N")]
    pub page: Option<u32>,

    /// Output file (default: <sku>.xml).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    Products,
    Series,
    /// Series and products together (JSON only).
    All,
}

impl EntityArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityArg::Products => "products",
            EntityArg::Series => "series",
            EntityArg::All => "all",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl FormatArg {
    /// The explicit format, else the one named by the file extension. `all`
    /// only exists as JSON.
    pub fn resolve(explicit: Option<Self>, path: Option<&Path>, entity: EntityArg) -> Self {
        if let Some(format) = explicit {
            return format;
        }
        let extension = path
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => FormatArg::Json,
            Some("csv") => FormatArg::Csv,
            _ if entity == EntityArg::All => FormatArg::Json,
            _ => FormatArg::Csv,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FormatArg::Csv => "csv",
            FormatArg::Json => "json",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ImportModeArg {
    /// Leave existing records untouched.
    Skip,
    /// Merge the row into the existing record.
    Update,
}

impl From<ImportModeArg> for ImportMode {
    fn from(mode: ImportModeArg) -> Self {
        match mode {
            ImportModeArg::Skip => ImportMode::Skip,
            ImportModeArg::Update => ImportMode::Update,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_flag_then_extension() {
        let json = Path::new("catalog.JSON");
        let csv = Path::new("products.csv");
        assert_eq!(
            FormatArg::resolve(None, Some(json), EntityArg::Products),
            FormatArg::Json
        );
        assert_eq!(
            FormatArg::resolve(None, Some(csv), EntityArg::Products),
            FormatArg::Csv
        );
        assert_eq!(
            FormatArg::resolve(Some(FormatArg::Csv), Some(json), EntityArg::Series),
            FormatArg::Csv
        );
        assert_eq!(FormatArg::resolve(None, None, EntityArg::All), FormatArg::Json);
        assert_eq!(FormatArg::resolve(None, None, EntityArg::Series), FormatArg::Csv);
    }

    #[test]
    fn deactivate_takes_a_series_code() {
        let cli = Cli::try_parse_from(["catalog", "deactivate", "M8-COMPACT"]).unwrap();
        assert!(matches!(cli.command, Command::Deactivate(args) if args.series == "M8-COMPACT"));
    }
}

use thiserror::Error;

/// The table as a whole could not be read or written.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("csv parse error at line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("csv write error: {0}")]
    Write(#[from] csv::Error),
    #[error("csv output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("csv writer could not be flushed: {0}")]
    Io(#[from] std::io::Error),
    #[error("table has no header row")]
    MissingHeader,
    #[error("table has no `{column}` column")]
    MissingBaseColumn { column: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("series {code} not found")]
    SeriesNotFound { code: String },
    #[error("product {sku} not found")]
    ProductNotFound { sku: String },
    #[error("series {code} still owns {products} product(s); deactivate it instead")]
    SeriesInUse { code: String, products: usize },
}

/// A JSON catalog bundle could not be read or written.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("invalid catalog bundle: {0}")]
    Json(#[from] serde_json::Error),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid series code: {0:?}")]
    InvalidSeriesCode(String),
    #[error("invalid sku: {0:?}")]
    InvalidSku(String),
    #[error("invalid product status: {0:?}")]
    InvalidStatus(String),
    #[error("invalid record id: {0:?}")]
    InvalidRecordId(String),
    #[error("invalid json value: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;

pub mod check;
pub mod error;
pub mod ids;
pub mod layout;
pub mod messages;
pub mod record;
pub mod schema;
pub mod value;

pub use check::SchemaIssue;
pub use error::{ModelError, Result};
pub use ids::{RecordId, SeriesCode, Sku};
pub use layout::{LayoutConfig, Margins, Orientation, PageSize};
pub use messages::{Locale, Messages};
pub use record::{
    PRODUCT_ENTITY, PartNumber, Product, ProductAsset, ProductStatus, ProductWithRelations,
    SERIES_ENTITY, Series,
};
pub use schema::{
    FieldOption, FieldType, FieldValidation, SchemaField, SchemaGroup, SeriesSchemaDefinition,
    ShowWhen, ShowWhenOperator, is_valid_field_key, normalize_field_key,
};
pub use value::{SpecValue, ValueBag, format_numeric, parse_f64};

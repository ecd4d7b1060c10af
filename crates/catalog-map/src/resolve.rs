//! Resolution of table headers to schema fields.

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use serde::Serialize;

use catalog_model::{FieldType, SeriesSchemaDefinition};

use crate::utils::{clean_header, derive_key, normalize_text};

/// Minimum similarity for a label to be offered as a suggestion.
pub const SUGGESTION_MIN_SCORE: f64 = 0.85;

/// Where the values of one column go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTarget {
    /// The header equals a field label; values are coerced by the field type.
    Field { key: String, field_type: FieldType },
    /// No label matched; values are stored verbatim under a derived key.
    Derived { key: String },
}

impl ColumnTarget {
    pub fn key(&self) -> &str {
        match self {
            ColumnTarget::Field { key, .. } | ColumnTarget::Derived { key } => key,
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self, ColumnTarget::Field { .. })
    }
}

/// Closest schema label to a header that did not match exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSuggestion {
    pub label: String,
    pub key: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedColumn {
    /// Position of the column in the table.
    pub index: usize,
    pub header: String,
    pub target: ColumnTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<LabelSuggestion>,
}

/// Resolves the non-base headers of a table against one series schema.
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver<'a> {
    schema: &'a SeriesSchemaDefinition,
    min_suggestion_score: f64,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(schema: &'a SeriesSchemaDefinition) -> Self {
        Self {
            schema,
            min_suggestion_score: SUGGESTION_MIN_SCORE,
        }
    }

    #[must_use]
    pub fn with_min_suggestion_score(mut self, score: f64) -> Self {
        self.min_suggestion_score = score;
        self
    }

    /// Exact label match first, derived key otherwise.
    pub fn resolve(&self, header: &str) -> ColumnTarget {
        let header = clean_header(header);
        match self.schema.field_by_label(header) {
            Some(field) => ColumnTarget::Field {
                key: field.key.clone(),
                field_type: field.field_type,
            },
            None => ColumnTarget::Derived {
                key: derive_key(header),
            },
        }
    }

    /// Resolve headers that start at `offset` in the table (the base columns
    /// come first and are handled by the caller).
    pub fn resolve_headers(&self, headers: &[String], offset: usize) -> Vec<ResolvedColumn> {
        headers
            .iter()
            .enumerate()
            .skip(offset)
            .filter(|(_, header)| !clean_header(header).is_empty())
            .map(|(index, header)| {
                let target = self.resolve(header);
                let suggestion = if target.is_field() {
                    None
                } else {
                    self.suggest(header)
                };
                if let Some(suggestion) = &suggestion {
                    tracing::debug!(
                        header = %header,
                        label = %suggestion.label,
                        score = suggestion.score,
                        "header resembles a schema label"
                    );
                }
                ResolvedColumn {
                    index,
                    header: clean_header(header).to_string(),
                    target,
                    suggestion,
                }
            })
            .collect()
    }

    /// Closest label by Jaro-Winkler similarity, if it clears the threshold.
    pub fn suggest(&self, header: &str) -> Option<LabelSuggestion> {
        let normalized = normalize_text(header);
        if normalized.is_empty() {
            return None;
        }
        self.schema
            .fields
            .iter()
            .map(|field| {
                let score = jaro_similarity(normalized.chars(), normalize_text(&field.label).chars());
                (field, score)
            })
            .filter(|(_, score)| *score >= self.min_suggestion_score)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(field, score)| LabelSuggestion {
                label: field.label.clone(),
                key: field.key.clone(),
                score,
            })
    }
}

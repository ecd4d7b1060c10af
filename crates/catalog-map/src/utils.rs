//! Utility functions for header handling.

/// Normalizes text for comparison by lowercasing and replacing separators with spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key stored for a header that matches no schema label: lowercase, with
/// runs of whitespace turned into `_`.
pub fn derive_key(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Trims whitespace and a leading byte-order mark from a header cell.
pub fn clean_header(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}

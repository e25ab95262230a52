//! Structured-field predicates.

use crate::normalize::fold_chars;

/// Category query value that matches every row.
///
/// Reserved: together with [`ALL_SENTINEL_ALIAS`] it always means "every
/// category", so an inventory category literally named `All` or `Tutte`
/// cannot be selected on its own.
pub const ALL_SENTINEL: &str = "all";

/// Italian spelling of [`ALL_SENTINEL`], accepted when parsing user input.
pub const ALL_SENTINEL_ALIAS: &str = "tutte";

/// Substring test on pre-normalized values.
///
/// An empty query is a wildcard. The query is matched literally; no
/// pattern syntax is interpreted.
#[inline]
pub fn matches_substring(normalized_field: &str, normalized_query: &str) -> bool {
    normalized_query.is_empty() || normalized_field.contains(normalized_query)
}

/// Exact equality after normalization, or the [`ALL_SENTINEL`] wildcard.
///
/// Compares folded characters lazily, so pre-normalized inputs cost a plain
/// character walk and raw inputs (`"Motori"`) still compare correctly.
pub fn matches_exact(normalized_field: &str, normalized_query: &str) -> bool {
    if fold_chars(normalized_query).eq(ALL_SENTINEL.chars()) {
        return true;
    }
    normalized_field == normalized_query
        || fold_chars(normalized_field).eq(fold_chars(normalized_query))
}

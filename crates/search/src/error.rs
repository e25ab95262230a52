//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while building a query.
///
/// Evaluating a query never fails; only constructing one with out-of-range
/// tuning parameters does.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Invalid query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

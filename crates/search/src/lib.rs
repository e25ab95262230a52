//! Search and ranking engine for the spare-parts inventory.
//!
//! This crate provides:
//! - Accent and case folding of every comparable field
//! - Substring and exact field predicates
//! - Two-stage description matching (word prefilter, then bounded partial similarity)
//! - Highlighting of query words in display text
//! - One-pass filtering of a dataset and pagination of the result
//!
//! # Example
//!
//! ```
//! use ricambi_search::{apply_filters, Dataset, Query, Record};
//!
//! let dataset = Dataset::new(vec![
//!     Record::new(Some("C100"), Some("Cuscinetto a sfera 608"), Some("A1"), Some("Motori")),
//!     Record::new(Some("C200"), Some("Filtro olio"), Some("B2"), Some("Filtri")),
//! ]);
//!
//! let query = Query::builder().description("sfera 608").build().unwrap();
//! let result = apply_filters(&dataset, &query);
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.rows()[0].code, "C100");
//! ```

mod description;
mod error;
mod field;
mod filter;
mod fuzzy;
mod highlight;
mod normalize;
mod paginate;
mod query;
mod record;

pub use description::{DescriptionMatcher, DescriptionOutcome, FuzzyStage};
pub use error::{Result, SearchError};
pub use field::{matches_exact, matches_substring, ALL_SENTINEL, ALL_SENTINEL_ALIAS};
pub use filter::{apply_filters, FilterStats, MatchResult};
pub use fuzzy::{indel_similarity, partial_similarity};
pub use highlight::{highlight, highlight_spans, highlight_with, MARK_CLOSE, MARK_OPEN};
pub use normalize::{normalize, normalize_optional, tokenize};
pub use paginate::{clamp_page, paginate, total_pages, Page};
pub use query::{CategoryFilter, Query, QueryBuilder, WordMode};
pub use record::{Dataset, Field, NormalizedFields, Record};

/// Default minimum partial similarity (percent) a candidate must reach.
pub const DEFAULT_SIMILARITY_THRESHOLD: u8 = 70;

/// Default ceiling on prefiltered rows eligible for similarity scoring.
pub const DEFAULT_CANDIDATE_ROW_LIMIT: usize = 800;

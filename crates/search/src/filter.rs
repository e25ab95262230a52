//! Filter orchestration: one pass over the dataset per query.

use serde::Serialize;

use crate::description::{DescriptionMatcher, FuzzyStage};
use crate::field::{matches_exact, matches_substring};
use crate::normalize::normalize;
use crate::paginate::{paginate, Page};
use crate::query::Query;
use crate::record::{Dataset, Record};

/// Row counts at each step of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    /// Rows in the dataset
    pub scanned: usize,
    /// Rows passing code, category and location
    pub after_fields: usize,
    /// Rows passing the description word prefilter
    pub after_words: usize,
    pub fuzzy: FuzzyStage,
}

/// Filtered rows in original dataset order.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    rows: Vec<&'a Record>,
    stats: FilterStats,
}

impl<'a> MatchResult<'a> {
    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<&'a Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    /// Slice one page of the result; the page number is clamped.
    pub fn page(&self, page: usize, page_size: usize) -> Page<'_, &'a Record> {
        paginate(&self.rows, page, page_size)
    }
}

/// Evaluate `query` against `dataset`.
///
/// Every active criterion must hold. The cheap field predicates run first
/// so that the description matcher only sees rows that already passed them.
/// An empty query returns the whole dataset.
pub fn apply_filters<'a>(dataset: &'a Dataset, query: &Query) -> MatchResult<'a> {
    let scanned = dataset.len();

    if query.is_empty() {
        return MatchResult {
            rows: dataset.records().iter().collect(),
            stats: FilterStats {
                scanned,
                after_fields: scanned,
                after_words: scanned,
                fuzzy: FuzzyStage::Inactive,
            },
        };
    }

    let code = normalize(query.code());
    let location = normalize(query.location());
    let category = query.category().normalized();

    let rows: Vec<&'a Record> = dataset
        .records()
        .iter()
        .filter(|r| {
            let n = r.normalized();
            matches_substring(&n.code, &code)
                && matches_exact(&n.category, &category)
                && matches_substring(&n.location, &location)
        })
        .collect();
    let after_fields = rows.len();

    let outcome = DescriptionMatcher::from_query(query).apply(rows);

    let stats = FilterStats {
        scanned,
        after_fields,
        after_words: outcome.prefiltered,
        fuzzy: outcome.fuzzy,
    };
    tracing::debug!(
        scanned,
        after_fields,
        after_words = stats.after_words,
        matched = outcome.rows.len(),
        "Filters applied"
    );

    MatchResult {
        rows: outcome.rows,
        stats,
    }
}

//! Two-stage description matching.
//!
//! Stage 1 keeps rows whose normalized description contains the query
//! words (all of them or any of them). Stage 2 scores the survivors with
//! [`partial_similarity`] against the whole normalized query and drops
//! those under the threshold. Scoring is expensive, so stage 2 only runs
//! when stage 1 leaves at most `candidate_row_limit` rows; otherwise the
//! word-filtered rows are returned as they are.

use serde::Serialize;

use crate::fuzzy::partial_similarity;
use crate::normalize::{normalize, tokenize};
use crate::query::{Query, WordMode};
use crate::record::Record;

/// What happened to the similarity stage during one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyStage {
    /// No description criterion, nothing to score
    Inactive,
    /// Too many candidates; word-filtered rows returned unscored
    Skipped,
    /// Candidates were scored against the threshold
    Applied,
}

/// Rows surviving the description matcher, with stage bookkeeping.
#[derive(Debug, Clone)]
pub struct DescriptionOutcome<'a> {
    /// Surviving rows, input order preserved
    pub rows: Vec<&'a Record>,
    /// Rows left after the word prefilter
    pub prefiltered: usize,
    pub fuzzy: FuzzyStage,
}

/// Description matcher prepared from one query.
#[derive(Debug, Clone)]
pub struct DescriptionMatcher {
    tokens: Vec<String>,
    normalized_query: String,
    mode: WordMode,
    threshold: u8,
    candidate_row_limit: usize,
}

impl DescriptionMatcher {
    /// Prepare a matcher; tokenizes and normalizes the query once.
    pub fn new(query: &str, mode: WordMode, threshold: u8, candidate_row_limit: usize) -> Self {
        Self {
            tokens: tokenize(query),
            normalized_query: normalize(query),
            mode,
            threshold,
            candidate_row_limit,
        }
    }

    pub fn from_query(query: &Query) -> Self {
        Self::new(
            query.description(),
            query.word_mode(),
            query.similarity_threshold(),
            query.candidate_row_limit(),
        )
    }

    /// False when the query has no tokens; the matcher then passes everything.
    pub fn is_active(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Stage 1 word test on one normalized description.
    pub fn words_match(&self, normalized_description: &str) -> bool {
        if self.tokens.is_empty() {
            return true;
        }
        let mut tokens = self.tokens.iter();
        match self.mode {
            WordMode::AllWords => tokens.all(|t| normalized_description.contains(t.as_str())),
            WordMode::AnyWord => tokens.any(|t| normalized_description.contains(t.as_str())),
        }
    }

    /// Stage 2 score of one normalized description.
    pub fn score(&self, normalized_description: &str) -> u8 {
        partial_similarity(&self.normalized_query, normalized_description)
    }

    /// Run both stages over `rows`, preserving their order.
    pub fn apply<'a>(&self, rows: Vec<&'a Record>) -> DescriptionOutcome<'a> {
        if !self.is_active() {
            let prefiltered = rows.len();
            return DescriptionOutcome {
                rows,
                prefiltered,
                fuzzy: FuzzyStage::Inactive,
            };
        }

        let candidates: Vec<&'a Record> = rows
            .into_iter()
            .filter(|r| self.words_match(&r.normalized().description))
            .collect();
        let prefiltered = candidates.len();

        if prefiltered > self.candidate_row_limit {
            tracing::debug!(
                candidates = prefiltered,
                limit = self.candidate_row_limit,
                "Similarity stage skipped"
            );
            return DescriptionOutcome {
                rows: candidates,
                prefiltered,
                fuzzy: FuzzyStage::Skipped,
            };
        }

        let scores = self.score_all(&candidates);
        let rows: Vec<&'a Record> = candidates
            .into_iter()
            .zip(scores)
            .filter(|(_, score)| *score >= self.threshold)
            .map(|(record, _)| record)
            .collect();

        tracing::debug!(
            candidates = prefiltered,
            kept = rows.len(),
            threshold = self.threshold,
            "Similarity stage applied"
        );

        DescriptionOutcome {
            rows,
            prefiltered,
            fuzzy: FuzzyStage::Applied,
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn score_all(&self, candidates: &[&Record]) -> Vec<u8> {
        candidates
            .iter()
            .map(|r| self.score(&r.normalized().description))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn score_all(&self, candidates: &[&Record]) -> Vec<u8> {
        use rayon::prelude::*;

        candidates
            .par_iter()
            .map(|r| self.score(&r.normalized().description))
            .collect()
    }
}

//! Immutable query value built once per evaluation.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, SearchError};
use crate::field::{ALL_SENTINEL, ALL_SENTINEL_ALIAS};
use crate::normalize::normalize;
use crate::{DEFAULT_CANDIDATE_ROW_LIMIT, DEFAULT_SIMILARITY_THRESHOLD};

/// Category criterion: everything, or one exact category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    /// Parse user input. Blank, `all` and `tutte` (any case) mean every
    /// category; both names are reserved and never become [`CategoryFilter::Exact`].
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize(raw);
        if normalized.is_empty()
            || normalized == ALL_SENTINEL
            || normalized == ALL_SENTINEL_ALIAS
        {
            CategoryFilter::All
        } else {
            CategoryFilter::Exact(raw.trim().to_string())
        }
    }

    /// Query string handed to the exact field matcher.
    pub(crate) fn normalized(&self) -> String {
        match self {
            CategoryFilter::All => ALL_SENTINEL.to_string(),
            CategoryFilter::Exact(value) => normalize(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_SENTINEL),
            CategoryFilter::Exact(value) => f.write_str(value),
        }
    }
}

/// How description tokens combine in the word prefilter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordMode {
    /// Every token must occur (conjunction)
    #[default]
    AllWords,
    /// At least one token must occur (disjunction)
    AnyWord,
}

impl From<bool> for WordMode {
    fn from(match_all_words: bool) -> Self {
        if match_all_words {
            WordMode::AllWords
        } else {
            WordMode::AnyWord
        }
    }
}

/// Filter criteria and tuning parameters for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    code: String,
    description: String,
    location: String,
    category: CategoryFilter,
    word_mode: WordMode,
    similarity_threshold: u8,
    candidate_row_limit: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            code: String::new(),
            description: String::new(),
            location: String::new(),
            category: CategoryFilter::All,
            word_mode: WordMode::AllWords,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            candidate_row_limit: DEFAULT_CANDIDATE_ROW_LIMIT,
        }
    }
}

impl Query {
    /// Start building a query from defaults.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    /// Builder seeded with this query's values.
    pub fn to_builder(&self) -> QueryBuilder {
        QueryBuilder {
            query: self.clone(),
        }
    }

    /// Raw code criterion (substring)
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Raw description criterion, as typed
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw location criterion (substring)
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn word_mode(&self) -> WordMode {
        self.word_mode
    }

    pub fn match_all_words(&self) -> bool {
        self.word_mode == WordMode::AllWords
    }

    pub fn similarity_threshold(&self) -> u8 {
        self.similarity_threshold
    }

    pub fn candidate_row_limit(&self) -> usize {
        self.candidate_row_limit
    }

    /// True when no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.code.trim().is_empty()
            && self.description.trim().is_empty()
            && self.location.trim().is_empty()
            && self.category.is_all()
    }

    /// Copy with the four criteria cleared; tuning parameters are kept.
    pub fn reset_filters(&self) -> Query {
        Query {
            code: String::new(),
            description: String::new(),
            location: String::new(),
            category: CategoryFilter::All,
            ..self.clone()
        }
    }
}

/// Builder for [`Query`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.query.code = code.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.query.description = description.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.query.location = location.into();
        self
    }

    /// Category criterion; see [`CategoryFilter::parse`].
    pub fn category(mut self, category: &str) -> Self {
        self.query.category = CategoryFilter::parse(category);
        self
    }

    pub fn match_all_words(mut self, all: bool) -> Self {
        self.query.word_mode = WordMode::from(all);
        self
    }

    pub fn word_mode(mut self, mode: WordMode) -> Self {
        self.query.word_mode = mode;
        self
    }

    /// Minimum partial similarity percentage, inclusive (0-100).
    pub fn similarity_threshold(mut self, threshold: u8) -> Self {
        self.query.similarity_threshold = threshold;
        self
    }

    /// Ceiling on prefiltered rows that undergo similarity scoring.
    pub fn candidate_row_limit(mut self, limit: usize) -> Self {
        self.query.candidate_row_limit = limit;
        self
    }

    /// Validate and produce the query.
    pub fn build(self) -> Result<Query> {
        if self.query.similarity_threshold > 100 {
            return Err(SearchError::InvalidQuery(format!(
                "similarity threshold must be between 0 and 100, got {}",
                self.query.similarity_threshold
            )));
        }
        Ok(self.query)
    }
}

//! Configuration schema definitions

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationResult, Validator};

/// Allowed similarity threshold range (percent)
pub const THRESHOLD_RANGE: (u8, u8) = (50, 100);

/// Allowed candidate row limit range
pub const ROW_LIMIT_RANGE: (usize, usize) = (100, 5000);

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl ConfigSchema {
    /// Check every value against its allowed range
    pub fn validate(&self) -> ValidationResult {
        Validator::new()
            .required("data.source", &self.data.source)
            .range(
                "search.similarity_threshold",
                self.search.similarity_threshold,
                THRESHOLD_RANGE.0,
                THRESHOLD_RANGE.1,
            )
            .range(
                "search.candidate_row_limit",
                self.search.candidate_row_limit,
                ROW_LIMIT_RANGE.0,
                ROW_LIMIT_RANGE.1,
            )
            .at_least("display.page_size", self.display.page_size, 1)
            .required("export.file_name", &self.export.file_name)
            .warn_if(
                "search.candidate_row_limit",
                self.search.candidate_row_limit > 2000,
                "High limits make broad description searches slow",
            )
            .validate()
    }
}

/// Inventory source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Path of the workbook or CSV file
    #[serde(default = "default_source")]
    pub source: String,

    /// Worksheet to read; the first one when absent
    #[serde(default)]
    pub sheet: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            sheet: None,
        }
    }
}

fn default_source() -> String {
    "Ubicazione ricambi.xlsx".to_string()
}

/// Search tuning defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Minimum partial similarity percentage
    #[serde(default = "default_threshold")]
    pub similarity_threshold: u8,

    /// Ceiling on prefiltered rows that get similarity scoring
    #[serde(default = "default_row_limit")]
    pub candidate_row_limit: usize,

    /// Require every description word (false: any word)
    #[serde(default = "default_true")]
    pub match_all_words: bool,

    /// Re-run the search after every change in the shell
    #[serde(default = "default_true")]
    pub auto_apply: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_threshold(),
            candidate_row_limit: default_row_limit(),
            match_all_words: true,
            auto_apply: true,
        }
    }
}

fn default_threshold() -> u8 {
    ricambi_search::DEFAULT_SIMILARITY_THRESHOLD
}

fn default_row_limit() -> usize {
    ricambi_search::DEFAULT_CANDIDATE_ROW_LIMIT
}

fn default_true() -> bool {
    true
}

/// Result display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Terminal width below which results render as cards
    #[serde(default = "default_compact_width")]
    pub compact_width: u16,

    /// Mark description words in card output
    #[serde(default = "default_true")]
    pub highlight: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            compact_width: default_compact_width(),
            highlight: true,
        }
    }
}

fn default_page_size() -> usize {
    25
}

fn default_compact_width() -> u16 {
    100
}

/// CSV export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Default output file name
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

fn default_file_name() -> String {
    "risultati.csv".to_string()
}

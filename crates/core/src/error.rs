//! Error handling with codes, context and recovery suggestions
//!
//! Every failure outside the matching core is reported through [`Error`]:
//! - A stable code for programmatic handling and exit status
//! - Optional context and a recovery suggestion for the user
//! - A serializable report for `--format json`
//!
//! Dataset errors follow the load taxonomy: load-class errors can be
//! recovered by trying a substitute source, the others halt processing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    // Dataset errors (4xxx)
    LoadError = 4000,
    MissingColumns = 4001,
    EmptyDataset = 4002,
    UnsupportedFormat = 4003,
    SheetNotFound = 4004,

    // Export errors (5xxx)
    ExportError = 5000,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Dataset",
            5 => "Export",
            _ => "Unknown",
        }
    }

    /// Whether a substitute source may be tried after this error
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ErrorCode::LoadError
                | ErrorCode::UnsupportedFormat
                | ErrorCode::SheetNotFound
                | ErrorCode::FileNotFound
                | ErrorCode::PermissionDenied
                | ErrorCode::IoError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// True when a substitute data source may be tried
    pub fn is_recoverable(&self) -> bool {
        self.code.is_load_failure()
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check the path, or pass --fallback with a copy of the inventory table")
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .ricambi.toml file or use --config to specify a path")
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LoadError, message)
    }

    pub fn unsupported_format(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::UnsupportedFormat,
            format!("Unsupported table format: {}", path.as_ref().display()),
        )
        .with_suggestion("Use an .xlsx, .xls, .ods or .csv file")
    }

    pub fn missing_columns(missing: &[&str]) -> Self {
        Self::new(
            ErrorCode::MissingColumns,
            format!("Missing required columns: {}", missing.join(", ")),
        )
        .with_suggestion("The table needs the columns Codice, Descrizione, Ubicazione, Categoria")
    }

    pub fn empty_dataset() -> Self {
        Self::new(ErrorCode::EmptyDataset, "No data available")
            .with_suggestion("The table has a header but no rows")
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExportError, message)
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    use super::ErrorCode;

    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DATASET_ERROR: i32 = 4;
    pub const EXPORT_ERROR: i32 = 5;

    /// Exit status for an error code
    pub fn for_code(code: ErrorCode) -> i32 {
        match code.code() / 1000 {
            3 => CONFIG_ERROR,
            4 => DATASET_ERROR,
            5 => EXPORT_ERROR,
            _ => FAILURE,
        }
    }
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::new(ErrorCode::LoadError, format!("CSV error: {}", err)).with_source(err)
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::new(ErrorCode::LoadError, format!("Workbook error: {}", err)).with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::MissingColumns.to_string(), "E4001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::EmptyDataset.category(), "Dataset");
        assert_eq!(ErrorCode::ExportError.category(), "Export");
    }

    #[test]
    fn test_recoverable_codes() {
        assert!(Error::load("unreadable").is_recoverable());
        assert!(Error::file_not_found("x.xlsx").is_recoverable());
        assert!(!Error::missing_columns(&["Codice"]).is_recoverable());
        assert!(!Error::empty_dataset().is_recoverable());
    }

    #[test]
    fn test_missing_columns_message() {
        let err = Error::missing_columns(&["Categoria", "Codice"]);
        assert_eq!(err.code, ErrorCode::MissingColumns);
        assert!(err.message.contains("Categoria, Codice"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::file_not_found("/path/to/ricambi.xlsx")
            .with_context("While loading the inventory");

        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::for_code(ErrorCode::MissingColumns), exit_codes::DATASET_ERROR);
        assert_eq!(exit_codes::for_code(ErrorCode::ConfigParseError), exit_codes::CONFIG_ERROR);
        assert_eq!(exit_codes::for_code(ErrorCode::IoError), exit_codes::FAILURE);
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::empty_dataset().with_context("ricambi.csv");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E4002"));
        assert!(json.contains("Dataset"));
    }
}

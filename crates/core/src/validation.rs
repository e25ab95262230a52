//! Configuration value validation
//!
//! # Example
//!
//! ```
//! use ricambi_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("data.source", "ricambi.xlsx")
//!     .range("search.similarity_threshold", 70u8, 50, 100)
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};

/// A failed check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted key of the offending value
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(actual) = &self.actual {
            write!(f, " (got {})", actual)?;
        }
        Ok(())
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Convert to Result type
    pub fn to_result(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::new(
                ErrorCode::ConfigValidationError,
                format!("Invalid configuration: {}", messages.join("; ")),
            ))
        }
    }
}

/// Fluent validator builder
#[derive(Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that a value is not blank
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.errors.push(ValidationError {
                field: field.to_string(),
                message: "Value is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: None,
            });
        }
        self
    }

    /// Validate an inclusive numeric range
    pub fn range<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        if value < min || value > max {
            self.result.errors.push(ValidationError {
                field: field.to_string(),
                message: format!("Must be between {} and {}", min, max),
                code: "RANGE".to_string(),
                expected: Some(format!("{} - {}", min, max)),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate a lower bound
    pub fn at_least<T: PartialOrd + std::fmt::Display>(mut self, field: &str, value: T, min: T) -> Self {
        if value < min {
            self.result.errors.push(ValidationError {
                field: field.to_string(),
                message: format!("Must be at least {}", min),
                code: "MIN".to_string(),
                expected: Some(format!(">= {}", min)),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Add a warning (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.warnings.push(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        let result = Validator::new().required("data.source", "  ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_range_inclusive() {
        assert!(Validator::new().range("x", 50u8, 50, 100).validate().is_valid());
        assert!(Validator::new().range("x", 100u8, 50, 100).validate().is_valid());
        assert!(!Validator::new().range("x", 101u8, 50, 100).validate().is_valid());
    }

    #[test]
    fn test_to_result_lists_fields() {
        let err = Validator::new()
            .range("search.similarity_threshold", 10u8, 50, 100)
            .required("export.file_name", "")
            .validate()
            .to_result()
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("search.similarity_threshold"));
        assert!(err.message.contains("export.file_name"));
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let result = Validator::new().warn_if("x", true, "careful").validate();
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }
}

//! Core services for the ricambi inventory tools
//!
//! Everything around the matching engine that touches the outside world:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Sources**: reading `.xlsx`/`.ods`/`.csv` tables into a [`Dataset`](ricambi_search::Dataset)
//! - **Cache**: process-wide memoization of loaded datasets, with fallback
//! - **Export**: writing matched rows as CSV
//!
//! # Example
//!
//! ```rust,no_run
//! use ricambi_core::prelude::*;
//! use ricambi_search::{apply_filters, Query};
//!
//! let config = Config::load(None)?;
//! let source = DataSource::new(&config.schema.data.source);
//! let dataset = cache::global().get_or_load(&source, load_source)?;
//!
//! let query = Query::builder().description("cuscinetto").build().expect("valid query");
//! println!("{} matches", apply_filters(&dataset, &query).len());
//! # Ok::<(), ricambi_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod source;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{self, load_with_fallback, DatasetCache};
    pub use crate::config::Config;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::export::{export_to_path, write_csv};
    pub use crate::source::{dataset_from_table, load_source, load_table, DataSource, RawTable};
    pub use crate::validation::{ValidationResult, Validator};
}

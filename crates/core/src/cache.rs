//! Process-wide dataset memoization
//!
//! A source is read and normalized at most once per process. The first
//! successful load for a key is kept and shared by every later caller;
//! failed loads are not remembered, so a corrected file can be retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use ricambi_core::cache::{self, DataSource};
//!
//! let source = DataSource::new("Ubicazione ricambi.xlsx");
//! let dataset = cache::global().get_or_load(&source, ricambi_core::source::load_source)?;
//! println!("{} rows", dataset.len());
//! # Ok::<(), ricambi_core::Error>(())
//! ```

use crate::error::{Error, ErrorCode, Result};
pub use crate::source::DataSource;
use crate::source::load_source;
use once_cell::sync::Lazy;
use ricambi_search::Dataset;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

type SourceKey = (PathBuf, Option<String>);

static GLOBAL: Lazy<DatasetCache> = Lazy::new(DatasetCache::new);

/// The cache shared by the whole process
pub fn global() -> &'static DatasetCache {
    &GLOBAL
}

/// Loaded datasets keyed by canonical source path and sheet
#[derive(Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<SourceKey, Arc<Dataset>>>,
}

impl DatasetCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset already loaded for `source`, if any
    pub fn get(&self, source: &DataSource) -> Result<Option<Arc<Dataset>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::new(ErrorCode::Internal, "Dataset cache lock poisoned"))?;
        Ok(entries.get(&source.key()).cloned())
    }

    /// Return the cached dataset for `source`, loading it with `load` on a miss.
    ///
    /// When two callers race on the same key the first stored dataset wins
    /// and both receive it.
    pub fn get_or_load<F>(&self, source: &DataSource, load: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce(&DataSource) -> Result<Dataset>,
    {
        if let Some(hit) = self.get(source)? {
            tracing::debug!(source = %source.path.display(), "Dataset cache hit");
            return Ok(hit);
        }

        let dataset = Arc::new(load(source)?);

        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::new(ErrorCode::Internal, "Dataset cache lock poisoned"))?;
        Ok(entries.entry(source.key()).or_insert(dataset).clone())
    }

    /// Number of cached datasets
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// True when nothing has been loaded yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load `primary`, offering a substitute source after a load-class failure.
///
/// `fallback` receives the primary error and returns the source to try
/// instead, or `None` to give up. Missing columns and empty tables are not
/// load failures and are returned as is. A failure of the substitute is
/// final.
pub fn load_with_fallback<F>(
    cache: &DatasetCache,
    primary: &DataSource,
    fallback: F,
) -> Result<Arc<Dataset>>
where
    F: FnOnce(&Error) -> Option<DataSource>,
{
    match cache.get_or_load(primary, load_source) {
        Ok(dataset) => Ok(dataset),
        Err(err) if err.is_recoverable() => {
            tracing::warn!(
                source = %primary.path.display(),
                error = %err.message,
                "Could not load inventory"
            );
            let Some(substitute) = fallback(&err) else {
                return Err(err);
            };
            tracing::info!(source = %substitute.path.display(), "Trying substitute table");
            cache
                .get_or_load(&substitute, load_source)
                .map_err(|e| e.with_context(format!("Substitute table {}", substitute.path.display())))
        }
        Err(err) => Err(err),
    }
}

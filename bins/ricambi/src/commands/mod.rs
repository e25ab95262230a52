//! CLI command implementations

pub mod categories;
pub mod export;
pub mod info;
pub mod search;
pub mod shell;

use anyhow::Result;
use clap::{Args, ValueEnum};
use ricambi_cli::output::Status;
use ricambi_cli::progress;
use ricambi_cli::{FixedProbe, Layout, Renderer, TerminalProbe, ViewportProbe};
use ricambi_core::cache::{self, load_with_fallback, DataSource};
use ricambi_core::config::Config;
use ricambi_core::Error;
use ricambi_search::{apply_filters, Dataset, FuzzyStage, MatchResult, Query, WordMode};
use ricambi_telemetry::{metrics, Timer, FILTER_MS, LOAD_MS};
use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Description word mode on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Every query word must appear
    All,
    /// At least one query word must appear
    Any,
}

impl From<ModeArg> for WordMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => WordMode::AllWords,
            ModeArg::Any => WordMode::AnyWord,
        }
    }
}

/// Filter criteria shared by `search` and `export`
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Substring of the part code
    #[arg(long, default_value = "")]
    pub code: String,

    /// Words of the description
    #[arg(long = "desc", visible_alias = "description", default_value = "")]
    pub description: String,

    /// Substring of the storage location
    #[arg(long = "loc", visible_alias = "location", default_value = "")]
    pub location: String,

    /// Exact category, or "all"
    #[arg(long = "cat", visible_alias = "category", default_value = "all")]
    pub category: String,

    /// Description word mode, overriding search.match_all_words
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Minimum similarity percentage, overriding search.similarity_threshold
    #[arg(long, value_parser = clap::value_parser!(u8).range(50..=100))]
    pub threshold: Option<u8>,

    /// Largest candidate set that gets similarity scoring, overriding search.candidate_row_limit
    #[arg(long, value_parser = clap::value_parser!(u64).range(100..=5000))]
    pub limit: Option<u64>,
}

impl FilterArgs {
    /// Combine the criteria with configured tuning
    pub fn to_query(&self, base: &Query) -> Result<Query> {
        let mut builder = base
            .to_builder()
            .code(self.code.as_str())
            .description(self.description.as_str())
            .location(self.location.as_str())
            .category(&self.category);
        if let Some(mode) = self.mode {
            builder = builder.word_mode(mode.into());
        }
        if let Some(threshold) = self.threshold {
            builder = builder.similarity_threshold(threshold);
        }
        if let Some(limit) = self.limit {
            builder = builder.candidate_row_limit(usize::try_from(limit)?);
        }
        Ok(builder.build()?)
    }
}

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    data: Option<PathBuf>,
    sheet: Option<String>,
    fallback: Option<PathBuf>,
}

impl Context {
    pub fn new(
        config_path: Option<&str>,
        format: OutputFormat,
        data: Option<PathBuf>,
        sheet: Option<String>,
        fallback: Option<PathBuf>,
    ) -> Result<Self> {
        let config = Config::load(config_path)?;
        Ok(Self {
            config,
            format,
            data,
            sheet,
            fallback,
        })
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// The configured source with command-line overrides applied
    pub fn source(&self) -> DataSource {
        let data = &self.config.schema.data;
        let path = self
            .data
            .clone()
            .unwrap_or_else(|| PathBuf::from(&data.source));
        DataSource::new(path).with_sheet(self.sheet.clone().or_else(|| data.sheet.clone()))
    }

    /// Empty query carrying the configured tuning
    pub fn base_query(&self) -> Result<Query> {
        let search = &self.config.schema.search;
        Ok(Query::builder()
            .similarity_threshold(search.similarity_threshold)
            .candidate_row_limit(search.candidate_row_limit)
            .match_all_words(search.match_all_words)
            .build()?)
    }

    /// Load the inventory once per process, offering a substitute on failure
    pub fn load_dataset(&self) -> Result<Arc<Dataset>> {
        let primary = self.source();
        let spinner = if self.is_json() {
            indicatif::ProgressBar::hidden()
        } else {
            progress::spinner("Loading inventory...")
        };
        let timer = Timer::start(LOAD_MS);

        let result = load_with_fallback(cache::global(), &primary, |err| {
            spinner.suspend(|| self.fallback_source(err))
        });

        progress::finish_clear(&spinner);
        let elapsed = timer.stop();
        let dataset = result?;
        tracing::debug!(rows = dataset.len(), elapsed_ms = elapsed.as_millis() as u64, "Dataset ready");
        Ok(dataset)
    }

    fn fallback_source(&self, err: &Error) -> Option<DataSource> {
        Status::warning(&err.message);
        if let Some(path) = &self.fallback {
            return Some(DataSource::new(path.clone()));
        }
        prompt_for_substitute()
    }

    /// Layout from `--width` or the terminal
    pub fn layout(&self, width: Option<u16>) -> Layout {
        let probe: Box<dyn ViewportProbe> = match width {
            Some(w) => Box::new(FixedProbe(w)),
            None => Box::new(TerminalProbe),
        };
        Layout::detect(probe.as_ref(), self.config.schema.display.compact_width)
    }

    pub fn renderer(&self, layout: Layout) -> Renderer {
        Renderer::new(layout).with_highlight(self.config.schema.display.highlight)
    }
}

/// Ask for a substitute table on an interactive terminal; `None` otherwise
fn prompt_for_substitute() -> Option<DataSource> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return None;
    }

    let term = console::Term::stderr();
    let _ = term.write_str("Path to a substitute table (empty to abort): ");
    let mut line = String::new();
    stdin.lock().read_line(&mut line).ok()?;
    let path = line.trim();
    if path.is_empty() {
        None
    } else {
        Some(DataSource::new(path))
    }
}

/// Run the filters and record query metrics
pub fn evaluate<'a>(dataset: &'a Dataset, query: &Query) -> MatchResult<'a> {
    let timer = Timer::start(FILTER_MS);
    let result = apply_filters(dataset, query);
    timer.stop();
    let fuzzy = match result.stats().fuzzy {
        FuzzyStage::Applied => Some(true),
        FuzzyStage::Skipped => Some(false),
        FuzzyStage::Inactive => None,
    };
    metrics().record_query(fuzzy);
    result
}

//! Logging and in-process metrics for the ricambi tools
//!
//! - Structured logging with tracing, compact or JSON, always on stderr
//! - Query counters and filter timings, exportable as JSON
//! - A session id for correlating log lines of one run

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Counter: queries evaluated
pub const QUERIES: &str = "queries";
/// Counter: evaluations where similarity scoring was skipped for too many candidates
pub const FUZZY_SKIPPED: &str = "fuzzy_skipped";
/// Counter: evaluations where similarity scoring ran
pub const FUZZY_APPLIED: &str = "fuzzy_applied";
/// Histogram: filter evaluation time in milliseconds
pub const FILTER_MS: &str = "filter_ms";
/// Histogram: dataset load time in milliseconds
pub const LOAD_MS: &str = "load_ms";

/// Recent samples kept per histogram for percentiles
pub const HISTOGRAM_WINDOW: usize = 1024;

static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging
///
/// `RUST_LOG` overrides `log_level` when set.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let result = if config.json {
        tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target),
            ),
        )
    } else {
        tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .without_time()
                    .compact(),
            ),
        )
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Emit JSON lines instead of the compact format
    pub json: bool,
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            show_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Level derived from the `--verbose` flag
    pub fn for_verbosity(verbose: bool) -> Self {
        Self {
            log_level: if verbose { "debug" } else { "warn" }.to_string(),
            ..Self::default()
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Metrics registry for collecting and exporting metrics
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, AtomicU64>>,
    histograms: RwLock<HashMap<String, Histogram>>,
    started_at: DateTime<Utc>,
    start_time: Instant,
}

impl MetricsRegistry {
    fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            histograms: RwLock::new(HashMap::new()),
            started_at: Utc::now(),
            start_time: Instant::now(),
        }
    }

    /// Increment a counter
    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    /// Increment a counter by a specific amount
    pub fn increment_by(&self, name: &str, value: u64) {
        {
            let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(counter) = counters.get(name) {
                counter.fetch_add(value, Ordering::Relaxed);
                return;
            }
        }
        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Current value of a counter; zero when never incremented
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Record a histogram value
    pub fn histogram(&self, name: &str, value: f64) {
        self.histograms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .record(value);
    }

    /// Summary of a histogram
    pub fn histogram_stats(&self, name: &str) -> HistogramStats {
        self.histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or_else(HistogramStats::empty, Histogram::stats)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Count one query evaluation and whether scoring ran
    pub fn record_query(&self, fuzzy_applied: Option<bool>) {
        self.increment(QUERIES);
        match fuzzy_applied {
            Some(true) => self.increment(FUZZY_APPLIED),
            Some(false) => self.increment(FUZZY_SKIPPED),
            None => {}
        }
    }

    /// Export metrics as JSON
    pub fn export_json(&self) -> serde_json::Value {
        let counter_values: HashMap<String, u64> = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect();

        let histogram_stats: HashMap<String, HistogramStats> = self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.stats()))
            .collect();

        serde_json::json!({
            "session_id": session_id(),
            "started_at": self.started_at.to_rfc3339(),
            "uptime_secs": self.uptime_secs(),
            "counters": counter_values,
            "histograms": histogram_stats,
        })
    }
}

/// Running totals plus a bounded window of recent samples.
///
/// `count`, `sum`, `min` and `max` cover every sample; percentiles cover
/// the last [`HISTOGRAM_WINDOW`] samples.
#[derive(Debug, Default)]
struct Histogram {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
    recent: VecDeque<f64>,
}

impl Histogram {
    fn record(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;

        if self.recent.len() == HISTOGRAM_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(value);
    }

    fn stats(&self) -> HistogramStats {
        if self.count == 0 {
            return HistogramStats::empty();
        }

        let mut sorted: Vec<f64> = self.recent.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);

        HistogramStats {
            count: self.count,
            min: self.min,
            max: self.max,
            mean: self.sum / self.count as f64,
            p50: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
        }
    }
}

/// Histogram statistics
#[derive(Debug, Serialize)]
pub struct HistogramStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
}

impl HistogramStats {
    fn empty() -> Self {
        Self {
            count: 0,
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            p50: 0.0,
            p95: 0.0,
        }
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Get the global metrics registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

/// Records elapsed milliseconds into a histogram once, on `stop` or drop
pub struct Timer {
    name: &'static str,
    start: Instant,
    recorded: bool,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Elapsed time so far
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and record the duration
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let duration = self.start.elapsed();
        if !self.recorded {
            self.recorded = true;
            metrics().histogram(self.name, duration.as_secs_f64() * 1000.0);
            tracing::debug!(
                metric = self.name,
                duration_ms = duration.as_millis() as u64,
                "Timer completed"
            );
        }
        duration
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.record();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counter() {
        let registry = MetricsRegistry::new();
        registry.increment("test_counter");
        registry.increment("test_counter");
        registry.increment_by("test_counter", 3);
        assert_eq!(registry.counter("test_counter"), 5);
        assert_eq!(registry.counter("never"), 0);
    }

    #[test]
    fn test_record_query() {
        let registry = MetricsRegistry::new();
        registry.record_query(Some(true));
        registry.record_query(Some(false));
        registry.record_query(None);

        assert_eq!(registry.counter(QUERIES), 3);
        assert_eq!(registry.counter(FUZZY_APPLIED), 1);
        assert_eq!(registry.counter(FUZZY_SKIPPED), 1);
    }

    #[test]
    fn test_histogram_stats() {
        let registry = MetricsRegistry::new();
        for value in 1..=10 {
            registry.histogram("test_hist", value as f64);
        }
        let stats = registry.histogram_stats("test_hist");

        assert_eq!(stats.count, 10);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.mean, 5.5);
        assert_eq!(registry.histogram_stats("never").count, 0);
    }

    #[test]
    fn test_histogram_window_bounded() {
        let mut histogram = Histogram::default();
        let total = HISTOGRAM_WINDOW * 3;
        for value in 0..total {
            histogram.record(value as f64);
        }

        assert_eq!(histogram.recent.len(), HISTOGRAM_WINDOW);
        assert_eq!(histogram.recent.front(), Some(&((total - HISTOGRAM_WINDOW) as f64)));

        let stats = histogram.stats();
        assert_eq!(stats.count, total);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, (total - 1) as f64);
        assert!(stats.p50 >= (total - HISTOGRAM_WINDOW) as f64);
    }

    #[test]
    fn test_timer_records_once() {
        let timer = Timer::start("test_timer_once");
        std::thread::sleep(Duration::from_millis(5));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 5);
        assert_eq!(metrics().histogram_stats("test_timer_once").count, 1);
    }

    #[test]
    fn test_export_json() {
        let registry = MetricsRegistry::new();
        registry.increment(QUERIES);
        let json = registry.export_json();
        assert_eq!(json["counters"][QUERIES], 1);
        assert!(json["started_at"].is_string());
    }

    #[test]
    fn test_session_id() {
        assert!(Uuid::parse_str(session_id()).is_ok());
    }
}

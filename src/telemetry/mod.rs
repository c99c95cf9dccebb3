//! Telemetry for AskBuddy
//!
//! Logging setup plus per-session resolution statistics.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;
use crate::resolver::{AnswerSource, Persistence, Resolution};

/// Environment variable that overrides the log filter
pub const LOG_ENV: &str = "ASKBUDDY_LOG";

/// Default filter directive for a verbosity level
pub fn filter_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "askbuddy=info,warn",
        Verbosity::VeryVerbose => "askbuddy=debug,info",
    }
}

/// Initialize the tracing subscriber on stderr.
///
/// `ASKBUDDY_LOG` wins over the verbosity flags when set.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Aggregated resolution statistics
#[derive(Debug, Clone, Default)]
pub struct ResolutionStats {
    pub questions: usize,
    pub cache_hits: usize,
    pub provider_answers: usize,
    pub not_found: usize,
    pub stored: usize,
    pub store_failures: usize,
    pub total_duration_ms: u64,
    pub by_source: BTreeMap<String, usize>,
}

impl ResolutionStats {
    /// Share of questions answered from the cache
    pub fn cache_hit_rate(&self) -> f64 {
        if self.questions == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.questions as f64
        }
    }

    /// Mean resolution time in milliseconds
    pub fn average_duration_ms(&self) -> f64 {
        if self.questions == 0 {
            0.0
        } else {
            self.total_duration_ms as f64 / self.questions as f64
        }
    }
}

/// Telemetry collector
#[derive(Clone)]
pub struct TelemetryCollector {
    stats: Arc<Mutex<ResolutionStats>>,
    start_time: Instant,
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(ResolutionStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record a finished resolution
    pub fn record(&self, resolution: &Resolution, duration: Duration) {
        let mut stats = self.stats.lock().unwrap_or_else(|p| p.into_inner());
        stats.questions += 1;
        stats.total_duration_ms += duration.as_millis() as u64;
        *stats
            .by_source
            .entry(resolution.source.label().to_string())
            .or_insert(0) += 1;

        match &resolution.source {
            AnswerSource::Cache => stats.cache_hits += 1,
            AnswerSource::Provider(_) => stats.provider_answers += 1,
            AnswerSource::NotFound => stats.not_found += 1,
            _ => {}
        }
        match &resolution.persistence {
            Persistence::Stored => stats.stored += 1,
            Persistence::Failed(_) => stats.store_failures += 1,
            Persistence::Skipped => {}
        }
    }

    /// Get current statistics
    pub fn get_stats(&self) -> ResolutionStats {
        self.stats.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

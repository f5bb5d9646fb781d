//! Request counters and health reporting.

use derive_more::Display;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::CacheStatus;

/// Running totals for one engine.
///
/// Counters only ever increase and are updated with relaxed ordering, so a
/// [`StatsSnapshot`] taken during concurrent requests may be off by the
/// requests in flight.
#[derive(Debug)]
pub struct EngineStats {
    started: Instant,
    renders: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
    computed: AtomicU64,
    errors: AtomicU64,
}

impl EngineStats {
    /// Creates zeroed counters starting the uptime clock now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            renders: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
            computed: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    pub(crate) fn record_render(&self) {
        self.renders.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_status(&self, status: CacheStatus) {
        match status {
            CacheStatus::Hit => {
                self.hits.fetch_add(1, Ordering::Relaxed);
            }
            CacheStatus::Miss => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.computed.fetch_add(1, Ordering::Relaxed);
            }
            CacheStatus::Refreshed => {
                self.computed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the time since the counters were created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Reads every counter.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime_seconds: self.uptime().as_secs_f64(),
            renders: self.renders.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            charts_computed: self.computed.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for EngineStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`EngineStats`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Seconds since the engine was created.
    pub uptime_seconds: f64,
    /// Render requests, cached or not.
    pub renders: u64,
    /// Renders served from a live entry.
    pub hits: u64,
    /// Renders that ran the pipeline.
    pub misses: u64,
    /// Forced recomputations.
    pub refreshes: u64,
    /// Charts the pipeline produced, from misses and refreshes alike.
    pub charts_computed: u64,
    /// Failed renders and refreshes.
    pub errors: u64,
}

impl StatsSnapshot {
    /// Share of successful renders served from the cache, if any succeeded.
    #[must_use]
    pub fn hit_ratio(&self) -> Option<f64> {
        let served = self.hits + self.misses;
        (served > 0).then(|| self.hits as f64 / served as f64)
    }
}

/// Overall verdict of a [`HealthReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Sources are available.
    #[display("healthy")]
    Healthy,
    /// The engine works but has nothing to render.
    #[display("warning")]
    Warning,
}

/// Source availability, cache occupancy and counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    /// Overall verdict.
    pub status: HealthStatus,
    /// Whether the source could be enumerated at all.
    pub source_available: bool,
    /// Number of renderable sources.
    pub available_sources: usize,
    /// Number of cached charts, live or expired.
    pub cached_entries: usize,
    /// Human-readable problems behind a [`HealthStatus::Warning`].
    pub warnings: Vec<String>,
    /// Request counters.
    pub stats: StatsSnapshot,
}

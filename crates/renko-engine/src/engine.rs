//! Pipeline orchestration.

use renko_aggregate::resample;
use renko_estimate::{BrickSizeEstimator, SizingMethod};
use renko_source::{LoadedTicks, TickSource};
use renko_types::{RenkoError, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    CacheInfo, CacheLookup, EngineConfig, EngineStats, HealthReport, HealthStatus, RenkoChart,
    RenkoResponse, ResultCache, SourceAnalysis,
};

/// Runs the tick-to-Renko pipeline and caches results per source key.
///
/// The engine owns its cache; share it across threads behind an [`Arc`].
#[derive(Debug)]
pub struct RenkoEngine<S> {
    source: S,
    config: EngineConfig,
    cache: ResultCache,
    stats: EngineStats,
}

impl<S: TickSource> RenkoEngine<S> {
    /// Creates an engine with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`renko_types::RenkoError::Config`] if the configuration is
    /// invalid.
    pub fn new(source: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cache: ResultCache::new(config.cache_ttl),
            stats: EngineStats::new(),
            source,
            config,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the tick source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the result cache.
    #[must_use]
    pub const fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Returns the request counters.
    #[must_use]
    pub const fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Returns the chart for `key`, from the cache when it is still live.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error; nothing is cached on failure.
    pub fn render(&self, key: &str) -> Result<RenkoResponse> {
        let started = Instant::now();
        self.stats.record_render();
        let lookup = self
            .cache
            .get_or_compute(key, || self.compute(key))
            .inspect_err(|_| self.stats.record_error())?;
        Ok(self.respond(key, lookup, started))
    }

    /// Drops any cached chart for `key` and computes a new one.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error; the cache is left empty for `key`.
    pub fn refresh(&self, key: &str) -> Result<RenkoResponse> {
        let started = Instant::now();
        self.stats.record_refresh();
        let lookup = self
            .cache
            .refresh(key, || self.compute(key))
            .inspect_err(|_| self.stats.record_error())?;
        Ok(self.respond(key, lookup, started))
    }

    /// Runs the pipeline without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns source errors, [`renko_types::RenkoError::InvalidRecord`],
    /// [`renko_types::RenkoError::InsufficientData`] for an empty series and
    /// [`renko_types::RenkoError::NoBricksFormed`] when price never moves a
    /// full brick.
    pub fn compute(&self, key: &str) -> Result<RenkoChart> {
        let started = Instant::now();

        let loaded = self.load(key)?;
        debug!(key, path = %loaded.path.display(), rows = loaded.row_count(), "loaded ticks");

        let bars = resample(&loaded.ticks, self.config.bucket_width)?;
        debug!(key, bars = bars.len(), bucket = %self.config.bucket_width, "resampled");

        let estimate = self.config.sizer().estimate(&bars)?;
        if let Some(reason) = &estimate.fallback_reason {
            warn!(key, method = %estimate.method, size = estimate.size, reason = %reason, "brick size fell back");
        }

        let bricks = self.config.builder().build(&bars, estimate.size)?;
        let compute_duration = started.elapsed();
        info!(
            key,
            bricks = bricks.len(),
            size = estimate.size,
            method = %estimate.method,
            elapsed_ms = compute_duration.as_millis() as u64,
            "computed renko chart"
        );

        Ok(RenkoChart {
            key: key.to_string(),
            source_path: loaded.path,
            original_row_count: loaded.ticks.len(),
            bars,
            estimate,
            bricks,
            compute_duration,
        })
    }

    /// Loads `key` and reports its statistics and both brick-size estimates.
    ///
    /// # Errors
    ///
    /// Returns source errors, [`renko_types::RenkoError::InvalidRecord`] and
    /// [`renko_types::RenkoError::InsufficientData`] for an empty series.
    pub fn analyze(&self, key: &str) -> Result<SourceAnalysis> {
        let loaded = self.load(key)?;
        let bars = resample(&loaded.ticks, self.config.bucket_width)?;
        let sizer = self.config.sizer();
        let estimate = sizer.estimate(&bars)?;

        let atr = renko_estimate::AtrEstimator::new(self.config.atr_lookback)
            .estimate(&bars)
            .map_err(|e| e.to_string());
        let statistical = renko_estimate::StatisticalEstimator::new(self.config.statistical_multiplier)
            .estimate(&bars)
            .map_err(|e| e.to_string());

        Ok(SourceAnalysis {
            fields: loaded.fields.iter().map(str::to_string).collect(),
            row_count: loaded.ticks.len(),
            first_timestamp: loaded.ticks.iter().map(|t| t.timestamp).min(),
            last_timestamp: loaded.ticks.iter().map(|t| t.timestamp).max(),
            bar_count: bars.len(),
            atr,
            statistical,
            estimate,
            source_path: loaded.path,
        })
    }

    /// Describes every cached chart.
    #[must_use]
    pub fn inspect_cache(&self) -> Vec<CacheInfo> {
        self.cache.inspect()
    }

    /// Drops the cached chart for `key`. Returns true if one was present.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.cache.invalidate(key);
        debug!(key, removed, "invalidated cache entry");
        removed
    }

    /// Drops every cached chart. Returns how many were present.
    pub fn invalidate_all(&self) -> usize {
        let removed = self.cache.invalidate_all();
        info!(removed, "cleared chart cache");
        removed
    }

    /// Reports source availability, cache occupancy and the counters.
    ///
    /// A source that cannot be enumerated or lists nothing yields
    /// [`HealthStatus::Warning`] with the reason.
    #[must_use]
    pub fn health(&self) -> HealthReport {
        let mut warnings = Vec::new();
        let (source_available, available_sources) = match self.source.list() {
            Ok(names) => {
                if names.is_empty() {
                    warnings.push("No data files found".to_string());
                }
                (true, names.len())
            }
            Err(RenkoError::SourceNotFound(location)) => {
                warnings.push(format!("Data folder does not exist: {location}"));
                (false, 0)
            }
            Err(err) => {
                warnings.push(format!("Cannot list sources: {err}"));
                (false, 0)
            }
        };

        let status = if warnings.is_empty() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Warning
        };
        if status == HealthStatus::Warning {
            warn!(warnings = ?warnings, "health check raised warnings");
        }

        HealthReport {
            status,
            source_available,
            available_sources,
            cached_entries: self.cache.len(),
            warnings,
            stats: self.stats.snapshot(),
        }
    }

    /// Lists the source identifiers available to render.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be enumerated.
    pub fn list_sources(&self) -> Result<Vec<String>> {
        self.source.list()
    }

    /// Loads `key` and enforces the `timestamp`/`price` field contract.
    fn load(&self, key: &str) -> Result<LoadedTicks> {
        let loaded = self.source.load(key)?;
        loaded.fields.require_core(&loaded.path.display().to_string())?;
        Ok(loaded)
    }

    fn respond(&self, key: &str, lookup: CacheLookup, started: Instant) -> RenkoResponse {
        self.stats.record_status(lookup.status);
        debug!(
            key,
            status = %lookup.status,
            age_ms = lookup.age.as_millis() as u64,
            ttl_s = self.cache.ttl().as_secs_f64(),
            "cache lookup"
        );
        if lookup.chart.estimate.method == SizingMethod::MinimumDefault {
            debug!(key, size = lookup.chart.brick_size(), "serving minimum brick size");
        }
        RenkoResponse::new(Arc::clone(&lookup.chart), lookup.status, lookup.age, started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use renko_estimate::BrickStrategy;
    use renko_source::{FieldSet, MemorySource};
    use renko_types::{RenkoError, Tick};
    use std::path::PathBuf;

    use crate::CacheStatus;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 23, 13, 30, 0).unwrap()
    }

    /// One tick per minute at the given prices.
    fn minute_ticks(prices: &[f64]) -> Vec<Tick> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| Tick::new(start() + TimeDelta::minutes(i as i64), *p, 1))
            .collect()
    }

    fn engine(source: MemorySource) -> RenkoEngine<MemorySource> {
        RenkoEngine::new(source, EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_render_pipeline() {
        let source = MemorySource::new().with("walk", minute_ticks(&[100.0, 103.0, 107.0, 104.0, 101.0]));
        let engine = RenkoEngine::new(
            source,
            EngineConfig {
                brick_strategy: BrickStrategy::Atr,
                atr_lookback: 14,
                ..EngineConfig::default()
            },
        )
        .unwrap();

        let response = engine.render("walk").unwrap();
        let meta = &response.metadata;

        // True ranges 3, 4, 3, 3 average to 3.25.
        assert_relative_eq!(meta.brick_size, 3.25);
        assert_eq!(meta.original_row_count, 5);
        assert_eq!(meta.bar_count, 5);
        assert_eq!(meta.cache_status, CacheStatus::Miss);
        assert_eq!(meta.brick_count, response.chart.bricks.len());
        assert!(meta.brick_count > 0);
    }

    #[test]
    fn test_second_render_hits_cache() {
        let engine = engine(MemorySource::new().with("k", minute_ticks(&[1.0, 2.0, 3.0, 4.0])));
        let first = engine.render("k").unwrap();
        let second = engine.render("k").unwrap();

        assert_eq!(second.metadata.cache_status, CacheStatus::Hit);
        assert!(Arc::ptr_eq(&first.chart, &second.chart));
        assert!(second.metadata.cache_age_seconds < 1.0);
    }

    #[test]
    fn test_refresh_recomputes() {
        let engine = engine(MemorySource::new().with("k", minute_ticks(&[1.0, 2.0, 3.0, 4.0])));
        let first = engine.render("k").unwrap();
        let refreshed = engine.refresh("k").unwrap();

        assert_eq!(refreshed.metadata.cache_status, CacheStatus::Refreshed);
        assert!(!Arc::ptr_eq(&first.chart, &refreshed.chart));
        assert_eq!(first.chart.bricks, refreshed.chart.bricks);
    }

    #[test]
    fn test_flat_series_uses_minimum_size() {
        let engine = engine(MemorySource::new().with("flat", minute_ticks(&[50.0; 20])));
        let err = engine.render("flat").unwrap_err();
        // The minimum size is far below any movement, but there is none.
        assert!(matches!(err, RenkoError::NoBricksFormed { .. }));
        assert!(engine.inspect_cache().is_empty());
    }

    #[test]
    fn test_empty_source_propagates() {
        let engine = engine(MemorySource::new().with("empty", Vec::new()));
        assert!(matches!(
            engine.render("empty"),
            Err(RenkoError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_unknown_key() {
        let engine = engine(MemorySource::new());
        assert!(matches!(
            engine.render("nope"),
            Err(RenkoError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_compute_bypasses_cache() {
        let engine = engine(MemorySource::new().with("k", minute_ticks(&[1.0, 2.0, 3.0, 4.0])));
        engine.compute("k").unwrap();
        assert!(engine.inspect_cache().is_empty());

        engine.render("k").unwrap();
        assert_eq!(engine.inspect_cache().len(), 1);
        assert!(engine.invalidate("k"));
        assert!(engine.inspect_cache().is_empty());
    }

    #[test]
    fn test_analyze_reports_both_estimates() {
        let engine = engine(MemorySource::new().with("one", minute_ticks(&[10.0])));
        let analysis = engine.analyze("one").unwrap();

        assert_eq!(analysis.row_count, 1);
        assert_eq!(analysis.bar_count, 1);
        assert!(analysis.atr.is_err());
        assert!(analysis.statistical.is_err());
        assert_eq!(analysis.estimate.method, SizingMethod::MinimumDefault);
        assert_eq!(analysis.first_timestamp, analysis.last_timestamp);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            atr_lookback: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            RenkoEngine::new(MemorySource::new(), config),
            Err(RenkoError::Config(_))
        ));
    }

    #[test]
    fn test_stats_follow_requests() {
        let engine = engine(MemorySource::new().with("k", minute_ticks(&[1.0, 2.0, 3.0, 4.0])));
        engine.render("k").unwrap();
        engine.render("k").unwrap();
        engine.refresh("k").unwrap();
        assert!(engine.render("missing").is_err());
        assert!(engine.refresh("missing").is_err());

        let stats = engine.stats().snapshot();
        assert_eq!(stats.renders, 3);
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(stats.refreshes, 2);
        assert_eq!(stats.charts_computed, 2);
        assert_eq!(stats.errors, 2);
    }

    #[test]
    fn test_health_reports_sources_and_cache() {
        let engine = engine(MemorySource::new().with("k", minute_ticks(&[1.0, 2.0, 3.0, 4.0])));
        engine.render("k").unwrap();

        let report = engine.health();
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.source_available);
        assert_eq!(report.available_sources, 1);
        assert_eq!(report.cached_entries, 1);
        assert!(report.warnings.is_empty());
        assert_eq!(report.stats.misses, 1);
    }

    #[test]
    fn test_health_warns_without_sources() {
        let report = engine(MemorySource::new()).health();
        assert_eq!(report.status, HealthStatus::Warning);
        assert_eq!(report.warnings, vec!["No data files found".to_string()]);
    }

    #[test]
    fn test_invalidate_all() {
        let engine = engine(
            MemorySource::new()
                .with("a", minute_ticks(&[1.0, 2.0, 3.0, 4.0]))
                .with("b", minute_ticks(&[4.0, 3.0, 2.0, 1.0])),
        );
        engine.render("a").unwrap();
        engine.render("b").unwrap();

        assert_eq!(engine.invalidate_all(), 2);
        assert!(engine.inspect_cache().is_empty());
        assert_eq!(engine.render("a").unwrap().metadata.cache_status, CacheStatus::Miss);
    }

    #[test]
    fn test_response_serializes() {
        let engine = engine(MemorySource::new().with("k", minute_ticks(&[1.0, 2.0, 3.0, 4.0])));
        let response = engine.render("k").unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["metadata"]["cache_status"], "miss");
        assert_eq!(json["chart"]["key"], "k");
        assert_eq!(
            json["chart"]["bricks"].as_array().unwrap().len(),
            response.metadata.brick_count
        );
    }

    /// Serves ticks under a field set that lacks `price`.
    struct PricelessSource;

    impl TickSource for PricelessSource {
        fn load(&self, _id: &str) -> Result<LoadedTicks> {
            Ok(LoadedTicks {
                ticks: minute_ticks(&[1.0, 2.0, 3.0]),
                fields: FieldSet::new([FieldSet::TIMESTAMP, "last"]),
                path: PathBuf::from("priceless.csv"),
            })
        }

        fn list(&self) -> Result<Vec<String>> {
            Ok(vec!["priceless".to_string()])
        }
    }

    #[test]
    fn test_field_contract_applies_to_render_and_analyze() {
        let engine = RenkoEngine::new(PricelessSource, EngineConfig::default()).unwrap();
        assert!(matches!(
            engine.render("priceless"),
            Err(RenkoError::MissingRequiredField { .. })
        ));
        assert!(matches!(
            engine.analyze("priceless"),
            Err(RenkoError::MissingRequiredField { .. })
        ));
    }
}

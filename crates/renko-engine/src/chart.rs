//! Pipeline results.

use chrono::{DateTime, Utc};
use renko_aggregate::Ohlcv;
use renko_bricks::{Brick, BrickRecord};
use renko_estimate::{BrickSizeEstimate, SizingMethod};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::CacheStatus;

/// A computed Renko chart and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenkoChart {
    /// Source identifier the chart was computed for.
    pub key: String,
    /// Resolved source location.
    pub source_path: PathBuf,
    /// Number of ticks read from the source.
    pub original_row_count: usize,
    /// Intermediate OHLC bars.
    pub bars: Vec<Ohlcv>,
    /// Brick size and how it was chosen.
    pub estimate: BrickSizeEstimate,
    /// Bricks in order.
    pub bricks: Vec<Brick>,
    /// Wall time of the pipeline run.
    pub compute_duration: Duration,
}

impl RenkoChart {
    /// Returns the number of bricks.
    #[must_use]
    pub fn brick_count(&self) -> usize {
        self.bricks.len()
    }

    /// Returns the number of OHLC bars.
    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// Returns the brick size.
    #[must_use]
    pub const fn brick_size(&self) -> f64 {
        self.estimate.size
    }

    /// Returns the bricks as `{timestamp, open, high, low, close}` records.
    #[must_use]
    pub fn records(&self) -> Vec<BrickRecord> {
        self.bricks.iter().map(BrickRecord::from).collect()
    }
}

/// Summary returned alongside a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMetadata {
    /// Number of ticks read from the source.
    pub original_row_count: usize,
    /// Number of OHLC bars.
    pub bar_count: usize,
    /// Number of bricks.
    pub brick_count: usize,
    /// Brick size.
    pub brick_size: f64,
    /// How the brick size was chosen.
    pub sizing_method: SizingMethod,
    /// Why the configured strategy was not used, if it wasn't.
    pub fallback_reason: Option<String>,
    /// Wall time of this request in seconds.
    pub processing_duration: f64,
    /// Whether the chart came from the cache.
    pub cache_status: CacheStatus,
    /// Age of the chart in seconds when it was returned.
    pub cache_age_seconds: f64,
}

/// A chart together with request metadata.
#[derive(Debug, Clone, Serialize)]
pub struct RenkoResponse {
    /// The chart, shared with the cache.
    pub chart: Arc<RenkoChart>,
    /// Request metadata.
    pub metadata: ResponseMetadata,
}

impl RenkoResponse {
    pub(crate) fn new(
        chart: Arc<RenkoChart>,
        status: CacheStatus,
        age: Duration,
        elapsed: Duration,
    ) -> Self {
        let metadata = ResponseMetadata {
            original_row_count: chart.original_row_count,
            bar_count: chart.bar_count(),
            brick_count: chart.brick_count(),
            brick_size: chart.brick_size(),
            sizing_method: chart.estimate.method,
            fallback_reason: chart.estimate.fallback_reason.clone(),
            processing_duration: elapsed.as_secs_f64(),
            cache_status: status,
            cache_age_seconds: age.as_secs_f64(),
        };
        Self { chart, metadata }
    }
}

/// Source statistics with both brick-size estimates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceAnalysis {
    /// Resolved source location.
    pub source_path: PathBuf,
    /// Field names the source exposes.
    pub fields: Vec<String>,
    /// Number of ticks.
    pub row_count: usize,
    /// Earliest tick timestamp.
    pub first_timestamp: Option<DateTime<Utc>>,
    /// Latest tick timestamp.
    pub last_timestamp: Option<DateTime<Utc>>,
    /// Number of OHLC bars at the configured width.
    pub bar_count: usize,
    /// ATR size, or the reason it could not be computed.
    pub atr: Result<f64, String>,
    /// Statistical size, or the reason it could not be computed.
    pub statistical: Result<f64, String>,
    /// Size the engine would use.
    pub estimate: BrickSizeEstimate,
}

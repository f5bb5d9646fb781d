//! Tick-to-Renko aggregation.
//!
//! This is a facade crate that re-exports the renko workspace crates.
//!
//! # Quick Start
//!
//! ```no_run
//! use renko_lib::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let engine = RenkoEngine::new(DirectorySource::with_default_root(), EngineConfig::default())?;
//!     let response = engine.render("btcusd")?;
//!
//!     for brick in response.chart.records() {
//!         println!("{} {} -> {}", brick.timestamp, brick.open, brick.close);
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use renko_types::*;

pub use renko_aggregate::{Ohlcv, TickAggregator, bucket_end, resample};

pub use renko_estimate::{
    AtrEstimator, BrickSizeEstimate, BrickSizeEstimator, BrickSizer, BrickStrategy,
    BrickStrategyParseError, SizingMethod, StatisticalEstimator, true_ranges,
};

pub use renko_bricks::{Brick, BrickRecord, Direction, RawBrick, RenkoBuilder, synthesize};

pub use renko_source::{
    DirectorySource, FieldSet, LoadedTicks, MemorySource, SourceFormat, TickSource,
    parse_timestamp, read_ticks,
};

pub use renko_engine::{
    CacheInfo, CacheLookup, CacheStatus, EngineConfig, EngineStats, HealthReport, HealthStatus,
    RenkoChart, RenkoEngine, RenkoResponse, ResponseMetadata, ResultCache, SourceAnalysis,
    StatsSnapshot,
};

#[cfg(feature = "format")]
pub use renko_format::{CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use renko_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use renko_lib::prelude::*;
/// ```
pub mod prelude {
    pub use renko_types::{RawTick, RenkoError, Result, Tick, Timeframe};

    pub use renko_aggregate::{Ohlcv, resample};

    pub use renko_estimate::{BrickSizeEstimate, BrickSizer, BrickStrategy, SizingMethod};

    pub use renko_bricks::{Brick, BrickRecord, Direction, RenkoBuilder};

    pub use renko_source::{DirectorySource, LoadedTicks, TickSource};

    pub use renko_engine::{CacheStatus, EngineConfig, HealthStatus, RenkoEngine, RenkoResponse};

    #[cfg(feature = "format")]
    pub use renko_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use renko_format::ParquetFormatter;
}

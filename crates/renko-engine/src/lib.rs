//! Cached tick-to-Renko pipeline orchestration.
//!
//! - [`EngineConfig`] - Pipeline and cache settings
//! - [`ResultCache`] - Per-key chart cache with a TTL
//! - [`RenkoEngine`] - Load, resample, size, build and cache
//! - [`RenkoChart`] - A computed brick series with its provenance
//! - [`EngineStats`] - Request counters behind [`RenkoEngine::health`]

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod chart;
mod config;
mod engine;
mod stats;

pub use cache::{CacheInfo, CacheLookup, CacheStatus, ResultCache};
pub use chart::{RenkoChart, RenkoResponse, ResponseMetadata, SourceAnalysis};
pub use config::EngineConfig;
pub use engine::RenkoEngine;
pub use stats::{EngineStats, HealthReport, HealthStatus, StatsSnapshot};

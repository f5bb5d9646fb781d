//! Tick-to-OHLC resampling for the renko pipeline.
//!
//! This crate provides tick-to-bar aggregation:
//!
//! - [`Ohlcv`] - OHLC bar data structure
//! - [`TickAggregator`] - Streaming aggregator over time-ordered ticks
//! - [`resample`] - Batch resampling with validation and sorting

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod ohlcv;

pub use aggregator::{TickAggregator, bucket_end, resample};
pub use ohlcv::Ohlcv;

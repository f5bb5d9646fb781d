//! Brick-size estimation for the renko pipeline.
//!
//! This crate turns an OHLC series into a single positive brick size:
//!
//! - [`BrickSizeEstimator`] - Common interface of the sizing strategies
//! - [`AtrEstimator`] - Trailing mean of true ranges
//! - [`StatisticalEstimator`] - Scaled population standard deviation of closes
//! - [`BrickSizer`] - Strategy selection with the ATR-to-statistical fallback
//! - [`BrickSizeEstimate`] - The chosen size and how it was obtained

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod estimator;
mod sizer;

pub use estimator::{AtrEstimator, BrickSizeEstimator, StatisticalEstimator, true_ranges};
pub use sizer::{
    BrickSizeEstimate, BrickSizer, BrickStrategy, BrickStrategyParseError, SizingMethod,
};

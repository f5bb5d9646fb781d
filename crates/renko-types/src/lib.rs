//! Core types for the renko tick aggregation pipeline.
//!
//! This crate provides the fundamental data structures used throughout the workspace:
//!
//! - [`Tick`] - A validated trade with timestamp, price and size
//! - [`RawTick`] - Tick as decoded from a file, before defaults and validation
//! - [`Timeframe`] - Bucket width for OHLC resampling
//! - [`RenkoError`] - Error type shared by every pipeline stage

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod tick;
mod timeframe;

pub use error::{RenkoError, Result};
pub use tick::{RawTick, Tick};
pub use timeframe::{Timeframe, TimeframeParseError};

//! Renko brick construction for the renko pipeline.
//!
//! - [`Brick`] - A brick with its level, size, direction and render OHLC
//! - [`BrickRecord`] - The timestamped OHLC form of a brick
//! - [`RawBrick`] - A brick as emitted by the walk, before OHLC synthesis
//! - [`Direction`] - Up or down relative to the previous brick
//! - [`RenkoBuilder`] - Close-to-close brick walk and OHLC synthesis

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod brick;
mod builder;

pub use brick::{Brick, BrickRecord, Direction, RawBrick};
pub use builder::{RenkoBuilder, synthesize};

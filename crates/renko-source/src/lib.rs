//! Tick file loading for the renko pipeline.
//!
//! - [`TickSource`] - Resolves a source identifier to ticks
//! - [`DirectorySource`] - Tick files in a directory, by file stem
//! - [`MemorySource`] - In-memory ticks keyed by identifier
//! - [`LoadedTicks`] - Ticks with the fields and path they came from

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod directory;
mod fields;
mod memory;
mod reader;
mod source;

pub use directory::DirectorySource;
pub use fields::FieldSet;
pub use memory::MemorySource;
pub use reader::{SourceFormat, parse_timestamp, read_ticks};
pub use source::{LoadedTicks, TickSource};

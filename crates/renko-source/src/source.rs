//! The tick source abstraction.

use renko_types::{Result, Tick};
use std::path::PathBuf;

use crate::FieldSet;

/// Ticks loaded from one source, with their provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTicks {
    /// Ticks in file order.
    pub ticks: Vec<Tick>,
    /// Field names present in the source.
    pub fields: FieldSet,
    /// Resolved location of the source.
    pub path: PathBuf,
}

impl LoadedTicks {
    /// Returns the number of rows loaded.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.ticks.len()
    }
}

/// Resolves source identifiers to ticks.
pub trait TickSource: Send + Sync {
    /// Loads every tick for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`renko_types::RenkoError::SourceNotFound`],
    /// [`renko_types::RenkoError::UnsupportedFormat`] or
    /// [`renko_types::RenkoError::MissingRequiredField`] when the source
    /// cannot be resolved or read, and
    /// [`renko_types::RenkoError::InvalidRecord`] for a malformed row.
    fn load(&self, id: &str) -> Result<LoadedTicks>;

    /// Lists the identifiers this source can load.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be enumerated.
    fn list(&self) -> Result<Vec<String>>;
}

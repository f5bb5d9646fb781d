//! In-memory tick source.

use renko_types::{RenkoError, Result, Tick};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{FieldSet, LoadedTicks, TickSource};

/// Ticks held in memory, keyed by identifier.
///
/// Useful for tests and benchmarks. Every entry reports the full
/// `timestamp`, `price`, `size` field set and a `memory://<id>` path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: BTreeMap<String, Vec<Tick>>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the ticks for `id`.
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, ticks: Vec<Tick>) -> Self {
        self.insert(id, ticks);
        self
    }

    /// Adds or replaces the ticks for `id`.
    pub fn insert(&mut self, id: impl Into<String>, ticks: Vec<Tick>) {
        self.entries.insert(id.into(), ticks);
    }
}

impl TickSource for MemorySource {
    fn load(&self, id: &str) -> Result<LoadedTicks> {
        let ticks = self
            .entries
            .get(id)
            .ok_or_else(|| RenkoError::SourceNotFound(id.to_string()))?;

        Ok(LoadedTicks {
            ticks: ticks.clone(),
            fields: FieldSet::new([FieldSet::TIMESTAMP, FieldSet::PRICE, FieldSet::SIZE]),
            path: PathBuf::from(format!("memory://{id}")),
        })
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

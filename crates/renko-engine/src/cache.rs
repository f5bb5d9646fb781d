//! Per-key result cache.

use chrono::{DateTime, Utc};
use derive_more::Display;
use renko_types::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};

use crate::RenkoChart;

/// Where a returned chart came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Served from a live cache entry.
    #[display("hit")]
    Hit,
    /// Computed because no live entry existed.
    #[display("miss")]
    Miss,
    /// Recomputed on request, replacing any entry.
    #[display("refreshed")]
    Refreshed,
}

/// A chart returned by the cache.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    /// The cached chart.
    pub chart: Arc<RenkoChart>,
    /// Hit, miss or refresh.
    pub status: CacheStatus,
    /// Age of the entry at lookup time.
    pub age: Duration,
}

/// Read-only view of one cache entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheInfo {
    /// Source identifier.
    pub key: String,
    /// When the entry was stored.
    pub cached_at: DateTime<Utc>,
    /// Seconds since the entry was stored.
    pub age_seconds: f64,
    /// Whether the entry has outlived the TTL.
    pub expired: bool,
    /// Number of bricks.
    pub brick_count: usize,
    /// Number of OHLC bars.
    pub bar_count: usize,
    /// Number of ticks read from the source.
    pub original_row_count: usize,
    /// Resolved source location.
    pub source_path: PathBuf,
}

#[derive(Debug)]
struct CacheEntry {
    chart: Arc<RenkoChart>,
    created: Instant,
    cached_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(chart: Arc<RenkoChart>) -> Self {
        Self {
            chart,
            created: Instant::now(),
            cached_at: Utc::now(),
        }
    }

    fn age(&self) -> Duration {
        self.created.elapsed()
    }
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Most recent chart per source key, reused for a fixed TTL.
///
/// Each key owns a slot behind its own mutex. A miss computes while holding
/// the slot, so concurrent requests for one key wait for a single
/// computation and then share it, while other keys proceed in parallel.
/// The map lock is only held to find or create a slot.
#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

impl ResultCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the live entry for `key`, computing and storing one if needed.
    ///
    /// An expired entry is dropped before `compute` runs. If `compute`
    /// fails the error is returned and the slot stays empty.
    ///
    /// # Errors
    ///
    /// Returns whatever `compute` returns.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Result<CacheLookup>
    where
        F: FnOnce() -> Result<RenkoChart>,
    {
        let slot = self.slot(key);
        let mut entry = lock(&slot);

        let hit = entry
            .as_ref()
            .filter(|e| e.age() < self.ttl)
            .map(|live| CacheLookup {
                chart: Arc::clone(&live.chart),
                status: CacheStatus::Hit,
                age: live.age(),
            });
        let result = match hit {
            Some(lookup) => Ok(lookup),
            None => {
                *entry = None;
                Self::store(&mut entry, compute, CacheStatus::Miss)
            }
        };
        drop(entry);

        if result.is_err() {
            self.release(key, slot);
        }
        result
    }

    /// Recomputes the entry for `key` unconditionally.
    ///
    /// On failure the previous entry is dropped.
    ///
    /// # Errors
    ///
    /// Returns whatever `compute` returns.
    pub fn refresh<F>(&self, key: &str, compute: F) -> Result<CacheLookup>
    where
        F: FnOnce() -> Result<RenkoChart>,
    {
        let slot = self.slot(key);
        let mut entry = lock(&slot);
        *entry = None;
        let result = Self::store(&mut entry, compute, CacheStatus::Refreshed);
        drop(entry);

        if result.is_err() {
            self.release(key, slot);
        }
        result
    }

    /// Drops the entry for `key`. Returns true if one was present.
    pub fn invalidate(&self, key: &str) -> bool {
        let Some(slot) = lock(&self.slots).get(key).cloned() else {
            return false;
        };
        let taken = lock(&slot).take();
        self.release(key, slot);
        taken.is_some()
    }

    /// Drops every entry. Returns how many were present.
    pub fn invalidate_all(&self) -> usize {
        let mut dropped = 0;
        for (key, slot) in self.snapshot() {
            if lock(&slot).take().is_some() {
                dropped += 1;
            }
            self.release(&key, slot);
        }
        dropped
    }

    /// Drops expired entries and unused empty slots. Returns how many
    /// entries were dropped.
    ///
    /// Slots that are computing are left alone.
    pub fn purge_expired(&self) -> usize {
        let mut purged = 0;
        lock(&self.slots).retain(|_, slot| {
            let Some(mut entry) = try_lock(slot) else {
                return true;
            };
            if entry.as_ref().is_some_and(|e| e.age() >= self.ttl) {
                *entry = None;
                purged += 1;
            }
            let empty = entry.is_none();
            drop(entry);
            !(empty && Arc::strong_count(slot) == 1)
        });
        purged
    }

    /// Describes every stored entry, sorted by key.
    ///
    /// Never blocks on a slot that is computing; such keys are skipped.
    #[must_use]
    pub fn inspect(&self) -> Vec<CacheInfo> {
        let mut infos: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter_map(|(key, slot)| {
                let entry = try_lock(&slot)?;
                let entry = entry.as_ref()?;
                let age = entry.age();
                Some(CacheInfo {
                    key,
                    cached_at: entry.cached_at,
                    age_seconds: age.as_secs_f64(),
                    expired: age >= self.ttl,
                    brick_count: entry.chart.brick_count(),
                    bar_count: entry.chart.bar_count(),
                    original_row_count: entry.chart.original_row_count,
                    source_path: entry.chart.source_path.clone(),
                })
            })
            .collect();
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        infos
    }

    /// Returns the number of stored entries, live or expired.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inspect().len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &str) -> Slot {
        Arc::clone(lock(&self.slots).entry(key.to_string()).or_default())
    }

    /// Removes the slot for `key` if it is empty and nobody else holds it.
    fn release(&self, key: &str, slot: Slot) {
        drop(slot);
        let mut slots = lock(&self.slots);
        let idle = slots.get(key).is_some_and(|slot| {
            Arc::strong_count(slot) == 1 && try_lock(slot).is_some_and(|entry| entry.is_none())
        });
        if idle {
            slots.remove(key);
        }
    }

    fn snapshot(&self) -> Vec<(String, Slot)> {
        lock(&self.slots)
            .iter()
            .map(|(key, slot)| (key.clone(), Arc::clone(slot)))
            .collect()
    }

    fn store<F>(
        entry: &mut MutexGuard<'_, Option<CacheEntry>>,
        compute: F,
        status: CacheStatus,
    ) -> Result<CacheLookup>
    where
        F: FnOnce() -> Result<RenkoChart>,
    {
        let chart = Arc::new(compute()?);
        **entry = Some(CacheEntry::new(Arc::clone(&chart)));
        Ok(CacheLookup {
            chart,
            status,
            age: Duration::ZERO,
        })
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn try_lock<T>(mutex: &Mutex<T>) -> Option<MutexGuard<'_, T>> {
    match mutex.try_lock() {
        Ok(guard) => Some(guard),
        Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => None,
    }
}

//! Benchmark fixtures for the Renko pipeline.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use renko_lib::prelude::*;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Parameters of a synthetic tick series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesConfig {
    /// Number of ticks.
    pub ticks: usize,
    /// Gap between consecutive ticks.
    pub spacing: TimeDelta,
    /// Starting price.
    pub start_price: f64,
    /// Largest single-step move.
    pub max_step: f64,
    /// Seed for the step generator.
    pub seed: u64,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            ticks: 100_000,
            spacing: TimeDelta::milliseconds(250),
            start_price: 1.0850,
            max_step: 0.0002,
            seed: 0x5eed,
        }
    }
}

impl SeriesConfig {
    /// Returns a copy with `ticks` ticks.
    #[must_use]
    pub const fn with_ticks(mut self, ticks: usize) -> Self {
        self.ticks = ticks;
        self
    }
}

/// Generates a deterministic random-walk tick series.
pub fn synthetic_ticks(config: &SeriesConfig) -> Vec<Tick> {
    let start = series_start();
    let mut state = config.seed.max(1);
    let mut price = config.start_price;

    (0..config.ticks)
        .map(|i| {
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            price = (price + (unit * 2.0 - 1.0) * config.max_step).max(config.max_step);
            let size = 1 + state % 10;
            Tick::new(start + config.spacing * i as i32, price, size)
        })
        .collect()
}

/// Writes ticks as a `timestamp,price,size` CSV file and returns its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_tick_csv(dir: &Path, name: &str, ticks: &[Tick]) -> PathBuf {
    let mut body = String::with_capacity(ticks.len() * 48);
    body.push_str("timestamp,price,size\n");
    for tick in ticks {
        let _ = writeln!(
            body,
            "{},{},{}",
            tick.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            tick.price,
            tick.size
        );
    }

    let path = dir.join(name);
    std::fs::write(&path, body).expect("write tick fixture");
    path
}

fn series_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 23, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ticks_are_deterministic_and_valid() {
        let config = SeriesConfig::default().with_ticks(1_000);
        let first = synthetic_ticks(&config);
        let second = synthetic_ticks(&config);

        assert_eq!(first, second);
        assert_eq!(first.len(), 1_000);
        assert!(first.iter().all(|t| t.price > 0.0 && t.price.is_finite()));
        assert!(first.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }
}

//! Tick-to-OHLC aggregation.

use chrono::{DateTime, Utc};
use renko_types::{Result, Tick, Timeframe};

use crate::Ohlcv;

/// Streaming tick aggregator.
///
/// Aggregates time-ordered ticks into OHLC bars based on the configured
/// timeframe. Buckets are right-closed and right-labeled, so a tick stamped
/// exactly on a boundary belongs to the bucket that ends there.
#[derive(Debug)]
pub struct TickAggregator {
    timeframe: Timeframe,
    current_bar: Option<OhlcvBuilder>,
}

impl TickAggregator {
    /// Creates a new aggregator for the given timeframe.
    #[must_use]
    pub const fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            current_bar: None,
        }
    }

    /// Returns the timeframe being aggregated to.
    #[must_use]
    pub const fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Processes a tick, potentially emitting a completed bar.
    ///
    /// Ticks must arrive in non-decreasing timestamp order.
    /// Returns `Some(bar)` when a bar is completed by this tick,
    /// `None` otherwise.
    pub fn process(&mut self, tick: Tick) -> Option<Ohlcv> {
        let bar_end = bucket_end(tick.timestamp, self.timeframe);

        match self.current_bar.take() {
            Some(mut builder) if builder.timestamp == bar_end => {
                builder.update(&tick);
                self.current_bar = Some(builder);
                None
            }
            Some(builder) => {
                let completed = builder.finish();
                self.current_bar = Some(OhlcvBuilder::new(bar_end, &tick));
                Some(completed)
            }
            None => {
                self.current_bar = Some(OhlcvBuilder::new(bar_end, &tick));
                None
            }
        }
    }

    /// Finishes aggregation, returning any remaining partial bar.
    #[must_use]
    pub fn finish(self) -> Option<Ohlcv> {
        self.current_bar.map(OhlcvBuilder::finish)
    }
}

/// Resamples ticks into OHLC bars.
///
/// Every tick is validated first, then a copy is stably sorted by timestamp
/// so equal timestamps keep their input order. The input is never modified.
/// Empty input yields an empty series.
///
/// # Errors
///
/// Returns [`renko_types::RenkoError::InvalidRecord`] for the first tick whose
/// price is not positive and finite.
pub fn resample(ticks: &[Tick], timeframe: Timeframe) -> Result<Vec<Ohlcv>> {
    for (row, tick) in ticks.iter().enumerate() {
        tick.validate(row)?;
    }

    let mut sorted = ticks.to_vec();
    sorted.sort_by_key(|t| t.timestamp);

    let mut aggregator = TickAggregator::new(timeframe);
    let mut bars = Vec::new();

    for tick in sorted {
        if let Some(bar) = aggregator.process(tick) {
            bars.push(bar);
        }
    }

    if let Some(bar) = aggregator.finish() {
        bars.push(bar);
    }

    Ok(bars)
}

/// Returns the end (and label) of the bucket containing `timestamp`.
///
/// A timestamp that falls exactly on a boundary is its own bucket end.
#[must_use]
pub fn bucket_end(timestamp: DateTime<Utc>, timeframe: Timeframe) -> DateTime<Utc> {
    let width = timeframe.milliseconds() * 1000;
    let micros = timestamp.timestamp_micros();
    let floor = micros - micros.rem_euclid(width);
    let on_boundary = floor == micros && timestamp.timestamp_subsec_nanos() % 1000 == 0;
    let end = if on_boundary { floor } else { floor + width };

    DateTime::from_timestamp_micros(end).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Builder for OHLC bars.
#[derive(Debug)]
struct OhlcvBuilder {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
    tick_count: u32,
}

impl OhlcvBuilder {
    /// Creates a new builder from the first tick.
    const fn new(timestamp: DateTime<Utc>, tick: &Tick) -> Self {
        Self {
            timestamp,
            open: tick.price,
            high: tick.price,
            low: tick.price,
            close: tick.price,
            volume: tick.size,
            tick_count: 1,
        }
    }

    /// Updates the builder with a new tick.
    fn update(&mut self, tick: &Tick) {
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.close = tick.price;
        self.volume = self.volume.saturating_add(tick.size);
        self.tick_count = self.tick_count.saturating_add(1);
    }

    /// Finishes building and returns the OHLC bar.
    const fn finish(self) -> Ohlcv {
        Ohlcv::new(
            self.timestamp,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.tick_count,
        )
    }
}

//! Close-to-close Renko walk and brick OHLC synthesis.

use renko_aggregate::Ohlcv;
use renko_types::{RenkoError, Result};

use crate::{Brick, Direction, RawBrick};

/// Builds Renko bricks from an OHLC series.
///
/// The first bar's close seeds the reference level. Every later close is
/// compared against the last emitted brick (or the seed), and while the gap
/// is at least one brick size a brick is emitted in the direction of the
/// move. A single bar can therefore emit several bricks, all carrying its
/// timestamp. Intrabar highs and lows are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenkoBuilder {
    padding_fraction: f64,
}

impl RenkoBuilder {
    /// Default wick padding as a fraction of the brick size.
    pub const DEFAULT_PADDING_FRACTION: f64 = 0.10;

    /// Creates a builder with the default padding.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            padding_fraction: Self::DEFAULT_PADDING_FRACTION,
        }
    }

    /// Sets the wick padding fraction.
    #[must_use]
    pub const fn with_padding_fraction(mut self, padding_fraction: f64) -> Self {
        self.padding_fraction = padding_fraction;
        self
    }

    /// Returns the wick padding fraction.
    #[must_use]
    pub const fn padding_fraction(&self) -> f64 {
        self.padding_fraction
    }

    /// Walks the series and returns the raw bricks.
    ///
    /// Returns an empty vector when the series is empty or never moves a
    /// full brick away from its first close.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::DegenerateSeries`] if `brick_size` is not
    /// positive and finite.
    pub fn walk(&self, bars: &[Ohlcv], brick_size: f64) -> Result<Vec<RawBrick>> {
        check_size(brick_size)?;

        let Some((first, rest)) = bars.split_first() else {
            return Ok(Vec::new());
        };

        let mut last = first.close;
        let mut bricks = Vec::new();

        for bar in rest {
            let mut delta = bar.close - last;
            while delta.abs() >= brick_size {
                let direction = Direction::of(delta);
                let step = direction.sign() * brick_size;
                last += step;
                delta -= step;
                bricks.push(RawBrick {
                    timestamp: bar.timestamp,
                    value: last,
                    size: brick_size,
                    direction,
                });
            }
        }

        Ok(bricks)
    }

    /// Walks the series and synthesizes render OHLC for every brick.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::DegenerateSeries`] for an invalid brick size and
    /// [`RenkoError::NoBricksFormed`] when the walk emits nothing.
    pub fn build(&self, bars: &[Ohlcv], brick_size: f64) -> Result<Vec<Brick>> {
        let raw = self.walk(bars, brick_size)?;

        if raw.is_empty() {
            return Err(RenkoError::NoBricksFormed {
                brick_size,
                price_range: close_range(bars),
            });
        }

        Ok(synthesize(&raw, self.padding_fraction))
    }
}

impl Default for RenkoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives OHLC for each raw brick.
///
/// The open is the previous brick's value, or `value - size` for the first
/// brick. High and low extend the body by `padding_fraction * size`.
#[must_use]
pub fn synthesize(raw: &[RawBrick], padding_fraction: f64) -> Vec<Brick> {
    let mut previous: Option<f64> = None;

    raw.iter()
        .map(|b| {
            let open = previous.unwrap_or(b.value - b.size);
            let close = b.value;
            let pad = padding_fraction * b.size;
            previous = Some(close);

            Brick {
                timestamp: b.timestamp,
                value: b.value,
                size: b.size,
                direction: b.direction,
                open,
                high: open.max(close) + pad,
                low: open.min(close) - pad,
                close,
            }
        })
        .collect()
}

fn check_size(brick_size: f64) -> Result<()> {
    if brick_size.is_finite() && brick_size > 0.0 {
        Ok(())
    } else {
        Err(RenkoError::DegenerateSeries(format!(
            "brick size must be positive, got {brick_size}"
        )))
    }
}

fn close_range(bars: &[Ohlcv]) -> f64 {
    let (min, max) = bars.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
        (lo.min(b.close), hi.max(b.close))
    });
    if bars.is_empty() { 0.0 } else { max - min }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 23, 13, 31, 0).unwrap()
    }

    fn closes(values: &[f64]) -> Vec<Ohlcv> {
        values
            .iter()
            .enumerate()
            .map(|(i, c)| Ohlcv::new(start() + TimeDelta::minutes(i as i64), *c, *c, *c, *c, 1, 1))
            .collect()
    }

    #[test]
    fn test_reversal_walk() {
        let bars = closes(&[100.0, 103.0, 107.0, 104.0, 101.0]);
        let bricks = RenkoBuilder::new().build(&bars, 3.0).unwrap();

        let values: Vec<_> = bricks.iter().map(|b| b.value).collect();
        assert_eq!(values, vec![103.0, 106.0, 103.0]);

        let directions: Vec<_> = bricks.iter().map(|b| b.direction).collect();
        assert_eq!(directions, vec![Direction::Up, Direction::Up, Direction::Down]);

        assert_eq!(bricks[0].timestamp, bars[1].timestamp);
        assert_eq!(bricks[1].timestamp, bars[2].timestamp);
        assert_eq!(bricks[2].timestamp, bars[4].timestamp);

        assert_relative_eq!(bricks[0].open, 100.0);
        assert_relative_eq!(bricks[0].high, 103.3, epsilon = 1e-9);
        assert_relative_eq!(bricks[0].low, 99.7, epsilon = 1e-9);
        assert_relative_eq!(bricks[2].open, 106.0);
        assert_relative_eq!(bricks[2].high, 106.3, epsilon = 1e-9);
        assert_relative_eq!(bricks[2].low, 102.7, epsilon = 1e-9);
    }

    #[test]
    fn test_one_bar_many_bricks() {
        let bars = closes(&[10.0, 17.5]);
        let bricks = RenkoBuilder::new().build(&bars, 2.0).unwrap();

        assert_eq!(bricks.len(), 3);
        assert!(bricks.iter().all(|b| b.timestamp == bars[1].timestamp));
        assert_eq!(bricks.last().unwrap().value, 16.0);
    }

    #[test]
    fn test_down_walk_from_seed() {
        let bars = closes(&[50.0, 44.0]);
        let bricks = RenkoBuilder::new().build(&bars, 3.0).unwrap();

        assert_eq!(bricks.len(), 2);
        assert!(bricks.iter().all(|b| b.direction == Direction::Down));
        assert_relative_eq!(bricks[0].value, 47.0);
        // The first brick opens one size below its value regardless of direction.
        assert_relative_eq!(bricks[0].open, 44.0);
        assert_relative_eq!(bricks[1].open, 47.0);
        assert_relative_eq!(bricks[1].close, 44.0);
    }

    #[test]
    fn test_brick_invariants() {
        let bars = closes(&[100.0, 101.2, 99.1, 104.9, 103.3, 97.0, 98.2, 102.6, 108.8]);
        let size = 1.5;
        let bricks = RenkoBuilder::new().build(&bars, size).unwrap();

        for (i, b) in bricks.iter().enumerate() {
            assert_eq!(b.close, b.value);
            assert!(b.high >= b.open.max(b.close));
            assert!(b.low <= b.open.min(b.close));
            assert_relative_eq!(b.high - b.open.max(b.close), 0.1 * size, epsilon = 1e-9);
            assert_relative_eq!(b.open.min(b.close) - b.low, 0.1 * size, epsilon = 1e-9);
            if i > 0 {
                assert_eq!(b.open, bricks[i - 1].value);
                assert_relative_eq!((b.value - bricks[i - 1].value).abs(), size, epsilon = 1e-9);
            }
        }
        assert!(bricks.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_sub_brick_moves_are_ignored() {
        let bars = closes(&[100.0, 102.9, 97.1, 100.0]);
        let err = RenkoBuilder::new().build(&bars, 3.0).unwrap_err();
        match err {
            RenkoError::NoBricksFormed {
                brick_size,
                price_range,
            } => {
                assert_relative_eq!(brick_size, 3.0);
                assert_relative_eq!(price_range, 5.8, epsilon = 1e-9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exact_brick_move_triggers() {
        let bricks = RenkoBuilder::new().build(&closes(&[10.0, 12.0]), 2.0).unwrap();
        assert_eq!(bricks.len(), 1);
    }

    #[test]
    fn test_empty_and_single_bar() {
        assert!(RenkoBuilder::new().walk(&[], 1.0).unwrap().is_empty());
        assert!(matches!(
            RenkoBuilder::new().build(&closes(&[5.0]), 1.0),
            Err(RenkoError::NoBricksFormed { .. })
        ));
    }

    #[test]
    fn test_invalid_size() {
        let bars = closes(&[1.0, 5.0]);
        for size in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                RenkoBuilder::new().build(&bars, size),
                Err(RenkoError::DegenerateSeries(_))
            ));
        }
    }

    #[test]
    fn test_intrabar_extremes_ignored() {
        let start = start();
        let bars = vec![
            Ohlcv::new(start, 100.0, 100.0, 100.0, 100.0, 1, 1),
            Ohlcv::new(start + TimeDelta::minutes(1), 100.0, 120.0, 80.0, 101.0, 1, 1),
        ];
        assert!(RenkoBuilder::new().walk(&bars, 5.0).unwrap().is_empty());
    }

    #[test]
    fn test_custom_padding() {
        let bricks = RenkoBuilder::new()
            .with_padding_fraction(0.0)
            .build(&closes(&[10.0, 12.0]), 2.0)
            .unwrap();
        assert_eq!((bricks[0].high, bricks[0].low), (12.0, 10.0));
    }
}

//! Brick-size estimation strategies.

use renko_aggregate::Ohlcv;
use renko_types::{RenkoError, Result};

/// A strategy that derives one brick size from an OHLC series.
///
/// Implementations never mutate the series and only ever return a
/// strictly positive, finite size.
pub trait BrickSizeEstimator: Send + Sync {
    /// Estimates the brick size for the given bars.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::InsufficientData`] if the series is too short,
    /// or [`RenkoError::DegenerateSeries`] if the estimate is not positive.
    fn estimate(&self, bars: &[Ohlcv]) -> Result<f64>;

    /// Returns a short name for the strategy.
    fn name(&self) -> &'static str;
}

/// Average-true-range estimator.
///
/// The brick size is the simple mean of the trailing `lookback` true ranges,
/// or of every available true range when the series is shorter than that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtrEstimator {
    lookback: usize,
}

impl AtrEstimator {
    /// Default lookback window in bars.
    pub const DEFAULT_LOOKBACK: usize = 14;

    /// Creates an ATR estimator with the given lookback.
    ///
    /// A lookback of zero is treated as one.
    #[must_use]
    pub const fn new(lookback: usize) -> Self {
        Self {
            lookback: if lookback == 0 { 1 } else { lookback },
        }
    }

    /// Returns the lookback window.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        self.lookback
    }
}

impl Default for AtrEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOOKBACK)
    }
}

impl BrickSizeEstimator for AtrEstimator {
    fn estimate(&self, bars: &[Ohlcv]) -> Result<f64> {
        if bars.len() < 2 {
            return Err(RenkoError::InsufficientData {
                required: 2,
                available: bars.len(),
            });
        }

        let ranges = true_ranges(bars);
        let window = &ranges[ranges.len().saturating_sub(self.lookback)..];
        let atr = window.iter().sum::<f64>() / window.len() as f64;

        if atr.is_finite() && atr > 0.0 {
            Ok(atr)
        } else {
            Err(RenkoError::DegenerateSeries(format!(
                "average true range over {} bars is {atr}",
                window.len()
            )))
        }
    }

    fn name(&self) -> &'static str {
        "atr"
    }
}

/// Standard-deviation estimator.
///
/// The brick size is `multiplier` times the population standard deviation
/// of the bar closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticalEstimator {
    multiplier: f64,
}

impl StatisticalEstimator {
    /// Default multiplier applied to the standard deviation.
    pub const DEFAULT_MULTIPLIER: f64 = 0.5;

    /// Creates an estimator with the given multiplier.
    #[must_use]
    pub const fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// Returns the multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Default for StatisticalEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MULTIPLIER)
    }
}

impl BrickSizeEstimator for StatisticalEstimator {
    fn estimate(&self, bars: &[Ohlcv]) -> Result<f64> {
        if bars.is_empty() {
            return Err(RenkoError::InsufficientData {
                required: 1,
                available: 0,
            });
        }

        let n = bars.len() as f64;
        let mean = bars.iter().map(|b| b.close).sum::<f64>() / n;
        let variance = bars.iter().map(|b| (b.close - mean).powi(2)).sum::<f64>() / n;
        let size = self.multiplier * variance.sqrt();

        if size.is_finite() && size > 0.0 {
            Ok(size)
        } else {
            Err(RenkoError::DegenerateSeries(format!(
                "standard deviation of {} closes yields brick size {size}",
                bars.len()
            )))
        }
    }

    fn name(&self) -> &'static str {
        "statistical"
    }
}

/// Returns the true range of every bar after the first.
///
/// The first bar has no previous close and contributes nothing.
#[must_use]
pub fn true_ranges(bars: &[Ohlcv]) -> Vec<f64> {
    bars.windows(2)
        .map(|pair| pair[1].true_range(pair[0].close))
        .collect()
}

//! Strategy selection and the sizing fallback policy.

use derive_more::Display;
use renko_aggregate::Ohlcv;
use renko_types::{RenkoError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{AtrEstimator, BrickSizeEstimator, StatisticalEstimator};

/// Configured brick-size strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
pub enum BrickStrategy {
    /// Average true range, falling back to the statistical estimate.
    #[default]
    #[display("atr")]
    Atr,
    /// Scaled standard deviation of closes only.
    #[display("statistical")]
    Statistical,
}

impl FromStr for BrickStrategy {
    type Err = BrickStrategyParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "atr" => Ok(Self::Atr),
            "statistical" | "stat" | "std" | "stddev" => Ok(Self::Statistical),
            _ => Err(BrickStrategyParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid strategy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrickStrategyParseError(String);

impl std::fmt::Display for BrickStrategyParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid brick strategy '{}', expected one of: atr, statistical",
            self.0
        )
    }
}

impl std::error::Error for BrickStrategyParseError {}

/// How the final brick size was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum SizingMethod {
    /// Average true range.
    #[display("atr")]
    Atr,
    /// Scaled standard deviation of closes.
    #[display("statistical")]
    Statistical,
    /// Configured minimum, substituted for a degenerate series.
    #[display("minimum_default")]
    MinimumDefault,
}

/// A brick size together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickSizeEstimate {
    /// The brick size.
    pub size: f64,
    /// Method that produced it.
    pub method: SizingMethod,
    /// Why the configured strategy was not used, if it wasn't.
    pub fallback_reason: Option<String>,
}

impl BrickSizeEstimate {
    /// Returns true if a fallback replaced the configured strategy.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Brick sizing with the ATR-to-statistical fallback.
///
/// With [`BrickStrategy::Atr`], an ATR failure of any kind hands over to the
/// statistical estimator. Whichever strategy ends up statistical, a
/// [`RenkoError::DegenerateSeries`] result is replaced by `min_brick_size`.
/// Other statistical failures propagate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickSizer {
    strategy: BrickStrategy,
    atr: AtrEstimator,
    statistical: StatisticalEstimator,
    min_brick_size: f64,
}

impl BrickSizer {
    /// Default substitute for degenerate series.
    pub const DEFAULT_MIN_BRICK_SIZE: f64 = 0.01;

    /// Creates a sizer with default estimator parameters.
    #[must_use]
    pub fn new(strategy: BrickStrategy) -> Self {
        Self {
            strategy,
            atr: AtrEstimator::default(),
            statistical: StatisticalEstimator::default(),
            min_brick_size: Self::DEFAULT_MIN_BRICK_SIZE,
        }
    }

    /// Sets the ATR estimator.
    #[must_use]
    pub const fn with_atr(mut self, atr: AtrEstimator) -> Self {
        self.atr = atr;
        self
    }

    /// Sets the statistical estimator.
    #[must_use]
    pub const fn with_statistical(mut self, statistical: StatisticalEstimator) -> Self {
        self.statistical = statistical;
        self
    }

    /// Sets the size substituted for degenerate series.
    #[must_use]
    pub const fn with_min_brick_size(mut self, min_brick_size: f64) -> Self {
        self.min_brick_size = min_brick_size;
        self
    }

    /// Returns the configured strategy.
    #[must_use]
    pub const fn strategy(&self) -> BrickStrategy {
        self.strategy
    }

    /// Estimates the brick size for the given bars.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::InsufficientData`] if the series is empty.
    pub fn estimate(&self, bars: &[Ohlcv]) -> Result<BrickSizeEstimate> {
        let mut fallback_reason = None;

        if self.strategy == BrickStrategy::Atr {
            match self.atr.estimate(bars) {
                Ok(size) => {
                    return Ok(BrickSizeEstimate {
                        size,
                        method: SizingMethod::Atr,
                        fallback_reason: None,
                    });
                }
                Err(err) => fallback_reason = Some(format!("atr: {err}")),
            }
        }

        match self.statistical.estimate(bars) {
            Ok(size) => Ok(BrickSizeEstimate {
                size,
                method: SizingMethod::Statistical,
                fallback_reason,
            }),
            Err(RenkoError::DegenerateSeries(reason)) => {
                let reason = match fallback_reason {
                    Some(prev) => format!("{prev}; statistical: {reason}"),
                    None => format!("statistical: {reason}"),
                };
                Ok(BrickSizeEstimate {
                    size: self.min_brick_size,
                    method: SizingMethod::MinimumDefault,
                    fallback_reason: Some(reason),
                })
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for BrickSizer {
    fn default() -> Self {
        Self::new(BrickStrategy::default())
    }
}

//! Engine configuration.

use renko_bricks::RenkoBuilder;
use renko_estimate::{AtrEstimator, BrickSizer, BrickStrategy, StatisticalEstimator};
use renko_types::{RenkoError, Result, Timeframe};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pipeline and cache settings.
///
/// Every field has a default, so a JSON file only needs the keys it
/// changes. `cache_ttl` is written in seconds and may be fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Resampling bucket width.
    pub bucket_width: Timeframe,
    /// Number of trailing true ranges averaged by the ATR strategy.
    pub atr_lookback: usize,
    /// Brick-size strategy.
    pub brick_strategy: BrickStrategy,
    /// How long a computed chart is reused.
    #[serde(with = "seconds")]
    pub cache_ttl: Duration,
    /// Brick wick padding as a fraction of the brick size.
    pub padding_fraction: f64,
    /// Multiplier applied to the standard deviation of closes.
    pub statistical_multiplier: f64,
    /// Brick size used when the series is too flat to size.
    pub min_brick_size: f64,
}

impl EngineConfig {
    /// Default cache lifetime.
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.atr_lookback == 0 {
            return Err(RenkoError::Config("atr_lookback must be greater than 0".into()));
        }
        if self.cache_ttl.is_zero() {
            return Err(RenkoError::Config("cache_ttl must be positive".into()));
        }
        if !(self.padding_fraction.is_finite() && self.padding_fraction >= 0.0) {
            return Err(RenkoError::Config(format!(
                "padding_fraction must be non-negative, got {}",
                self.padding_fraction
            )));
        }
        if !(self.statistical_multiplier.is_finite() && self.statistical_multiplier > 0.0) {
            return Err(RenkoError::Config(format!(
                "statistical_multiplier must be positive, got {}",
                self.statistical_multiplier
            )));
        }
        if !(self.min_brick_size.is_finite() && self.min_brick_size > 0.0) {
            return Err(RenkoError::Config(format!(
                "min_brick_size must be positive, got {}",
                self.min_brick_size
            )));
        }
        Ok(())
    }

    /// Loads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::Io`] if the file cannot be read,
    /// [`RenkoError::Json`] if it is malformed and [`RenkoError::Config`]
    /// if a value is out of range.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the brick sizer described by this configuration.
    #[must_use]
    pub fn sizer(&self) -> BrickSizer {
        BrickSizer::new(self.brick_strategy)
            .with_atr(AtrEstimator::new(self.atr_lookback))
            .with_statistical(StatisticalEstimator::new(self.statistical_multiplier))
            .with_min_brick_size(self.min_brick_size)
    }

    /// Returns the brick builder described by this configuration.
    #[must_use]
    pub const fn builder(&self) -> RenkoBuilder {
        RenkoBuilder::new().with_padding_fraction(self.padding_fraction)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bucket_width: Timeframe::default(),
            atr_lookback: AtrEstimator::DEFAULT_LOOKBACK,
            brick_strategy: BrickStrategy::default(),
            cache_ttl: Self::DEFAULT_CACHE_TTL,
            padding_fraction: RenkoBuilder::DEFAULT_PADDING_FRACTION,
            statistical_multiplier: StatisticalEstimator::DEFAULT_MULTIPLIER,
            min_brick_size: BrickSizer::DEFAULT_MIN_BRICK_SIZE,
        }
    }
}

/// Serde adapter for a [`Duration`] stored as (fractional) seconds.
mod seconds {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

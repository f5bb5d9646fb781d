//! Trade tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RenkoError, Result};

/// A single trade observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Timestamp of the trade (UTC).
    pub timestamp: DateTime<Utc>,
    /// Trade price.
    pub price: f64,
    /// Traded quantity.
    pub size: u64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, price: f64, size: u64) -> Self {
        Self {
            timestamp,
            price,
            size,
        }
    }

    /// Returns true if the price is finite and strictly positive.
    #[must_use]
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    /// Checks the tick against the record contract.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::InvalidRecord`] if the price is not a positive finite number.
    pub fn validate(&self, row: usize) -> Result<()> {
        if self.has_valid_price() {
            Ok(())
        } else {
            Err(RenkoError::invalid_record(
                row,
                format!("price must be positive and finite, got {}", self.price),
            ))
        }
    }
}

/// Tick as decoded from a source file, before validation.
///
/// Loaders produce raw ticks so that absent fields can be told apart from
/// present ones; [`RawTick::normalize`] applies the defaults and checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTick {
    /// Timestamp of the trade (UTC).
    pub timestamp: DateTime<Utc>,
    /// Trade price, if the record carried one.
    pub price: Option<f64>,
    /// Traded quantity, if the record carried one.
    pub size: Option<u64>,
}

impl RawTick {
    /// Size assigned to ticks that do not carry one.
    pub const DEFAULT_SIZE: u64 = 1;

    /// Creates a new raw tick.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, price: Option<f64>, size: Option<u64>) -> Self {
        Self {
            timestamp,
            price,
            size,
        }
    }

    /// Converts the raw record into a validated [`Tick`].
    ///
    /// A missing size defaults to [`RawTick::DEFAULT_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::InvalidRecord`] if the price is missing,
    /// non-finite or not positive.
    pub fn normalize(self, row: usize) -> Result<Tick> {
        let price = self
            .price
            .ok_or_else(|| RenkoError::invalid_record(row, "price is missing"))?;
        let tick = Tick::new(
            self.timestamp,
            price,
            self.size.unwrap_or(Self::DEFAULT_SIZE),
        );
        tick.validate(row)?;
        Ok(tick)
    }
}

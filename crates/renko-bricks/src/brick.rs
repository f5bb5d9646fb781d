//! Renko brick data structures.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Direction of a brick relative to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Price moved up by one brick.
    #[display("up")]
    Up,
    /// Price moved down by one brick.
    #[display("down")]
    Down,
}

impl Direction {
    /// Returns the direction of a price change (`Up` for zero).
    #[must_use]
    pub fn of(delta: f64) -> Self {
        if delta < 0.0 { Self::Down } else { Self::Up }
    }

    /// Returns `1.0` for up and `-1.0` for down.
    #[must_use]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// A brick as produced by the walk, before OHLC synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBrick {
    /// Timestamp of the bar whose close formed the brick.
    pub timestamp: DateTime<Utc>,
    /// Price level at which the brick closed.
    pub value: f64,
    /// Brick size used to form it.
    pub size: f64,
    /// Direction of the move.
    pub direction: Direction,
}

/// A Renko brick with render-ready OHLC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Timestamp of the bar whose close formed the brick.
    pub timestamp: DateTime<Utc>,
    /// Price level at which the brick closed.
    pub value: f64,
    /// Brick size used to form it.
    pub size: f64,
    /// Direction of the move.
    pub direction: Direction,
    /// Previous brick's value (`value - size` for the first brick).
    pub open: f64,
    /// Upper body edge plus padding.
    pub high: f64,
    /// Lower body edge minus padding.
    pub low: f64,
    /// Same as `value`.
    pub close: f64,
}

impl Brick {
    /// Returns the body height (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns true for an up brick.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.direction == Direction::Up
    }

    /// Returns the render record for this brick.
    #[must_use]
    pub const fn record(&self) -> BrickRecord {
        BrickRecord {
            timestamp: self.timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
        }
    }
}

/// The externally visible form of a brick: a timestamped OHLC candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickRecord {
    /// Timestamp of the bar whose close formed the brick.
    pub timestamp: DateTime<Utc>,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
}

impl From<&Brick> for BrickRecord {
    fn from(brick: &Brick) -> Self {
        brick.record()
    }
}

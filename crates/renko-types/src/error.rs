//! Error types for the renko pipeline.

use thiserror::Error;

/// Result type alias for renko operations.
pub type Result<T> = std::result::Result<T, RenkoError>;

/// Errors that can occur while loading ticks and building Renko charts.
#[derive(Error, Debug)]
pub enum RenkoError {
    /// A tick record is malformed (missing or non-positive price, bad timestamp).
    #[error("Invalid record at row {row}: {reason}")]
    InvalidRecord {
        /// Zero-based row index of the offending record.
        row: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Too few bars for the requested computation.
    #[error("Insufficient data: need at least {required} bars, got {available}")]
    InsufficientData {
        /// Minimum number of bars required.
        required: usize,
        /// Number of bars available.
        available: usize,
    },

    /// The price series has no usable variation.
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// The series never moved far enough to form a single brick.
    #[error("No bricks formed: price range {price_range} never reached brick size {brick_size}")]
    NoBricksFormed {
        /// Brick size used for the walk.
        brick_size: f64,
        /// Total close-to-close range of the input.
        price_range: f64,
    },

    /// The requested data source does not exist.
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// The data source exists but its format is not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A field required by the tick contract is absent.
    #[error("Missing required field '{field}' in {origin}")]
    MissingRequiredField {
        /// Name of the missing field.
        field: String,
        /// Where the field was expected (file path or source id).
        origin: String,
    },

    /// File contents could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenkoError {
    /// Creates an [`RenkoError::InvalidRecord`] for the given row.
    pub fn invalid_record(row: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            row,
            reason: reason.into(),
        }
    }

    /// Creates a [`RenkoError::MissingRequiredField`].
    pub fn missing_field(field: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            origin: origin.into(),
        }
    }

    /// Returns true if this error was raised by a tick loader rather than the pipeline.
    #[must_use]
    pub const fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound(_)
                | Self::UnsupportedFormat(_)
                | Self::MissingRequiredField { .. }
                | Self::Parse(_)
                | Self::Io(_)
                | Self::Json(_)
        )
    }

    /// Returns a short machine-friendly name for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRecord { .. } => "invalid_record",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::DegenerateSeries(_) => "degenerate_series",
            Self::NoBricksFormed { .. } => "no_bricks_formed",
            Self::SourceNotFound(_) => "source_not_found",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::MissingRequiredField { .. } => "missing_required_field",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenkoError::invalid_record(3, "price is missing");
        assert_eq!(err.to_string(), "Invalid record at row 3: price is missing");

        let err = RenkoError::missing_field("price", "ticks.csv");
        assert_eq!(
            err.to_string(),
            "Missing required field 'price' in ticks.csv"
        );
    }

    #[test]
    fn test_source_error_classification() {
        assert!(RenkoError::SourceNotFound("spy".into()).is_source_error());
        assert!(RenkoError::UnsupportedFormat("spy.h5".into()).is_source_error());
        assert!(!RenkoError::DegenerateSeries("flat".into()).is_source_error());
        assert_eq!(
            RenkoError::NoBricksFormed {
                brick_size: 1.0,
                price_range: 0.5
            }
            .kind(),
            "no_bricks_formed"
        );
    }
}

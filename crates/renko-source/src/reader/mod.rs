//! File readers.

mod csv;
mod json;
#[cfg(feature = "parquet")]
mod parquet;

use chrono::{DateTime, NaiveDateTime, Utc};
use renko_types::{RenkoError, Result};
use std::path::Path;

use crate::LoadedTicks;

/// Tick file formats, in the order a bare identifier is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Apache Parquet.
    Parquet,
    /// CSV with a header row.
    Csv,
    /// JSON array of objects.
    Json,
    /// Newline-delimited JSON objects.
    Ndjson,
}

impl SourceFormat {
    /// Returns every format in resolution order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Parquet, Self::Csv, Self::Json, Self::Ndjson]
    }

    /// Returns the file extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns the format for a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "parquet" | "pq" => Some(Self::Parquet),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "ndjson" | "jsonl" => Some(Self::Ndjson),
            _ => None,
        }
    }

    /// Returns the format of a path.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::UnsupportedFormat`] for an unknown or missing
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| RenkoError::UnsupportedFormat(path.display().to_string()))
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Reads a tick file, choosing the reader from its extension.
///
/// # Errors
///
/// Returns [`RenkoError::SourceNotFound`] if the file does not exist,
/// [`RenkoError::UnsupportedFormat`] for an unknown extension (or Parquet
/// when the feature is disabled), and reader errors otherwise.
pub fn read_ticks(path: &Path) -> Result<LoadedTicks> {
    let format = SourceFormat::from_path(path)?;
    if !path.is_file() {
        return Err(RenkoError::SourceNotFound(path.display().to_string()));
    }

    match format {
        SourceFormat::Csv => csv::read(path),
        SourceFormat::Json => json::read_array(path),
        SourceFormat::Ndjson => json::read_lines(path),
        #[cfg(feature = "parquet")]
        SourceFormat::Parquet => parquet::read(path),
        #[cfg(not(feature = "parquet"))]
        SourceFormat::Parquet => Err(RenkoError::UnsupportedFormat(format!(
            "{} (built without parquet support)",
            path.display()
        ))),
    }
}

/// Parses a text timestamp as UTC.
///
/// Accepts RFC 3339 (`2025-06-23T13:30:00.250Z`, any offset) or a naive
/// `YYYY-MM-DD HH:MM:SS[.f]` with a space or `T` separator.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parses an optional numeric cell; blank cells are absent.
fn parse_cell<T: std::str::FromStr>(cell: Option<&str>, row: usize, field: &str) -> Result<Option<T>> {
    match cell.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| RenkoError::invalid_record(row, format!("{field} '{text}' is not a number"))),
    }
}

/// Converts a numeric size to a tick count.
fn size_from_f64(value: f64, row: usize) -> Result<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as u64)
    } else {
        Err(RenkoError::invalid_record(
            row,
            format!("size must be a non-negative integer, got {value}"),
        ))
    }
}

fn origin(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 23, 13, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-06-23T13:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-23T15:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-23 13:30:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2025-06-23T13:30:00 "), Some(expected));

        let frac = parse_timestamp("2025-06-23 13:30:00.250").unwrap();
        assert_eq!(frac.nanosecond(), 250_000_000);

        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("1750685400").is_none());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SourceFormat::from_path(Path::new("a/b.CSV")).unwrap(), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("x.jsonl")).unwrap(), SourceFormat::Ndjson);
        assert!(matches!(
            SourceFormat::from_path(Path::new("ticks.h5")),
            Err(RenkoError::UnsupportedFormat(_))
        ));
        assert!(SourceFormat::from_path(Path::new("ticks")).is_err());
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell::<f64>(Some(" 1.5 "), 0, "price").unwrap(), Some(1.5));
        assert_eq!(parse_cell::<f64>(Some(""), 0, "price").unwrap(), None);
        assert_eq!(parse_cell::<f64>(None, 0, "price").unwrap(), None);
        assert!(matches!(
            parse_cell::<f64>(Some("abc"), 4, "price"),
            Err(RenkoError::InvalidRecord { row: 4, .. })
        ));
    }

    #[test]
    fn test_size_from_f64() {
        assert_eq!(size_from_f64(3.0, 0).unwrap(), 3);
        assert!(size_from_f64(-1.0, 0).is_err());
        assert!(size_from_f64(0.5, 0).is_err());
    }
}

//! JSON output format.

use renko_aggregate::Ohlcv;
use renko_bricks::{Brick, BrickRecord};
use serde::Serialize;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array.
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
    /// Only applies to the array style.
    pretty: bool,
}

impl JsonFormatter {
    /// Creates an array-style formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates an NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print array output.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    fn write_records<T: Serialize, W: Write>(
        &self,
        records: &[T],
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, records)?;
                } else {
                    serde_json::to_writer(&mut writer, records)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_bricks<W: Write + Send>(
        &self,
        bricks: &[Brick],
        writer: W,
    ) -> Result<(), FormatError> {
        let records: Vec<BrickRecord> = bricks.iter().map(BrickRecord::from).collect();
        self.write_records(&records, writer)
    }

    fn write_ohlcv<W: Write + Send>(&self, bars: &[Ohlcv], writer: W) -> Result<(), FormatError> {
        self.write_records(bars, writer)
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use renko_bricks::Direction;
    use std::io::Cursor;

    fn brick(value: f64) -> Brick {
        Brick {
            timestamp: Utc.with_ymd_and_hms(2025, 6, 23, 13, 31, 0).unwrap(),
            value,
            size: 1.0,
            direction: Direction::Up,
            open: value - 1.0,
            high: value + 0.1,
            low: value - 1.1,
            close: value,
        }
    }

    #[test]
    fn test_json_array_has_record_fields_only() {
        let mut output = Cursor::new(Vec::new());
        JsonFormatter::new()
            .write_bricks(&[brick(10.0)], &mut output)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output.into_inner()).unwrap();
        let record = parsed[0].as_object().unwrap();
        let mut keys: Vec<_> = record.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["close", "high", "low", "open", "timestamp"]);
        assert_eq!(record["close"], 10.0);
    }

    #[test]
    fn test_ndjson() {
        let formatter = JsonFormatter::ndjson();
        let mut output = Cursor::new(Vec::new());
        formatter
            .write_bricks(&[brick(10.0), brick(11.0)], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"close\":11.0"));
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_pretty_bars() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 23, 13, 31, 0).unwrap();
        let bars = vec![Ohlcv::new(ts, 1.0, 2.0, 0.5, 1.5, 10, 3)];
        let mut output = Cursor::new(Vec::new());
        JsonFormatter::new()
            .with_pretty(true)
            .write_ohlcv(&bars, &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains("  \"tick_count\": 3"));
    }
}

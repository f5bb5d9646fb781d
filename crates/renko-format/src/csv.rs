//! CSV output format.

use chrono::{DateTime, Utc};
use renko_aggregate::Ohlcv;
use renko_bricks::Brick;
use std::io::Write;

use crate::{FormatError, Formatter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    delimiter: char,
    include_header: bool,
}

impl CsvFormatter {
    /// Creates a comma-separated formatter with a header row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    fn write_rows<T: CsvRow, W: Write>(&self, rows: &[T], mut writer: W) -> Result<(), FormatError> {
        if self.include_header {
            writeln!(writer, "{}", T::COLUMNS.join(&self.delimiter.to_string()))?;
        }

        let mut line = String::new();
        for row in rows {
            line.clear();
            line.push_str(&row.timestamp().format(TIMESTAMP_FORMAT).to_string());
            for value in row.values() {
                line.push(self.delimiter);
                line.push_str(&value);
            }
            writeln!(writer, "{line}")?;
        }

        Ok(())
    }
}

/// A record written as one delimited line, timestamp first.
trait CsvRow {
    const COLUMNS: &'static [&'static str];

    fn timestamp(&self) -> DateTime<Utc>;

    fn values(&self) -> Vec<String>;
}

impl CsvRow for Brick {
    const COLUMNS: &'static [&'static str] = &["timestamp", "open", "high", "low", "close"];

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn values(&self) -> Vec<String> {
        [self.open, self.high, self.low, self.close]
            .iter()
            .map(f64::to_string)
            .collect()
    }
}

impl CsvRow for Ohlcv {
    const COLUMNS: &'static [&'static str] =
        &["timestamp", "open", "high", "low", "close", "volume", "tick_count"];

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn values(&self) -> Vec<String> {
        let mut values: Vec<_> = [self.open, self.high, self.low, self.close]
            .iter()
            .map(f64::to_string)
            .collect();
        values.push(self.volume.to_string());
        values.push(self.tick_count.to_string());
        values
    }
}

impl Formatter for CsvFormatter {
    fn write_bricks<W: Write + Send>(&self, bricks: &[Brick], writer: W) -> Result<(), FormatError> {
        self.write_rows(bricks, writer)
    }

    fn write_ohlcv<W: Write + Send>(&self, bars: &[Ohlcv], writer: W) -> Result<(), FormatError> {
        self.write_rows(bars, writer)
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use renko_bricks::Direction;
    use std::io::Cursor;

    fn brick() -> Brick {
        Brick {
            timestamp: Utc.with_ymd_and_hms(2025, 6, 23, 13, 31, 0).unwrap(),
            value: 103.0,
            size: 3.0,
            direction: Direction::Up,
            open: 100.0,
            high: 103.5,
            low: 99.5,
            close: 103.0,
        }
    }

    fn bar() -> Ohlcv {
        let ts = Utc.with_ymd_and_hms(2025, 6, 23, 13, 31, 0).unwrap();
        Ohlcv::new(ts, 100.0, 101.25, 99.5, 100.75, 42, 7)
    }

    #[test]
    fn test_csv_bricks() {
        let mut output = Cursor::new(Vec::new());
        CsvFormatter::new()
            .write_bricks(&[brick()], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines[0], "timestamp,open,high,low,close");
        assert_eq!(lines[1], "2025-06-23T13:31:00.000Z,100,103.5,99.5,103");
    }

    #[test]
    fn test_csv_bars() {
        let mut output = Cursor::new(Vec::new());
        CsvFormatter::new().write_ohlcv(&[bar()], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with("timestamp,open,high,low,close,volume,tick_count"));
        assert!(result.contains(",42,7"));
    }

    #[test]
    fn test_csv_no_header() {
        let mut output = Cursor::new(Vec::new());
        CsvFormatter::new()
            .with_header(false)
            .write_bricks(&[brick()], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(result.lines().count(), 1);
        assert!(!result.contains("timestamp"));
    }

    #[test]
    fn test_tsv() {
        let formatter = CsvFormatter::tsv();
        let mut output = Cursor::new(Vec::new());
        formatter.write_bricks(&[brick()], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains("timestamp\topen\thigh"));
        assert_eq!(formatter.extension(), "tsv");
    }
}

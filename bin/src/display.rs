//! Display utilities and output formatting for the renko CLI.

use anyhow::Result;
use clap::ValueEnum;
use renko_lib::prelude::*;
use renko_lib::{CacheInfo, HealthReport, ResponseMetadata};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output format for bricks and bars.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Tsv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Default output path for a source: `<stem>.renko.<ext>` under `dir`.
pub(crate) fn default_output(dir: &Path, source: &str, format: Format) -> PathBuf {
    let stem = Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source);
    dir.join(format!("{stem}.renko.{}", format.extension()))
}

/// Write bricks to a file in the specified format.
pub(crate) fn write_bricks(bricks: &[Brick], output: &Path, format: Format) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output)?);

    match format {
        Format::Csv => CsvFormatter::new().write_bricks(bricks, &mut writer)?,
        Format::Tsv => CsvFormatter::tsv().write_bricks(bricks, &mut writer)?,
        Format::Json => JsonFormatter::new().write_bricks(bricks, &mut writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_bricks(bricks, &mut writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_bricks(bricks, &mut writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                anyhow::bail!("Parquet support not compiled in");
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write OHLC bars to a file in the specified format.
pub(crate) fn write_ohlcv(bars: &[Ohlcv], output: &Path, format: Format) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output)?);

    match format {
        Format::Csv => CsvFormatter::new().write_ohlcv(bars, &mut writer)?,
        Format::Tsv => CsvFormatter::tsv().write_ohlcv(bars, &mut writer)?,
        Format::Json => JsonFormatter::new().write_ohlcv(bars, &mut writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_ohlcv(bars, &mut writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_ohlcv(bars, &mut writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                anyhow::bail!("Parquet support not compiled in");
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Print response metadata as an aligned block.
pub(crate) fn print_metadata(meta: &ResponseMetadata) {
    println!("Rows:        {}", meta.original_row_count);
    println!("Bars:        {}", meta.bar_count);
    println!("Bricks:      {}", meta.brick_count);
    println!("Brick size:  {:.6} ({})", meta.brick_size, meta.sizing_method);
    if let Some(reason) = &meta.fallback_reason {
        println!("Fallback:    {reason}");
    }
    println!(
        "Cache:       {} (age {:.1}s)",
        meta.cache_status, meta.cache_age_seconds
    );
    println!("Elapsed:     {:.3}s", meta.processing_duration);
}

/// Print cache entries as a table.
pub(crate) fn print_cache(entries: &[CacheInfo]) {
    if entries.is_empty() {
        println!("Cache is empty.");
        return;
    }

    println!(
        "{:<20} {:>8} {:>8} {:>8} {:>9}  {}",
        "KEY", "ROWS", "BARS", "BRICKS", "AGE", "CACHED AT"
    );
    println!("{}", "-".repeat(80));
    for entry in entries {
        let age = format!(
            "{:.1}s{}",
            entry.age_seconds,
            if entry.expired { "*" } else { "" }
        );
        println!(
            "{:<20} {:>8} {:>8} {:>8} {:>9}  {}",
            entry.key,
            entry.original_row_count,
            entry.bar_count,
            entry.brick_count,
            age,
            entry.cached_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    if entries.iter().any(|e| e.expired) {
        println!("\n* expired, recomputed on next request");
    }
}

/// Print a health report for the data directory at `root`.
pub(crate) fn print_health(root: &Path, report: &HealthReport) {
    let stats = &report.stats;
    println!("Status:      {}", report.status);
    println!("Data dir:    {}", root.display());
    println!(
        "Folder:      {}",
        if report.source_available { "ok" } else { "missing" }
    );
    println!("Files:       {}", report.available_sources);
    println!("Cached:      {}", report.cached_entries);
    println!("Uptime:      {:.1}s", stats.uptime_seconds);
    println!(
        "Requests:    {} renders, {} refreshes, {} errors",
        stats.renders, stats.refreshes, stats.errors
    );
    println!(
        "Cache:       {} hits, {} misses{}",
        stats.hits,
        stats.misses,
        stats
            .hit_ratio()
            .map_or_else(String::new, |ratio| format!(" ({:.0}% hit)", ratio * 100.0))
    );
    println!("Computed:    {} charts", stats.charts_computed);
    for warning in &report.warnings {
        println!("Warning:     {warning}");
    }
}

/// Format a byte count for display.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        let dir = Path::new("out");
        assert_eq!(
            default_output(dir, "btcusd.csv", Format::Json),
            PathBuf::from("out/btcusd.renko.json")
        );
        assert_eq!(
            default_output(dir, "eth", Format::Csv),
            PathBuf::from("out/eth.renko.csv")
        );
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_write_bricks_csv() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("b.csv");
        write_bricks(&[], &path, Format::Csv).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "timestamp,open,high,low,close\n");
    }
}

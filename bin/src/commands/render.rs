//! Render command implementation.

use crate::display::{Format, default_output, print_metadata, write_bricks, write_ohlcv};
use anyhow::{Context, Result};
use renko_lib::prelude::*;
use std::path::{Path, PathBuf};

/// Render one source and write its bricks (and optionally its bars).
pub(crate) fn render<S: TickSource>(
    engine: &RenkoEngine<S>,
    source: &str,
    output: Option<PathBuf>,
    format: Format,
    bars: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let response = engine
        .render(source)
        .with_context(|| format!("Failed to render {source}"))?;

    let output = output.unwrap_or_else(|| default_output(Path::new("."), source, format));
    write_bricks(&response.chart.bricks, &output, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if let Some(bars_path) = bars {
        write_ohlcv(&response.chart.bars, bars_path, format)
            .with_context(|| format!("Failed to write {}", bars_path.display()))?;
    }

    if !quiet {
        println!("Source:      {}", response.chart.source_path.display());
        print_metadata(&response.metadata);
        println!("\nWrote {} bricks to {}", response.metadata.brick_count, output.display());
        if let Some(bars_path) = bars {
            println!("Wrote {} bars to {}", response.metadata.bar_count, bars_path.display());
        }
    }

    Ok(())
}

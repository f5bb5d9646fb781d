//! Info command implementation.

use anyhow::{Context, Result};
use renko_lib::prelude::*;

/// Show tick statistics and both brick size estimates for a source.
pub(crate) fn show_info<S: TickSource>(engine: &RenkoEngine<S>, source: &str) -> Result<()> {
    let analysis = engine
        .analyze(source)
        .with_context(|| format!("Failed to analyze {source}"))?;
    let config = engine.config();

    println!("Source:      {}", analysis.source_path.display());
    println!("Fields:      {}", analysis.fields.join(", "));
    println!("Rows:        {}", analysis.row_count);
    if let (Some(first), Some(last)) = (analysis.first_timestamp, analysis.last_timestamp) {
        println!("From:        {}", first.format("%Y-%m-%d %H:%M:%S%.3f UTC"));
        println!("To:          {}", last.format("%Y-%m-%d %H:%M:%S%.3f UTC"));
        let span = last - first;
        println!(
            "Span:        {}h {:02}m {:02}s",
            span.num_hours(),
            span.num_minutes() % 60,
            span.num_seconds() % 60
        );
    }
    println!("Bars ({}):   {}", config.bucket_width, analysis.bar_count);

    println!("\nBrick size estimates:");
    match &analysis.atr {
        Ok(size) => println!("  ATR({:<3})       {size:.6}", config.atr_lookback),
        Err(reason) => println!("  ATR({:<3})       n/a ({reason})", config.atr_lookback),
    }
    match &analysis.statistical {
        Ok(size) => println!("  Statistical     {size:.6}"),
        Err(reason) => println!("  Statistical     n/a ({reason})"),
    }
    println!(
        "  Selected        {:.6} ({}, strategy {})",
        analysis.estimate.size, analysis.estimate.method, config.brick_strategy
    );
    if let Some(reason) = &analysis.estimate.fallback_reason {
        println!("  Fallback        {reason}");
    }

    Ok(())
}

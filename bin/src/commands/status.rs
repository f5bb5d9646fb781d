//! Status command implementation.

use crate::display::{print_cache, print_health};
use anyhow::{Context, Result};
use renko_lib::prelude::*;

/// Check the data directory and print the health report with the cache.
pub(crate) fn status(engine: &RenkoEngine<DirectorySource>, json: bool) -> Result<()> {
    let report = engine.health();

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to encode status")?;
        println!("{text}");
        return Ok(());
    }

    print_health(engine.source().root(), &report);
    println!();
    print_cache(&engine.inspect_cache());

    if report.status == HealthStatus::Warning {
        println!("\nAdd tick files (.parquet, .csv, .json, .ndjson) or pass --data-dir.");
    }
    Ok(())
}

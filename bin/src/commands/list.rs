//! List command implementation.

use crate::display::format_bytes;
use anyhow::{Context, Result};
use renko_lib::prelude::*;

/// List tick files in the data directory.
pub(crate) fn list_sources(engine: &RenkoEngine<DirectorySource>) -> Result<()> {
    let root = engine.source().root();
    let names = engine
        .list_sources()
        .with_context(|| format!("Cannot read data directory {}", root.display()))?;

    if names.is_empty() {
        println!("No tick files found in {}.", root.display());
        return Ok(());
    }

    println!("{:<30} {:>10}", "FILE", "SIZE");
    println!("{}", "-".repeat(41));

    let mut total = 0;
    for name in &names {
        let size = std::fs::metadata(root.join(name)).map_or(0, |m| m.len());
        total += size;
        println!("{name:<30} {:>10}", format_bytes(size));
    }

    println!(
        "\nTotal: {} files, {} in {}",
        names.len(),
        format_bytes(total),
        root.display()
    );
    Ok(())
}

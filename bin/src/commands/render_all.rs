//! Render-all command.
//!
//! Renders every tick file in the data directory, a bounded number at a time,
//! with one progress spinner per source.

use crate::display::{Format, default_output, write_bricks};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use renko_lib::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Execute the render-all command.
pub(crate) async fn render_all(
    engine: Arc<RenkoEngine<DirectorySource>>,
    output_dir: PathBuf,
    format: Format,
    parallel: usize,
    quiet: bool,
) -> Result<()> {
    let sources = engine.list_sources().with_context(|| {
        format!(
            "Cannot read data directory {}",
            engine.source().root().display()
        )
    })?;

    if sources.is_empty() {
        anyhow::bail!("No tick files found in {}", engine.source().root().display());
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Cannot create {}", output_dir.display()))?;

    let multi_progress = if quiet {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        MultiProgress::new()
    };

    let results: Vec<(String, Result<usize>)> = stream::iter(sources)
        .map(|name| {
            let pb = multi_progress.add(ProgressBar::new_spinner());
            pb.set_style(spinner_style());
            pb.set_prefix(format!("{name:>24}"));
            pb.set_message("rendering");
            pb.enable_steady_tick(Duration::from_millis(120));

            let engine = Arc::clone(&engine);
            let output = default_output(&output_dir, &name, format);
            async move {
                let result = render_single(engine, name.clone(), output, format).await;
                match &result {
                    Ok(count) => pb.finish_with_message(format!("{count} bricks")),
                    Err(e) => pb.finish_with_message(format!("failed: {e:#}")),
                }
                (name, result)
            }
        })
        .buffer_unordered(parallel.max(1))
        .collect()
        .await;

    let (successes, failures): (Vec<_>, Vec<_>) =
        results.iter().partition(|(_, result)| result.is_ok());

    if !quiet {
        println!("\nRender complete:");
        println!("  Successful: {}", successes.len());
        if !failures.is_empty() {
            println!("  Failed: {}", failures.len());
            for (name, result) in &failures {
                if let Err(e) = result {
                    println!("    {name}: {e:#}");
                }
            }
        }
        println!("  Output: {}", output_dir.display());
    }

    if !failures.is_empty() {
        anyhow::bail!(
            "{} out of {} renders failed",
            failures.len(),
            results.len()
        );
    }

    Ok(())
}

/// Renders one source on the blocking pool and writes its bricks.
async fn render_single(
    engine: Arc<RenkoEngine<DirectorySource>>,
    name: String,
    output: PathBuf,
    format: Format,
) -> Result<usize> {
    tokio::task::spawn_blocking(move || -> Result<usize> {
        let response = engine.render(&name)?;
        write_bricks(&response.chart.bricks, &output, format)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        Ok(response.metadata.brick_count)
    })
    .await
    .context("Render task panicked")?
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

//! Interactive browser over the data directory and the chart cache.

use crate::display::{print_cache, print_health, print_metadata};
use anyhow::{Context, Result};
use inquire::{InquireError, Select};
use renko_lib::prelude::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Render,
    Refresh,
    CacheInfo,
    Status,
    PurgeExpired,
    Quit,
}

impl Action {
    const ALL: [Self; 6] = [
        Self::Render,
        Self::Refresh,
        Self::CacheInfo,
        Self::Status,
        Self::PurgeExpired,
        Self::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Render => "Render a source",
            Self::Refresh => "Refresh a source",
            Self::CacheInfo => "Show cache",
            Self::Status => "Show status",
            Self::PurgeExpired => "Purge expired entries",
            Self::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Run the interactive browser until the user quits.
pub(crate) fn browse(engine: &RenkoEngine<DirectorySource>) -> Result<()> {
    loop {
        let action = match Select::new("What next?", Action::ALL.to_vec()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(e).context("Prompt failed"),
        };

        let outcome = match action {
            Action::Render | Action::Refresh => match pick_source(engine)? {
                Some(source) => render_source(engine, &source, action == Action::Refresh),
                None => continue,
            },
            Action::CacheInfo => {
                print_cache(&engine.inspect_cache());
                Ok(())
            }
            Action::Status => {
                print_health(engine.source().root(), &engine.health());
                Ok(())
            }
            Action::PurgeExpired => {
                let purged = engine.cache().purge_expired();
                println!("Purged {purged} expired entries.");
                Ok(())
            }
            Action::Quit => return Ok(()),
        };

        if let Err(e) = outcome {
            eprintln!("Error: {e:#}");
        }
        println!();
    }
}

fn pick_source(engine: &RenkoEngine<DirectorySource>) -> Result<Option<String>> {
    let sources = engine.list_sources().with_context(|| {
        format!(
            "Cannot read data directory {}",
            engine.source().root().display()
        )
    })?;

    if sources.is_empty() {
        println!("No tick files found in {}.", engine.source().root().display());
        return Ok(None);
    }

    match Select::new("Source:", sources).prompt() {
        Ok(source) => Ok(Some(source)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Prompt failed"),
    }
}

fn render_source(engine: &RenkoEngine<DirectorySource>, source: &str, refresh: bool) -> Result<()> {
    let response = if refresh {
        engine.refresh(source)
    } else {
        engine.render(source)
    }
    .with_context(|| format!("Failed to render {source}"))?;

    println!("Source:      {}", response.chart.source_path.display());
    print_metadata(&response.metadata);

    if let Some(last) = response.chart.bricks.last() {
        println!(
            "Last brick:  {} {} {:.5} -> {:.5}",
            last.timestamp.format("%Y-%m-%d %H:%M:%S"),
            last.direction,
            last.open,
            last.close
        );
    }
    Ok(())
}

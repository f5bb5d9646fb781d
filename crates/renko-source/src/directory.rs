//! Tick files in a directory.

use directories::ProjectDirs;
use renko_types::{RenkoError, Result};
use std::path::{Path, PathBuf};

use crate::{LoadedTicks, SourceFormat, TickSource, read_ticks};

/// Tick files under one root directory.
///
/// An identifier is either a file name with a supported extension
/// (`btcusd.csv`) or a bare stem (`btcusd`), in which case the extensions
/// are tried in [`SourceFormat::all`] order.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a source at [`DirectorySource::default_root`].
    #[must_use]
    pub fn with_default_root() -> Self {
        Self::new(Self::default_root())
    }

    /// Returns the platform default tick directory.
    ///
    /// - Linux: `~/.local/share/renko/tick`
    /// - macOS: `~/Library/Application Support/renko/tick`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\renko\data\tick`
    ///
    /// Falls back to `~/.renko/tick`.
    #[must_use]
    pub fn default_root() -> PathBuf {
        ProjectDirs::from("", "", "renko")
            .map_or_else(home_fallback, |dirs| dirs.data_dir().to_path_buf())
            .join("tick")
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves an identifier to an existing file.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::UnsupportedFormat`] if `id` names an existing
    /// file with an unsupported extension, and [`RenkoError::SourceNotFound`]
    /// if nothing matches.
    pub fn resolve(&self, id: &str) -> Result<PathBuf> {
        let direct = self.root.join(id);

        if SourceFormat::from_path(&direct).is_ok() {
            return if direct.is_file() {
                Ok(direct)
            } else {
                Err(RenkoError::SourceNotFound(id.to_string()))
            };
        }

        if direct.is_file() {
            return Err(RenkoError::UnsupportedFormat(direct.display().to_string()));
        }

        SourceFormat::all()
            .iter()
            .map(|format| self.root.join(format!("{id}.{}", format.extension())))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| RenkoError::SourceNotFound(id.to_string()))
    }
}

impl TickSource for DirectorySource {
    fn load(&self, id: &str) -> Result<LoadedTicks> {
        read_ticks(&self.resolve(id)?)
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(RenkoError::SourceNotFound(self.root.display().to_string()));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file()
                && SourceFormat::from_path(&path).is_ok()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn home_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".renko")
}

//! Filesystem guards checked before anything is written

use anyhow::{Context, Result};
use std::path::Path;

/// Whether anything exists at `path`
pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Whether `dir` has no entries. Errors if it isn't a readable directory.
pub fn is_empty(dir: &Path) -> Result<bool> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    Ok(entries.next().is_none())
}

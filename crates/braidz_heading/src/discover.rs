//! Input argument → list of archives

use crate::source::ArchiveSource;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const ARCHIVE_EXTENSION: &str = "braidz";

/// Expand a file, directory or URL argument into archive sources.
///
/// Directories yield `*.braidz` entries sorted by path; `recursive`
/// descends into subdirectories. Hidden entries are skipped.
pub fn discover_archives(input: &str, recursive: bool) -> Result<Vec<ArchiveSource>> {
    let path = match ArchiveSource::parse(input) {
        ArchiveSource::Local(path) => path,
        remote => return Ok(vec![remote]),
    };

    if path.is_file() && is_archive(&path) {
        return Ok(vec![ArchiveSource::Local(path)]);
    }
    if !path.is_dir() {
        bail!("{} is not a valid braidz file or directory", path.display());
    }

    let mut found = Vec::new();
    collect_archives(&path, recursive, &mut found)?;
    found.sort();
    Ok(found.into_iter().map(ArchiveSource::Local).collect())
}

fn collect_archives(dir: &Path, recursive: bool, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            if recursive {
                collect_archives(&path, recursive, found)?;
            }
        } else if is_archive(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_archive(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ARCHIVE_EXTENSION)
}

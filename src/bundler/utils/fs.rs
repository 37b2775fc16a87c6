//! File system utilities for conversion and extraction.
//!
//! Idempotent wrappers that tolerate already-existing or already-missing
//! paths and attach the offending path to every error.

use crate::bundler::error::{ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes a file, treating a missing file as success.
pub async fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => {
            log::debug!("Removed existing {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing existing file", path),
    }
}

/// Lists `path` and its ancestors that do not exist yet, deepest first.
///
/// Taken before `create_dir_all`, the result is exactly what a failed
/// operation has to undo.
pub fn missing_dirs(path: &Path) -> Vec<PathBuf> {
    path.ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
        .map(Path::to_path_buf)
        .collect()
}

/// Removes `dirs` in order, stopping at the first one that is not empty.
pub fn prune_empty_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        if let Err(e) = std::fs::remove_dir(dir) {
            log::debug!("Leaving {} in place: {}", dir.display(), e);
            break;
        }
    }
}

//! # Workspace Filesystem Helpers
//!
//! The handful of filesystem operations the pipeline is built from. They share
//! one rule: a path that does not exist is never an error when removing or
//! copying optional inputs. Anything else (permissions, a file where a
//! directory was expected) is propagated.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use anyhow::{Context, Result, bail};
use log::{debug, trace};
use walkdir::WalkDir;

/// Removes a file or directory tree. Returns whether anything was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("failed to inspect {}", path.display())),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory {}", path.display()))?;
    } else {
        fs::remove_file(path)
            .with_context(|| format!("failed to remove file {}", path.display()))?;
    }
    debug!("Removed {:?}", path);
    Ok(true)
}

/// Recursively duplicates `src` into `dst`, preserving relative structure.
///
/// `dst` must not already exist. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;

    // Symlinked directories are copied as real directories.
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to traverse {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("{} escaped {}", entry.path().display(), src.display()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("failed to copy {} to {}", entry.path().display(), target.display())
            })?;
            trace!("Copied {:?}", relative);
            copied += 1;
        }
    }

    Ok(copied)
}

/// Copies `src` into `dst` only if `src` is present.
///
/// A `src` that exists but is not a directory is an error, not a skip.
pub fn copy_tree_if_exists(src: &Path, dst: &Path) -> Result<Option<usize>> {
    if !src.exists() {
        debug!("Skipping absent directory {:?}", src);
        return Ok(None);
    }
    if !src.is_dir() {
        bail!("{} exists but is not a directory", src.display());
    }
    copy_tree(src, dst).map(Some)
}

/// Copies a single file only if it is present.
pub fn copy_file_if_exists(src: &Path, dst: &Path) -> Result<bool> {
    if !src.is_file() {
        debug!("Skipping absent file {:?}", src);
        return Ok(false);
    }
    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(true)
}

//! Filesystem helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::trace;
use walkdir::WalkDir;

/// Errors that can occur while copying a directory tree.
#[derive(Debug, Error)]
pub enum CopyError {
  #[error("failed to walk '{path}': {source}")]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to create directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to copy '{from}' to '{to}': {source}")]
  CopyFile {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Recursively copy `from` into `to`, skipping entries whose name is in `exclude`.
///
/// Symlinks are followed and their targets copied as regular content, so the
/// copy never depends on anything outside `to`. Returns the number of files copied.
pub fn copy_dir_excluding(from: &Path, to: &Path, exclude: &[&str]) -> Result<usize, CopyError> {
  let mut copied = 0;

  let walker = WalkDir::new(from).follow_links(true).into_iter().filter_entry(|e| {
    e.depth() == 0
      || e
        .file_name()
        .to_str()
        .map(|name| !exclude.contains(&name))
        .unwrap_or(true)
  });

  for entry in walker {
    let entry = entry.map_err(|e| CopyError::Walk {
      path: from.to_path_buf(),
      source: e,
    })?;
    let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
    let target = to.join(rel);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(|e| CopyError::CreateDir {
        path: target.clone(),
        source: e,
      })?;
    } else if entry.file_type().is_file() {
      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| CopyError::CreateDir {
          path: parent.to_path_buf(),
          source: e,
        })?;
      }
      fs::copy(entry.path(), &target).map_err(|e| CopyError::CopyFile {
        from: entry.path().to_path_buf(),
        to: target.clone(),
        source: e,
      })?;
      trace!(from = %entry.path().display(), to = %target.display(), "copied file");
      copied += 1;
    }
  }

  Ok(copied)
}

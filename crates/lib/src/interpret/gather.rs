//! Collecting the project notes that make up a prompt.
//!
//! Notes files are the root `PARSEME.md` plus any file anywhere in the tree
//! named `PARSEME.md` or ending in `.parseme.md` (materialized words under
//! `.few/words` included). The root notes come first, the rest follow in
//! sorted directory order so the prompt is stable between runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::consts::{PARSEME_FILENAME, PARSEME_SUFFIX, VCS_METADATA_DIR};
use crate::project::Project;

/// Directories that never hold project notes.
const SKIP_DIRS: [&str; 3] = [VCS_METADATA_DIR, "target", "node_modules"];

#[derive(Debug, Error)]
pub enum GatherError {
  #[error("failed to walk '{path}': {source}")]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to read '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A notes file, keyed by its path relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
  /// Relative path with `/` separators.
  pub path: String,
  pub content: String,
}

pub fn is_notes_file(name: &str) -> bool {
  name.eq_ignore_ascii_case(PARSEME_FILENAME) || name.to_ascii_lowercase().ends_with(PARSEME_SUFFIX)
}

/// Gather every notes file in `project`.
pub fn gather(project: &Project) -> Result<Vec<SourceFile>, GatherError> {
  let root = project.root();
  let mut files = Vec::new();

  let root_notes = project.parseme_path();
  if root_notes.is_file() {
    files.push(read_source(root, &root_notes)?);
  } else {
    warn!(path = %root_notes.display(), "no PARSEME.md found, the prompt will lack project notes");
  }

  let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|e| {
    e.depth() == 0
      || !e.file_type().is_dir()
      || e
        .file_name()
        .to_str()
        .map(|name| !SKIP_DIRS.contains(&name))
        .unwrap_or(true)
  });

  for entry in walker {
    let entry = entry.map_err(|e| GatherError::Walk {
      path: root.to_path_buf(),
      source: e,
    })?;
    if !entry.file_type().is_file() || entry.path() == root_notes {
      continue;
    }
    let tagged = entry.file_name().to_str().map(is_notes_file).unwrap_or(false);
    if tagged {
      files.push(read_source(root, entry.path())?);
    }
  }

  debug!(count = files.len(), "gathered notes files");
  Ok(files)
}

fn read_source(root: &Path, path: &Path) -> Result<SourceFile, GatherError> {
  let bytes = fs::read(path).map_err(|e| GatherError::Read {
    path: path.to_path_buf(),
    source: e,
  })?;
  let relative = path.strip_prefix(root).unwrap_or(path);
  Ok(SourceFile {
    path: relative.to_string_lossy().replace('\\', "/"),
    content: String::from_utf8_lossy(&bytes).into_owned(),
  })
}

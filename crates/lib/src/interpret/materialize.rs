//! Writing generated files into the project.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::parse::GeneratedFile;

#[derive(Debug, Error)]
pub enum MaterializeError {
  #[error("refusing to write '{path}': path must be relative and stay inside the project")]
  UnsafePath { path: String },

  #[error("failed to create directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Outcome of writing a batch of generated files. Files already written stay written.
#[derive(Debug, Default)]
pub struct Materialized {
  pub written: Vec<PathBuf>,
  pub failures: Vec<MaterializeError>,
}

pub fn materialize(root: &Path, files: &[GeneratedFile]) -> Materialized {
  let mut outcome = Materialized::default();
  for file in files {
    match write_one(root, file) {
      Ok(path) => outcome.written.push(path),
      Err(e) => {
        warn!(error = %e, "skipping generated file");
        outcome.failures.push(e);
      }
    }
  }
  outcome
}

fn write_one(root: &Path, file: &GeneratedFile) -> Result<PathBuf, MaterializeError> {
  let relative = safe_relative(&file.path).ok_or_else(|| MaterializeError::UnsafePath {
    path: file.path.clone(),
  })?;
  let target = root.join(relative);

  if let Some(parent) = target.parent() {
    fs::create_dir_all(parent).map_err(|e| MaterializeError::CreateDir {
      path: parent.to_path_buf(),
      source: e,
    })?;
  }
  fs::write(&target, file.text()).map_err(|e| MaterializeError::Write {
    path: target.clone(),
    source: e,
  })?;

  debug!(path = %target.display(), "wrote generated file");
  Ok(target)
}

fn safe_relative(path: &str) -> Option<PathBuf> {
  let mut clean = PathBuf::new();
  for component in Path::new(path).components() {
    match component {
      Component::Normal(part) => clean.push(part),
      Component::CurDir => {}
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
    }
  }
  (!clean.as_os_str().is_empty()).then_some(clean)
}

//! Idempotent project scaffolding.
//!
//! Bootstrapping makes sure five independent artifacts exist, creating or
//! appending only what is missing:
//! - `PARSEME.md`, the AI-facing project notes
//! - a marker at the top of `README.md` (only if the README exists)
//! - the `.few/words` directory
//! - `few.litany.yaml`
//! - the `.few/` and `few.litany.yaml` entries in `.gitignore`
//!
//! Running it on an already-bootstrapped project changes nothing.

mod templates;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::{FEW_REPO_URL, GITIGNORE_ENTRIES, NOTES_REPO_ENV, PARSEME_FILENAME};
use crate::litany::{Litany, LitanyError};
use crate::project::Project;
use crate::words::vcs::{Vcs, VcsError};

pub use templates::{PARSEME_TEMPLATE, README_MARKER};

/// Errors that can occur during bootstrapping.
#[derive(Debug, Error)]
pub enum BootstrapError {
  #[error("failed to read {}: {source}", path.display())]
  ReadFile { path: PathBuf, source: io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Litany(#[from] LitanyError),
}

/// Why the reference `PARSEME.md` could not be fetched. Never surfaced as a
/// bootstrap failure; the built-in template is used instead.
#[derive(Debug, Error)]
enum NotesFetchError {
  #[error("failed to create temporary directory: {0}")]
  TempDir(#[source] io::Error),

  #[error(transparent)]
  Vcs(#[from] VcsError),

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },
}

/// Options for bootstrapping a project.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
  /// Repository holding the reference `PARSEME.md`.
  pub notes_repo: String,
}

impl Default for BootstrapOptions {
  fn default() -> Self {
    Self {
      notes_repo: FEW_REPO_URL.to_string(),
    }
  }
}

impl BootstrapOptions {
  /// Defaults, with the notes repository overridden by `FEW_NOTES_REPO`.
  pub fn from_env() -> Self {
    match std::env::var(NOTES_REPO_ENV) {
      Ok(repo) if !repo.trim().is_empty() => Self {
        notes_repo: repo.trim().to_string(),
      },
      _ => Self::default(),
    }
  }
}

/// What bootstrapping did to one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
  Created,
  Updated,
  Present,
  /// Not applicable (e.g. no README to mark).
  Skipped,
}

impl ArtifactStatus {
  pub fn is_change(self) -> bool {
    matches!(self, ArtifactStatus::Created | ArtifactStatus::Updated)
  }
}

/// Where a newly created `PARSEME.md` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesSource {
  Reference,
  BuiltIn,
}

/// Result of bootstrapping.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
  pub parseme: ArtifactStatus,
  /// Set only when `PARSEME.md` was created by this run.
  pub notes_source: Option<NotesSource>,
  pub readme: ArtifactStatus,
  pub words_dir: ArtifactStatus,
  pub litany: ArtifactStatus,
  pub gitignore: ArtifactStatus,
  /// Entries appended to `.gitignore` by this run.
  pub gitignore_added: Vec<String>,
}

impl BootstrapReport {
  /// Whether any artifact was created or modified.
  pub fn changed(&self) -> bool {
    [self.parseme, self.readme, self.words_dir, self.litany, self.gitignore]
      .iter()
      .any(|s| s.is_change())
  }
}

/// Bootstrap `project`, creating whatever scaffolding is missing.
///
/// # Errors
///
/// Returns an error if a missing artifact cannot be written. Failing to fetch
/// the reference `PARSEME.md` is not an error; the built-in template is used.
pub fn bootstrap(project: &Project, vcs: &dyn Vcs, options: &BootstrapOptions) -> Result<BootstrapReport, BootstrapError> {
  info!(root = %project.root().display(), "Initializing FEW in the project");

  let (parseme, notes_source) = ensure_parseme(project, vcs, options)?;
  let readme = ensure_readme_marker(&project.readme_path())?;
  let words_dir = ensure_words_dir(&project.words_dir())?;
  let litany = ensure_litany(&project.litany_path())?;
  let (gitignore, gitignore_added) = ensure_gitignore(&project.gitignore_path())?;

  let report = BootstrapReport {
    parseme,
    notes_source,
    readme,
    words_dir,
    litany,
    gitignore,
    gitignore_added,
  };
  debug!(changed = report.changed(), "bootstrap finished");
  Ok(report)
}

fn ensure_parseme(
  project: &Project,
  vcs: &dyn Vcs,
  options: &BootstrapOptions,
) -> Result<(ArtifactStatus, Option<NotesSource>), BootstrapError> {
  let path = project.parseme_path();
  if path.exists() {
    debug!("{} already exists", PARSEME_FILENAME);
    return Ok((ArtifactStatus::Present, None));
  }

  let (content, source) = match fetch_reference_notes(vcs, &options.notes_repo) {
    Ok(content) => (content, NotesSource::Reference),
    Err(e) => {
      warn!(repo = %options.notes_repo, error = %e, "could not fetch reference PARSEME.md, using built-in default");
      (PARSEME_TEMPLATE.to_string(), NotesSource::BuiltIn)
    }
  };

  info!("Creating {}", PARSEME_FILENAME);
  fs::write(&path, content).map_err(|e| BootstrapError::WriteFile { path, source: e })?;
  Ok((ArtifactStatus::Created, Some(source)))
}

/// Shallow-clone `repo` into a throwaway directory and read its `PARSEME.md`.
///
/// The temporary checkout is removed when this returns, success or not.
fn fetch_reference_notes(vcs: &dyn Vcs, repo: &str) -> Result<String, NotesFetchError> {
  let temp = tempfile::Builder::new()
    .prefix("few-notes-")
    .tempdir()
    .map_err(NotesFetchError::TempDir)?;
  let checkout = temp.path().join("few");

  vcs.shallow_clone(repo, &checkout)?;

  let path = checkout.join(PARSEME_FILENAME);
  fs::read_to_string(&path).map_err(|source| NotesFetchError::Read { path, source })
}

fn ensure_readme_marker(path: &Path) -> Result<ArtifactStatus, BootstrapError> {
  if !path.exists() {
    debug!("README.md not found, skipping marker");
    return Ok(ArtifactStatus::Skipped);
  }

  let content = fs::read_to_string(path).map_err(|e| BootstrapError::ReadFile {
    path: path.to_path_buf(),
    source: e,
  })?;

  if content.trim_start().starts_with(README_MARKER.trim()) {
    debug!("README marker already present");
    return Ok(ArtifactStatus::Present);
  }

  info!("Adding LLM marker to README.md");
  let marked = format!("{}\n\n{}", README_MARKER, content);
  fs::write(path, marked).map_err(|e| BootstrapError::WriteFile {
    path: path.to_path_buf(),
    source: e,
  })?;
  Ok(ArtifactStatus::Updated)
}

fn ensure_words_dir(path: &Path) -> Result<ArtifactStatus, BootstrapError> {
  if path.is_dir() {
    return Ok(ArtifactStatus::Present);
  }
  fs::create_dir_all(path).map_err(|e| BootstrapError::CreateDir {
    path: path.to_path_buf(),
    source: e,
  })?;
  info!("Ensured '{}' exists", path.display());
  Ok(ArtifactStatus::Created)
}

fn ensure_litany(path: &Path) -> Result<ArtifactStatus, BootstrapError> {
  if path.exists() {
    return Ok(ArtifactStatus::Present);
  }
  info!("Creating {}", path.display());
  Litany::empty(path).save()?;
  Ok(ArtifactStatus::Created)
}

fn ensure_gitignore(path: &Path) -> Result<(ArtifactStatus, Vec<String>), BootstrapError> {
  let existing = match fs::read_to_string(path) {
    Ok(content) => Some(content),
    Err(e) if e.kind() == io::ErrorKind::NotFound => None,
    Err(e) => {
      return Err(BootstrapError::ReadFile {
        path: path.to_path_buf(),
        source: e,
      });
    }
  };

  let content = existing.as_deref().unwrap_or_default();
  let missing: Vec<String> = GITIGNORE_ENTRIES
    .iter()
    .filter(|entry| !content.lines().any(|line| line.trim() == **entry))
    .map(|entry| entry.to_string())
    .collect();

  if missing.is_empty() {
    return Ok((ArtifactStatus::Present, missing));
  }

  let mut appended = String::new();
  if !content.is_empty() && !content.ends_with('\n') {
    appended.push('\n');
  }
  for entry in &missing {
    info!("Adding '{}' to .gitignore", entry);
    appended.push_str(entry);
    appended.push('\n');
  }

  let mut file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .map_err(|e| BootstrapError::WriteFile {
      path: path.to_path_buf(),
      source: e,
    })?;
  file
    .write_all(appended.as_bytes())
    .map_err(|e| BootstrapError::WriteFile {
      path: path.to_path_buf(),
      source: e,
    })?;

  let status = if existing.is_some() {
    ArtifactStatus::Updated
  } else {
    ArtifactStatus::Created
  };
  Ok((status, missing))
}

//! The `listen` and `litany` flows.
//!
//! `listen` bootstraps the project and, given a package reference, resolves
//! and syncs it. `litany` re-runs `listen` for every word already recorded,
//! strictly in litany order, one full sync at a time. The first failing sync
//! aborts the whole run since no ordering between words is tracked.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::init::{BootstrapError, BootstrapOptions, BootstrapReport, bootstrap};
use crate::litany::Litany;
use crate::project::Project;
use crate::words::cache::WordCache;
use crate::words::sync::{SyncError, SyncOptions, SyncReport, sync};
use crate::words::vcs::Vcs;
use crate::words::{ResolveError, resolve};

#[derive(Debug, Error)]
pub enum ListenError {
  #[error("failed to initialize project: {0}")]
  Bootstrap(#[from] BootstrapError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error("failed to sync word '{name}': {source}")]
  Sync {
    name: String,
    #[source]
    source: SyncError,
  },

  #[error("{} not found. Run 'few listen' first.", .path.display())]
  LitanyMissing { path: std::path::PathBuf },
}

/// Options for a single `listen`.
#[derive(Debug, Clone, Default)]
pub struct ListenOptions {
  /// Set when invoked from `litany`: the word is already recorded.
  pub from_litany: bool,
  pub bootstrap: BootstrapOptions,
}

/// Result of a single `listen`.
#[derive(Debug, Clone, Serialize)]
pub struct ListenReport {
  pub bootstrap: BootstrapReport,
  /// Present when a package was given.
  pub synced: Option<SyncReport>,
}

/// Result of a `litany` run.
#[derive(Debug, Clone, Serialize)]
pub struct LitanyReport {
  pub words: Vec<String>,
  pub synced: Vec<SyncReport>,
}

/// Bootstrap `project` and, if `package` is given, resolve and sync it.
pub fn listen(
  project: &Project,
  cache: &WordCache,
  vcs: &dyn Vcs,
  package: Option<&str>,
  options: &ListenOptions,
) -> Result<ListenReport, ListenError> {
  let bootstrap = bootstrap(project, vcs, &options.bootstrap)?;

  let Some(reference) = package else {
    return Ok(ListenReport { bootstrap, synced: None });
  };

  let package = resolve(reference)?;
  let sync_options = SyncOptions {
    skip_litany: options.from_litany,
  };

  let report = sync(project, cache, vcs, &package, &sync_options).map_err(|e| ListenError::Sync {
    name: package.name.clone(),
    source: e,
  })?;

  Ok(ListenReport {
    bootstrap,
    synced: Some(report),
  })
}

/// Sync every word recorded in the project's litany, in order.
///
/// # Errors
///
/// Returns [`ListenError::LitanyMissing`] if the project has no litany file,
/// and the first sync failure otherwise. Words after a failure are not synced.
pub fn recite_litany(
  project: &Project,
  cache: &WordCache,
  vcs: &dyn Vcs,
  bootstrap: &BootstrapOptions,
) -> Result<LitanyReport, ListenError> {
  let path = project.litany_path();
  if !path.exists() {
    return Err(ListenError::LitanyMissing { path });
  }

  let words = Litany::load(&path).words().to_vec();
  if words.is_empty() {
    info!("No words found in {}", path.display());
    return Ok(LitanyReport {
      words,
      synced: Vec::new(),
    });
  }

  info!("Found words: {}", words.join(", "));

  let options = ListenOptions {
    from_litany: true,
    bootstrap: bootstrap.clone(),
  };

  let mut synced = Vec::with_capacity(words.len());
  for word in &words {
    info!("Processing '{}' from litany", word);
    let report = listen(project, cache, vcs, Some(word), &options)?;
    synced.extend(report.synced);
  }

  Ok(LitanyReport { words, synced })
}

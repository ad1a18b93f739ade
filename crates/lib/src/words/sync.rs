//! Cache refresh followed by materialization into a project.
//!
//! `sync` is the only way a word reaches a project:
//! 1. record the name in the litany (unless asked not to)
//! 2. clone or refresh the cache entry
//! 3. remove the project's previous copy
//! 4. copy the cache entry in, leaving `.git` behind
//!
//! Removal and copy come last. If the copy fails after the removal, the
//! project is left without the word rather than with a partial merge.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::ResolvedPackage;
use super::cache::{CacheAction, CacheError, WordCache};
use super::vcs::Vcs;
use crate::consts::VCS_METADATA_DIR;
use crate::litany::{Litany, LitanyError};
use crate::project::Project;
use crate::util::fs::{CopyError, copy_dir_excluding};
use crate::util::hash::{ContentHash, DirHashError, hash_directory};

#[derive(Debug, Error)]
pub enum SyncError {
  #[error(transparent)]
  Litany(#[from] LitanyError),

  #[error(transparent)]
  Cache(#[from] CacheError),

  #[error("failed to remove stale word '{path}': {source}")]
  RemoveStale {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to copy word '{name}' into the project: {source}")]
  Materialize {
    name: String,
    #[source]
    source: CopyError,
  },

  #[error("failed to hash materialized word '{name}': {source}")]
  Hash {
    name: String,
    #[source]
    source: DirHashError,
  },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
  /// Leave the litany alone (the word is already recorded, e.g. during `few litany`).
  pub skip_litany: bool,
}

/// What a successful sync did.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
  pub name: String,
  pub action: CacheAction,
  pub cache_path: PathBuf,
  pub project_path: PathBuf,
  pub files_copied: usize,
  /// Digest of the materialized copy; equal to the cache entry's digest minus `.git`.
  pub digest: ContentHash,
}

/// Bring `package` up to date in the cache and replace the project's copy of it.
///
/// # Errors
///
/// Any failure is fatal for this package: litany write, cache clone/refresh,
/// removal of the stale copy, or the copy itself.
pub fn sync(
  project: &Project,
  cache: &WordCache,
  vcs: &dyn Vcs,
  package: &ResolvedPackage,
  options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
  info!(name = %package.name, url = %package.url, "Processing word");

  if !options.skip_litany {
    Litany::load(&project.litany_path()).add(&package.name)?;
  }

  let (cache_path, action) = cache.fetch_or_refresh(vcs, package)?;

  let project_path = project.word_path(&package.name);
  if project_path.exists() {
    debug!(path = %project_path.display(), "removing existing project copy");
    fs::remove_dir_all(&project_path).map_err(|e| SyncError::RemoveStale {
      path: project_path.clone(),
      source: e,
    })?;
  }

  info!("Copying '{}' to project's .few/words folder", package.name);
  let files_copied = copy_dir_excluding(&cache_path, &project_path, &[VCS_METADATA_DIR]).map_err(|e| {
    SyncError::Materialize {
      name: package.name.clone(),
      source: e,
    }
  })?;

  let digest = hash_directory(&project_path, &[]).map_err(|e| SyncError::Hash {
    name: package.name.clone(),
    source: e,
  })?;

  info!(name = %package.name, files = files_copied, digest = %digest.short(), "word synced");

  Ok(SyncReport {
    name: package.name.clone(),
    action,
    cache_path,
    project_path,
    files_copied,
    digest,
  })
}

//! The global word cache.
//!
//! Every word referenced by any project on the machine is cloned once into
//! `<few_home>/words/<name>/`, with its `.git` directory intact so later
//! references refresh it in place instead of cloning again. The cache owns
//! these checkouts and never deletes them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::ResolvedPackage;
use super::vcs::{Vcs, VcsError};
use crate::platform::paths::words_cache_dir;

#[derive(Debug, Error)]
pub enum CacheError {
  #[error("failed to create cache directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to clone '{url}' into the cache: {source}")]
  Clone {
    url: String,
    #[source]
    source: VcsError,
  },

  #[error("failed to refresh cached word '{name}' at '{path}': {source}")]
  Refresh {
    name: String,
    path: PathBuf,
    #[source]
    source: VcsError,
  },
}

/// What the cache did to bring an entry up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheAction {
  Cloned,
  Refreshed,
}

#[derive(Debug, Clone)]
pub struct WordCache {
  root: PathBuf,
}

impl Default for WordCache {
  fn default() -> Self {
    Self::new(words_cache_dir())
  }
}

impl WordCache {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn entry_path(&self, name: &str) -> PathBuf {
    self.root.join(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entry_path(name).is_dir()
  }

  /// Make sure the cache has an up-to-date checkout of `package`.
  ///
  /// An existing entry is pulled in place; otherwise the remote is cloned.
  /// Either failure is returned as-is and nothing is retried.
  pub fn fetch_or_refresh(&self, vcs: &dyn Vcs, package: &ResolvedPackage) -> Result<(PathBuf, CacheAction), CacheError> {
    if !self.root.exists() {
      fs::create_dir_all(&self.root).map_err(|e| CacheError::CreateDir {
        path: self.root.clone(),
        source: e,
      })?;
    }

    let entry = self.entry_path(&package.name);

    if entry.exists() {
      info!(name = %package.name, path = %entry.display(), "word found in cache, updating");
      vcs.pull(&entry).map_err(|e| CacheError::Refresh {
        name: package.name.clone(),
        path: entry.clone(),
        source: e,
      })?;
      Ok((entry, CacheAction::Refreshed))
    } else {
      info!(name = %package.name, url = %package.url, "word not cached, cloning");
      vcs.clone_repo(&package.url, &entry).map_err(|e| CacheError::Clone {
        url: package.url.clone(),
        source: e,
      })?;
      debug!(path = %entry.display(), "cloned into cache");
      Ok((entry, CacheAction::Cloned))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::FakeVcs;
  use tempfile::TempDir;

  fn package(name: &str) -> ResolvedPackage {
    ResolvedPackage {
      name: name.to_string(),
      url: format!("fake://{}", name),
    }
  }

  #[test]
  fn first_reference_clones() {
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new(temp.path().join("remotes"));
    vcs.publish("alpha", &[("README.md", "alpha v1")]);
    let cache = WordCache::new(temp.path().join("cache/words"));

    let (path, action) = cache.fetch_or_refresh(&vcs, &package("alpha")).unwrap();

    assert_eq!(action, CacheAction::Cloned);
    assert!(cache.contains("alpha"));
    assert_eq!(fs::read_to_string(path.join("README.md")).unwrap(), "alpha v1");
  }

  #[test]
  fn later_reference_refreshes_in_place() {
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new(temp.path().join("remotes"));
    vcs.publish("alpha", &[("README.md", "alpha v1")]);
    let cache = WordCache::new(temp.path().join("cache"));

    cache.fetch_or_refresh(&vcs, &package("alpha")).unwrap();
    vcs.publish("alpha", &[("README.md", "alpha v2")]);
    let (path, action) = cache.fetch_or_refresh(&vcs, &package("alpha")).unwrap();

    assert_eq!(action, CacheAction::Refreshed);
    assert_eq!(fs::read_to_string(path.join("README.md")).unwrap(), "alpha v2");
    assert_eq!(vcs.calls(), vec!["clone fake://alpha", "pull alpha"]);
  }

  #[test]
  fn clone_failure_is_reported() {
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new(temp.path().join("remotes"));
    let cache = WordCache::new(temp.path().join("cache"));

    let err = cache.fetch_or_refresh(&vcs, &package("missing")).unwrap_err();

    assert!(matches!(err, CacheError::Clone { .. }));
    assert!(!cache.contains("missing"));
  }

  #[test]
  fn refresh_failure_is_reported() {
    let temp = TempDir::new().unwrap();
    let vcs = FakeVcs::new(temp.path().join("remotes"));
    vcs.publish("alpha", &[("README.md", "v1")]);
    let cache = WordCache::new(temp.path().join("cache"));
    cache.fetch_or_refresh(&vcs, &package("alpha")).unwrap();

    vcs.fail_pulls();
    let err = cache.fetch_or_refresh(&vcs, &package("alpha")).unwrap_err();

    assert!(matches!(err, CacheError::Refresh { ref name, .. } if name == "alpha"));
  }
}

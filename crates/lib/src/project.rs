//! Project-relative locations.
//!
//! A [`Project`] is the directory `few` operates in. Every project artifact
//! (litany, notes, ignore rules, materialized words, audit log) is addressed
//! through it so commands and tests never build these paths by hand.

use std::io;
use std::path::{Path, PathBuf};

use crate::consts::{
  GITIGNORE_FILENAME, LITANY_FILENAME, LOG_FILENAME, PARSEME_FILENAME, PROJECT_DIR_NAME, README_FILENAME,
  WORDS_DIR_NAME,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
  root: PathBuf,
}

impl Project {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// The project rooted at the current working directory.
  pub fn current() -> io::Result<Self> {
    let cwd = std::env::current_dir()?;
    Ok(Self::new(dunce::canonicalize(&cwd).unwrap_or(cwd)))
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn litany_path(&self) -> PathBuf {
    self.root.join(LITANY_FILENAME)
  }

  pub fn few_dir(&self) -> PathBuf {
    self.root.join(PROJECT_DIR_NAME)
  }

  pub fn words_dir(&self) -> PathBuf {
    self.few_dir().join(WORDS_DIR_NAME)
  }

  /// Where the materialized copy of `name` lives.
  pub fn word_path(&self, name: &str) -> PathBuf {
    self.words_dir().join(name)
  }

  pub fn parseme_path(&self) -> PathBuf {
    self.root.join(PARSEME_FILENAME)
  }

  pub fn readme_path(&self) -> PathBuf {
    self.root.join(README_FILENAME)
  }

  pub fn gitignore_path(&self) -> PathBuf {
    self.root.join(GITIGNORE_FILENAME)
  }

  pub fn log_path(&self) -> PathBuf {
    self.few_dir().join(LOG_FILENAME)
  }
}

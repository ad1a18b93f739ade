//! Test utilities for few-lib.
//!
//! [`FakeVcs`] stands in for `git`: "remotes" are plain directories under a
//! temp dir, a clone copies one and adds a `.git` directory, a pull re-copies
//! the remote's current files over the checkout.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use crate::words::vcs::{Vcs, VcsError};

pub struct FakeVcs {
  remotes: PathBuf,
  calls: RefCell<Vec<String>>,
  fail_pulls: Cell<bool>,
}

impl FakeVcs {
  pub fn new(remotes: PathBuf) -> Self {
    fs::create_dir_all(&remotes).unwrap();
    Self {
      remotes,
      calls: RefCell::new(Vec::new()),
      fail_pulls: Cell::new(false),
    }
  }

  /// Replace the contents of remote `name` with `files`.
  pub fn publish(&self, name: &str, files: &[(&str, &str)]) {
    let dir = self.remotes.join(name);
    if dir.exists() {
      fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    for (path, content) in files {
      let target = dir.join(path);
      fs::create_dir_all(target.parent().unwrap()).unwrap();
      fs::write(target, content).unwrap();
    }
  }

  pub fn fail_pulls(&self) {
    self.fail_pulls.set(true);
  }

  /// Every operation performed so far, in order.
  pub fn calls(&self) -> Vec<String> {
    self.calls.borrow().clone()
  }

  fn remote_for_url(&self, url: &str) -> PathBuf {
    let last = url.rsplit('/').next().unwrap_or(url);
    self.remotes.join(last.trim_end_matches(".git"))
  }

  fn checkout(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
    let remote = self.remote_for_url(url);
    if !remote.is_dir() {
      return Err(VcsError::CommandFailed {
        command: format!("git clone {}", url),
        code: Some(128),
        stderr: format!("fatal: repository '{}' not found", url),
      });
    }
    copy_tree(&remote, dest);
    fs::create_dir_all(dest.join(".git")).unwrap();
    fs::write(dest.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
    Ok(())
  }
}

impl Vcs for FakeVcs {
  fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
    self.calls.borrow_mut().push(format!("clone {}", url));
    self.checkout(url, dest)
  }

  fn pull(&self, repo: &Path) -> Result<(), VcsError> {
    let name = repo.file_name().unwrap().to_string_lossy().to_string();
    self.calls.borrow_mut().push(format!("pull {}", name));
    if self.fail_pulls.get() {
      return Err(VcsError::CommandFailed {
        command: "git pull".to_string(),
        code: Some(1),
        stderr: "CONFLICT (content): Merge conflict".to_string(),
      });
    }
    for entry in fs::read_dir(repo).unwrap() {
      let path = entry.unwrap().path();
      if path.file_name().is_some_and(|n| n == ".git") {
        continue;
      }
      if path.is_dir() {
        fs::remove_dir_all(&path).unwrap();
      } else {
        fs::remove_file(&path).unwrap();
      }
    }
    copy_tree(&self.remotes.join(&name), repo);
    Ok(())
  }

  fn shallow_clone(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
    self.calls.borrow_mut().push(format!("shallow {}", url));
    self.checkout(url, dest)
  }
}

fn copy_tree(from: &Path, to: &Path) {
  fs::create_dir_all(to).unwrap();
  for entry in walkdir::WalkDir::new(from).min_depth(1) {
    let entry = entry.unwrap();
    let target = to.join(entry.path().strip_prefix(from).unwrap());
    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).unwrap();
    } else {
      fs::copy(entry.path(), &target).unwrap();
    }
  }
}

/// Write `files` under `root`, creating parent directories.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
  for (path, content) in files {
    let target = root.join(path);
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(target, content).unwrap();
  }
}

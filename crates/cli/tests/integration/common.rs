//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub fn git_available() -> bool {
  StdCommand::new("git")
    .arg("--version")
    .output()
    .map(|o| o.status.success())
    .unwrap_or(false)
}

/// Skip the calling test when git is missing.
#[macro_export]
macro_rules! require_git {
  () => {
    if !$crate::common::git_available() {
      eprintln!("git not available, skipping");
      return;
    }
  };
}

fn git(dir: &Path, args: &[&str]) {
  let status = StdCommand::new("git")
    .args(["-c", "user.name=few-tests", "-c", "user.email=tests@few.invalid"])
    .args(["-c", "init.defaultBranch=main", "-c", "commit.gpgsign=false"])
    .args(args)
    .current_dir(dir)
    .output()
    .unwrap();
  assert!(
    status.status.success(),
    "git {:?} failed: {}",
    args,
    String::from_utf8_lossy(&status.stderr)
  );
}

/// Isolated test environment.
///
/// Each test gets its own project directory, global FEW home and a directory
/// of local git remotes.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    for dir in ["project", "home", "remotes"] {
      std::fs::create_dir_all(temp.path().join(dir)).unwrap();
    }
    Self { temp }
  }

  pub fn project(&self) -> PathBuf {
    self.temp.path().join("project")
  }

  pub fn home(&self) -> PathBuf {
    self.temp.path().join("home")
  }

  pub fn cache_entry(&self, name: &str) -> PathBuf {
    self.home().join("words").join(name)
  }

  pub fn project_word(&self, name: &str) -> PathBuf {
    self.project().join(".few/words").join(name)
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.project().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.project().join(relative_path)).unwrap()
  }

  /// Create (or add a commit to) a local remote and return its `file://` URL.
  pub fn publish(&self, name: &str, files: &[(&str, &str)]) -> String {
    let dir = self.temp.path().join("remotes").join(name);
    if !dir.join(".git").exists() {
      std::fs::create_dir_all(&dir).unwrap();
      git(&dir, &["init", "-q"]);
    }
    for (path, content) in files {
      let target = dir.join(path);
      std::fs::create_dir_all(target.parent().unwrap()).unwrap();
      std::fs::write(target, content).unwrap();
    }
    git(&dir, &["add", "-A"]);
    git(&dir, &["commit", "-q", "-m", "publish"]);
    format!("file://{}", dir.display())
  }

  /// Get a pre-configured Command for the few binary.
  ///
  /// Runs in the project directory with `FEW_HOME` isolated and the reference
  /// notes repository pointed at a path that does not exist, so bootstrap
  /// falls back to the built-in template without touching the network.
  pub fn few_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("few");
    cmd.current_dir(self.project());
    cmd.env("FEW_HOME", self.home());
    cmd.env("FEW_NOTES_REPO", self.temp.path().join("no-such-repo"));
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    cmd.env_remove("FEW_API_KEY");
    cmd
  }
}

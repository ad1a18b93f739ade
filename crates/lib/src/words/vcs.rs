//! Version-control client.
//!
//! The synchronizer only needs three capabilities from version control: a
//! full clone into the cache, an in-place refresh of an existing clone, and a
//! throwaway shallow clone. [`GitCli`] provides them by driving the `git`
//! executable; tests substitute an in-process implementation.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum VcsError {
  /// The version-control executable is not installed or not on `PATH`.
  #[error("'{tool}' command not found. Please ensure Git is installed and in your PATH")]
  ToolMissing { tool: String },

  #[error("failed to run '{command}': {source}")]
  Spawn {
    command: String,
    #[source]
    source: io::Error,
  },

  #[error("'{command}' failed ({}): {stderr}", exit_status(.code))]
  CommandFailed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },
}

fn exit_status(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "terminated by signal".to_string(),
  }
}

/// The version-control operations the word cache depends on.
pub trait Vcs {
  /// Clone `url` into `dest`, which must not exist yet.
  fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError>;

  /// Pull the latest changes into the existing checkout at `repo`.
  fn pull(&self, repo: &Path) -> Result<(), VcsError>;

  /// Clone only the latest revision of `url` into `dest`.
  fn shallow_clone(&self, url: &str, dest: &Path) -> Result<(), VcsError>;
}

/// [`Vcs`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
  program: PathBuf,
}

impl GitCli {
  /// Locate `git` on `PATH`.
  ///
  /// # Errors
  ///
  /// Returns [`VcsError::ToolMissing`] if no `git` executable can be found.
  pub fn detect() -> Result<Self, VcsError> {
    let program = which::which("git").map_err(|_| VcsError::ToolMissing {
      tool: "git".to_string(),
    })?;
    debug!(path = %program.display(), "found git");
    Ok(Self { program })
  }

  fn run<I, S>(&self, args: I, cwd: Option<&Path>) -> Result<String, VcsError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
    let command_line = std::iter::once("git".to_string())
      .chain(args.iter().map(|a| a.to_string_lossy().into_owned()))
      .collect::<Vec<_>>()
      .join(" ");

    info!("Running: {}", command_line);

    let mut command = Command::new(&self.program);
    command.args(&args);
    if let Some(dir) = cwd {
      command.current_dir(dir);
    }

    let output = command.output().map_err(|e| VcsError::Spawn {
      command: command_line.clone(),
      source: e,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
      return Err(VcsError::CommandFailed {
        command: command_line,
        code: output.status.code(),
        stderr,
      });
    }

    if !stdout.is_empty() {
      debug!(stdout = %stdout, "git output");
    }
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "git stderr");
    }

    Ok(stdout)
  }
}

impl Vcs for GitCli {
  fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
    self.run([OsStr::new("clone"), OsStr::new(url), dest.as_os_str()], None)?;
    Ok(())
  }

  fn pull(&self, repo: &Path) -> Result<(), VcsError> {
    self.run(["pull"], Some(repo))?;
    Ok(())
  }

  fn shallow_clone(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
    self.run(
      [
        OsStr::new("clone"),
        OsStr::new("--depth"),
        OsStr::new("1"),
        OsStr::new(url),
        dest.as_os_str(),
      ],
      None,
    )?;
    Ok(())
  }
}

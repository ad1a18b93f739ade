//! Implementation of the `few listen` command.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use few_lib::init::BootstrapOptions;
use few_lib::listen::{ListenOptions, listen};
use few_lib::project::Project;
use few_lib::words::cache::WordCache;
use few_lib::words::vcs::GitCli;

use crate::output::{format_duration, print_bootstrap, print_info, print_success, print_synced};

/// Execute the listen command.
///
/// Bootstraps the project in the current directory and, when a package is
/// given, resolves it, records it in the litany (unless `from_litany`) and
/// syncs it through the global cache.
///
/// # Errors
///
/// Fails before touching anything if `git` is not installed, and on any
/// resolve, fetch or copy failure.
pub fn cmd_listen(package: Option<&str>, from_litany: bool) -> Result<()> {
  let vcs = GitCli::detect()?;
  let project = Project::current().context("Failed to determine project directory")?;
  let cache = WordCache::default();
  debug!(project = %project.root().display(), cache = %cache.root().display(), "listen");

  let options = ListenOptions {
    from_litany,
    bootstrap: BootstrapOptions::from_env(),
  };

  let start = Instant::now();
  let report = listen(&project, &cache, &vcs, package, &options)?;

  print_bootstrap(&report.bootstrap);
  match &report.synced {
    Some(synced) => {
      print_synced(synced, project.root());
      print_info(&format!("Done in {}", format_duration(start.elapsed())));
    }
    None if report.bootstrap.changed() => print_success("FEW initialization complete."),
    None => print_info("FEW already initialized."),
  }

  Ok(())
}

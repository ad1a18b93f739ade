//! Implementation of the `few litany` command.

use std::time::Instant;

use anyhow::{Context, Result};

use few_lib::consts::LITANY_FILENAME;
use few_lib::init::BootstrapOptions;
use few_lib::listen::recite_litany;
use few_lib::project::Project;
use few_lib::words::cache::WordCache;
use few_lib::words::vcs::GitCli;

use crate::output::{format_duration, print_info, print_success, print_synced};

/// Execute the litany command: sync every recorded word, in order.
pub fn cmd_litany() -> Result<()> {
  let vcs = GitCli::detect()?;
  let project = Project::current().context("Failed to determine project directory")?;
  let cache = WordCache::default();

  let start = Instant::now();
  let report = recite_litany(&project, &cache, &vcs, &BootstrapOptions::from_env())?;

  if report.words.is_empty() {
    print_info(&format!("No words found in {}.", LITANY_FILENAME));
    return Ok(());
  }

  for synced in &report.synced {
    print_synced(synced, project.root());
  }
  print_success(&format!(
    "Litany complete: {} word(s) in {}",
    report.synced.len(),
    format_duration(start.elapsed())
  ));

  Ok(())
}

//! Status command implementation.
//!
//! Shows the global home, the word cache and, for every word in the litany,
//! whether it is cached and materialized in the project.

use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use few_lib::litany::Litany;
use few_lib::platform::paths::few_home;
use few_lib::project::Project;
use few_lib::words::cache::WordCache;

use crate::output::{OutputFormat, print_info, print_json, print_stat, symbols};

#[derive(Debug, Serialize)]
struct WordStatus {
  name: String,
  cached: bool,
  materialized: bool,
}

#[derive(Debug, Serialize)]
struct Status {
  project: PathBuf,
  few_home: PathBuf,
  cache_root: PathBuf,
  litany: PathBuf,
  litany_exists: bool,
  words: Vec<WordStatus>,
}

fn collect(project: &Project, cache: &WordCache) -> Status {
  let litany_path = project.litany_path();
  let litany = Litany::load(&litany_path);
  let words = litany
    .words()
    .iter()
    .map(|name| WordStatus {
      name: name.clone(),
      cached: cache.contains(name),
      materialized: project.word_path(name).is_dir(),
    })
    .collect();

  Status {
    project: project.root().to_path_buf(),
    few_home: few_home(),
    cache_root: cache.root().to_path_buf(),
    litany_exists: litany_path.exists(),
    litany: litany_path,
    words,
  }
}

pub fn cmd_status(format: OutputFormat) -> Result<()> {
  let project = Project::current().context("Failed to determine project directory")?;
  let status = collect(&project, &WordCache::default());

  if format.is_json() {
    return print_json(&status);
  }

  print_info(&format!("Project: {}", status.project.display()));
  print_stat("Home", &status.few_home.display().to_string());
  print_stat("Cache", &status.cache_root.display().to_string());

  if !status.litany_exists {
    print_stat("Litany", "missing (run 'few listen')");
    return Ok(());
  }
  print_stat("Litany", &status.litany.display().to_string());
  println!();

  if status.words.is_empty() {
    println!("No words.");
    return Ok(());
  }

  println!("Words:");
  for word in &status.words {
    let symbol = if word.cached && word.materialized {
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
    } else {
      symbols::MISSING.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string()
    };
    let state = match (word.cached, word.materialized) {
      (true, true) => "cached, materialized",
      (true, false) => "cached, not materialized",
      (false, true) => "materialized, not cached",
      (false, false) => "not synced",
    };
    println!(
      "  {} {} {}",
      symbol,
      word.name,
      format!("({state})").if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }

  Ok(())
}

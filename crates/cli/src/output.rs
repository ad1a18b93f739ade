//! CLI output formatting utilities.
//!
//! Colored status lines, duration formatting and report rendering shared by
//! the commands.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use few_lib::init::{ArtifactStatus, BootstrapReport, NotesSource};
use few_lib::words::cache::CacheAction;
use few_lib::words::sync::SyncReport;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ADD: &str = "+";
  pub const MODIFY: &str = "~";
  pub const MISSING: &str = "-";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

/// `path` relative to `root` when it lies inside it.
pub fn display_relative(path: &Path, root: &Path) -> String {
  path.strip_prefix(root).unwrap_or(path).display().to_string()
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

fn print_change(status: ArtifactStatus, subject: &str, detail: Option<&str>) {
  let symbol = match status {
    ArtifactStatus::Created => symbols::ADD.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    ArtifactStatus::Updated => symbols::MODIFY.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string(),
    ArtifactStatus::Present | ArtifactStatus::Skipped => return,
  };
  match detail {
    Some(detail) => println!(
      "  {} {} {}",
      symbol,
      subject,
      format!("({detail})").if_supports_color(Stream::Stdout, |s| s.dimmed())
    ),
    None => println!("  {} {}", symbol, subject),
  }
}

/// List the artifacts a bootstrap created or modified.
pub fn print_bootstrap(report: &BootstrapReport) {
  let notes_detail = report.notes_source.map(|source| match source {
    NotesSource::Reference => "from reference notes",
    NotesSource::BuiltIn => "from built-in template",
  });
  let added = report.gitignore_added.join(", ");

  print_change(report.parseme, "PARSEME.md", notes_detail);
  print_change(report.readme, "README.md", Some("AI-first marker added"));
  print_change(report.words_dir, ".few/words", None);
  print_change(report.litany, "few.litany.yaml", None);
  print_change(report.gitignore, ".gitignore", Some(format!("added {added}").as_str()));
}

pub fn print_synced(report: &SyncReport, project_root: &Path) {
  let action = match report.action {
    CacheAction::Cloned => "cloned",
    CacheAction::Refreshed => "updated",
  };
  print_success(&format!(
    "Word '{}' {} and copied to {} ({} files, {})",
    report.name,
    action,
    display_relative(&report.project_path, project_root),
    report.files_copied,
    report.digest.short()
  ));
}

//! Implementation of the `few prompt` command.

use std::io::{self, Write};

use anyhow::{Context, Result};

use few_lib::interpret::render_prompt;
use few_lib::project::Project;

/// Print the interpretation prompt to stdout without contacting the service.
pub fn cmd_prompt() -> Result<()> {
  let project = Project::current().context("Failed to determine project directory")?;
  let prompt = render_prompt(&project).context("Failed to gather project notes")?;

  let mut stdout = io::stdout().lock();
  stdout.write_all(prompt.as_bytes())?;
  if !prompt.ends_with('\n') {
    writeln!(stdout)?;
  }
  stdout.flush()?;

  Ok(())
}

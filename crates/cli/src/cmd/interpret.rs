//! Implementation of the `few interpret` command.

use std::time::Instant;

use anyhow::{Context, Result, bail};

use few_lib::interpret::{
  GeneratorConfig, HttpGenerator, InterpretError, InterpretOptions, InterpretOutcome, KeyStore, interpret,
};
use few_lib::project::Project;

use crate::output::{display_relative, format_duration, print_stat, print_success, print_warning};
use crate::prompts::prompt_api_key;

/// Execute the interpret command.
///
/// Sends the project notes to the generation service and writes the files it
/// describes. Every exchange is appended to `.few/few.log`.
pub fn cmd_interpret() -> Result<()> {
  let project = Project::current().context("Failed to determine project directory")?;
  let config = GeneratorConfig::from_env();
  let mut credentials = KeyStore::from_env(prompt_api_key);

  let start = Instant::now();
  let outcome = interpret(
    &project,
    &mut credentials,
    |credential| HttpGenerator::new(config.clone(), &credential.key),
    &InterpretOptions::default(),
  );

  let report = match outcome {
    Ok(InterpretOutcome::Written(report)) => report,
    Ok(InterpretOutcome::Declined { error, .. }) => {
      bail!(
        "Interpretation declined: {}",
        error.as_deref().unwrap_or("no reason given")
      );
    }
    Err(e @ InterpretError::RateLimited { .. }) => {
      return Err(e).context("Out of generation quota, try again later");
    }
    Err(e @ InterpretError::EnvironmentKeyRejected { .. }) => {
      return Err(e).context("Fix or unset FEW_API_KEY");
    }
    Err(e) => return Err(e).context("Interpretation failed"),
  };

  for path in &report.written {
    print_stat("wrote", &display_relative(path, project.root()));
  }
  for failure in &report.failures {
    print_warning(&failure.to_string());
  }

  print_success(&format!(
    "Wrote {} file(s) in {} ({} attempt(s))",
    report.written.len(),
    format_duration(start.elapsed()),
    report.attempts
  ));

  if !report.failures.is_empty() {
    bail!("{} generated file(s) could not be written", report.failures.len());
  }

  Ok(())
}

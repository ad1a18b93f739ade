//! The interpretation pipeline.
//!
//! One run gathers the project notes, builds a prompt, asks the generation
//! service for a JSON description of the project's files and writes them.
//! Two retry scopes are kept apart:
//! - [`generate_parsed`] repairs malformed replies, bounded by
//!   [`InterpretOptions::max_attempts`] generation calls;
//! - [`interpret`] restarts the whole run with a fresh key when the service
//!   rejects the current one, optionally capped by
//!   [`InterpretOptions::auth_retry_limit`].

pub mod credentials;
pub mod gather;
pub mod generate;
pub mod log;
pub mod materialize;
pub mod parse;
pub mod prompt;

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::consts::MAX_GENERATION_ATTEMPTS;
use crate::project::Project;

pub use credentials::{Credential, CredentialError, CredentialSource, KeyOrigin, KeyStore};
pub use gather::{GatherError, SourceFile, gather};
pub use generate::{GenerateError, Generator, GeneratorConfig, HttpGenerator};
pub use log::{AuditLog, LogKind};
pub use materialize::MaterializeError;
pub use parse::{GeneratedFile, InterpretationResult, ParseError, parse_response};

#[derive(Debug, Error)]
pub enum InterpretError {
  #[error(transparent)]
  Gather(#[from] GatherError),

  #[error(transparent)]
  Credential(#[from] CredentialError),

  #[error("generation quota exhausted: {message}")]
  RateLimited { message: String },

  #[error("generation service rejected the API key: {message}")]
  Unauthorized { message: String },

  #[error("generation service rejected the API key from FEW_API_KEY: {message}")]
  EnvironmentKeyRejected { message: String },

  #[error("generation failed: {message}")]
  Generation { message: String },

  #[error("generation output still malformed after {attempts} attempts: {source}")]
  MalformedOutput {
    attempts: u32,
    #[source]
    source: ParseError,
  },
}

impl From<GenerateError> for InterpretError {
  fn from(e: GenerateError) -> Self {
    match e {
      GenerateError::RateLimited(message) => InterpretError::RateLimited { message },
      GenerateError::Unauthorized(message) => InterpretError::Unauthorized { message },
      GenerateError::Other(message) => InterpretError::Generation { message },
    }
  }
}

#[derive(Debug, Clone)]
pub struct InterpretOptions {
  /// Generation calls allowed per run, the first included.
  pub max_attempts: u32,
  /// Key rejections tolerated before giving up. `None` keeps asking.
  pub auth_retry_limit: Option<u32>,
}

impl Default for InterpretOptions {
  fn default() -> Self {
    Self {
      max_attempts: MAX_GENERATION_ATTEMPTS,
      auth_retry_limit: None,
    }
  }
}

#[derive(Debug)]
pub struct InterpretReport {
  /// Generation calls used by the successful run.
  pub attempts: u32,
  pub written: Vec<PathBuf>,
  pub failures: Vec<MaterializeError>,
}

#[derive(Debug)]
pub enum InterpretOutcome {
  Written(InterpretReport),
  /// The service answered `success: false`. Nothing was written.
  Declined { error: Option<String>, attempts: u32 },
}

/// Gather and build the prompt without contacting the service.
pub fn render_prompt(project: &Project) -> Result<String, GatherError> {
  let files = gather(project)?;
  Ok(prompt::build_prompt(&files))
}

/// Run the pipeline until it writes files, is declined, or fails.
///
/// `connect` builds a generator for each acquired key.
pub fn interpret<C, F, G>(
  project: &Project,
  credentials: &mut C,
  mut connect: F,
  options: &InterpretOptions,
) -> Result<InterpretOutcome, InterpretError>
where
  C: CredentialSource,
  F: FnMut(&Credential) -> Result<G, GenerateError>,
  G: Generator,
{
  let log = AuditLog::new(project.log_path());
  let mut rejections = 0u32;

  loop {
    let credential = credentials.acquire()?;
    let generator = connect(&credential)?;

    match run_once(project, &generator, &log, options) {
      Err(InterpretError::Unauthorized { message }) => {
        if credential.origin == KeyOrigin::Environment {
          return Err(InterpretError::EnvironmentKeyRejected { message });
        }
        rejections += 1;
        credentials.invalidate(&credential)?;
        if let Some(limit) = options.auth_retry_limit
          && rejections >= limit
        {
          return Err(InterpretError::Unauthorized { message });
        }
        warn!(rejections, "API key rejected, asking for a new one");
      }
      other => return other,
    }
  }
}

fn run_once<G: Generator>(
  project: &Project,
  generator: &G,
  log: &AuditLog,
  options: &InterpretOptions,
) -> Result<InterpretOutcome, InterpretError> {
  let files = gather(project)?;
  info!(files = files.len(), "gathered project notes");
  let prompt = prompt::build_prompt(&files);

  let (result, attempts) = generate_parsed(generator, log, &prompt, options.max_attempts)?;

  if !result.success {
    return Ok(InterpretOutcome::Declined {
      error: result.error,
      attempts,
    });
  }

  let outcome = materialize::materialize(project.root(), &result.files);
  info!(
    written = outcome.written.len(),
    failed = outcome.failures.len(),
    "materialized generated files"
  );
  Ok(InterpretOutcome::Written(InterpretReport {
    attempts,
    written: outcome.written,
    failures: outcome.failures,
  }))
}

/// Send `prompt` and parse the reply, asking for corrections until a reply
/// parses or `max_attempts` generation calls have been made.
pub fn generate_parsed<G: Generator>(
  generator: &G,
  log: &AuditLog,
  prompt: &str,
  max_attempts: u32,
) -> Result<(InterpretationResult, u32), InterpretError> {
  let max_attempts = max_attempts.max(1);
  let mut request = prompt.to_string();
  let mut kinds = (LogKind::Prompt, LogKind::Response);
  let mut attempt = 0;

  loop {
    attempt += 1;
    log.record(kinds.0, &request);
    let reply = generator.generate(&request)?;
    log.record(kinds.1, &reply);

    match parse_response(&reply) {
      Ok(result) => return Ok((result, attempt)),
      Err(e) if attempt >= max_attempts => {
        return Err(InterpretError::MalformedOutput {
          attempts: attempt,
          source: e,
        });
      }
      Err(e) => {
        warn!(attempt, error = %e, "malformed reply, asking for a correction");
        request = prompt::build_repair_prompt(&e.to_string(), &reply);
        kinds = (LogKind::FixPrompt, LogKind::FixResponse);
      }
    }
  }
}

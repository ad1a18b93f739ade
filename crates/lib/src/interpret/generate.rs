//! The generation service seam.
//!
//! [`Generator`] turns a prompt into reply text. [`HttpGenerator`] talks to an
//! Anthropic-compatible messages endpoint; tests substitute scripted fakes.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::consts::{API_URL_ENV, DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, MODEL_ENV};

const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Why a generation call failed. The interpretation loop handles each kind differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
  #[error("generation quota or rate limit exceeded: {0}")]
  RateLimited(String),

  #[error("generation service rejected the API key: {0}")]
  Unauthorized(String),

  #[error("generation request failed: {0}")]
  Other(String),
}

pub trait Generator {
  fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

impl<G: Generator + ?Sized> Generator for &G {
  fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
    (**self).generate(prompt)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
  pub api_url: String,
  pub model: String,
  pub max_tokens: u32,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      api_url: DEFAULT_API_URL.to_string(),
      model: DEFAULT_MODEL.to_string(),
      max_tokens: DEFAULT_MAX_TOKENS,
    }
  }
}

impl GeneratorConfig {
  /// Defaults, overridden by `FEW_API_URL` and `FEW_MODEL` when set and non-empty.
  pub fn from_env() -> Self {
    let mut config = Self::default();
    if let Ok(url) = env::var(API_URL_ENV)
      && !url.trim().is_empty()
    {
      config.api_url = url.trim().to_string();
    }
    if let Ok(model) = env::var(MODEL_ENV)
      && !model.trim().is_empty()
    {
      config.model = model.trim().to_string();
    }
    config
  }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
  model: &'a str,
  max_tokens: u32,
  messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
  #[serde(default)]
  content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
  #[serde(rename = "type")]
  kind: String,
  #[serde(default)]
  text: Option<String>,
}

pub struct HttpGenerator {
  client: reqwest::blocking::Client,
  config: GeneratorConfig,
  api_key: String,
}

impl HttpGenerator {
  pub fn new(config: GeneratorConfig, api_key: &str) -> Result<Self, GenerateError> {
    let client = reqwest::blocking::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(|e| GenerateError::Other(format!("failed to build HTTP client: {e}")))?;
    Ok(Self {
      client,
      config,
      api_key: api_key.to_string(),
    })
  }
}

impl Generator for HttpGenerator {
  fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
    let request = MessagesRequest {
      model: &self.config.model,
      max_tokens: self.config.max_tokens,
      messages: [Message {
        role: "user",
        content: prompt,
      }],
    };

    debug!(url = %self.config.api_url, model = %self.config.model, bytes = prompt.len(), "sending generation request");

    let response = self
      .client
      .post(&self.config.api_url)
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", API_VERSION)
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .map_err(|e| GenerateError::Other(format!("request to {} failed: {e}", self.config.api_url)))?;

    let status = response.status();
    let body = response
      .text()
      .map_err(|e| GenerateError::Other(format!("failed to read response body: {e}")))?;

    if !status.is_success() {
      return Err(classify_failure(status.as_u16(), &body));
    }

    let parsed: MessagesResponse =
      serde_json::from_str(&body).map_err(|e| GenerateError::Other(format!("unexpected response shape: {e}")))?;

    let text: String = parsed
      .content
      .into_iter()
      .filter(|block| block.kind == "text")
      .filter_map(|block| block.text)
      .collect();

    debug!(bytes = text.len(), "received generation reply");
    Ok(text)
  }
}

/// Map a failed HTTP exchange to the error kind the interpretation loop acts on.
///
/// Quota exhaustion is reported by some services as a 400 with a billing message,
/// so the error body is consulted before the status code.
pub fn classify_failure(status: u16, body: &str) -> GenerateError {
  let (kind, message) = error_details(body);
  let message = message.unwrap_or_else(|| format!("HTTP {status}: {}", body.trim()));
  let lowered = message.to_ascii_lowercase();

  match kind.as_deref() {
    Some("rate_limit_error") => return GenerateError::RateLimited(message),
    Some("authentication_error" | "permission_error") => return GenerateError::Unauthorized(message),
    _ => {}
  }

  match status {
    429 => GenerateError::RateLimited(message),
    401 | 403 => GenerateError::Unauthorized(message),
    _ if lowered.contains("quota") || lowered.contains("credit balance") => GenerateError::RateLimited(message),
    _ => GenerateError::Other(message),
  }
}

fn error_details(body: &str) -> (Option<String>, Option<String>) {
  let Ok(value) = serde_json::from_str::<Value>(body) else {
    return (None, None);
  };
  let error = &value["error"];
  (
    error["type"].as_str().map(str::to_string),
    error["message"].as_str().map(str::to_string),
  )
}

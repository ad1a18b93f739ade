//! API key acquisition.
//!
//! Keys come from `FEW_API_KEY`, then the cached key file under the global
//! home, then an interactive prompt whose answer is cached for next time.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::API_KEY_ENV;
use crate::platform::paths::credentials_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
  Environment,
  Cached,
  Prompted,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
  pub key: String,
  pub origin: KeyOrigin,
}

impl std::fmt::Debug for Credential {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credential")
      .field("key", &"<redacted>")
      .field("origin", &self.origin)
      .finish()
  }
}

#[derive(Debug, Error)]
pub enum CredentialError {
  #[error("failed to read API key: {source}")]
  Prompt {
    #[source]
    source: io::Error,
  },

  #[error("no API key entered")]
  Empty,

  #[error("failed to store API key at '{path}': {source}")]
  Store {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to remove API key at '{path}': {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Where the interpretation pipeline gets its key, and how it forgets a rejected one.
pub trait CredentialSource {
  fn acquire(&mut self) -> Result<Credential, CredentialError>;

  /// Discard a key the service rejected. Environment keys cannot be discarded.
  fn invalidate(&mut self, credential: &Credential) -> Result<(), CredentialError>;
}

/// Key file backed [`CredentialSource`] with an interactive fallback.
pub struct KeyStore<P> {
  path: PathBuf,
  env_key: Option<String>,
  prompt: P,
}

impl<P> KeyStore<P>
where
  P: FnMut() -> io::Result<String>,
{
  pub fn new(path: impl Into<PathBuf>, env_key: Option<String>, prompt: P) -> Self {
    Self {
      path: path.into(),
      env_key: env_key.filter(|k| !k.trim().is_empty()),
      prompt,
    }
  }

  /// Key store at `<FEW_HOME>/credentials`, honoring `FEW_API_KEY`.
  pub fn from_env(prompt: P) -> Self {
    Self::new(credentials_path(), env::var(API_KEY_ENV).ok(), prompt)
  }

  fn read_cached(&self) -> Option<String> {
    let key = fs::read_to_string(&self.path).ok()?;
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
  }

  fn store(&self, key: &str) -> Result<(), CredentialError> {
    let store_err = |e| CredentialError::Store {
      path: self.path.clone(),
      source: e,
    };
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).map_err(store_err)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
      use std::os::unix::fs::OpenOptionsExt;
      options.mode(0o600);
    }
    let mut file = options.open(&self.path).map_err(store_err)?;
    writeln!(file, "{key}").map_err(store_err)?;

    info!(path = %self.path.display(), "cached API key");
    Ok(())
  }
}

impl<P> CredentialSource for KeyStore<P>
where
  P: FnMut() -> io::Result<String>,
{
  fn acquire(&mut self) -> Result<Credential, CredentialError> {
    if let Some(key) = &self.env_key {
      debug!("using API key from {}", API_KEY_ENV);
      return Ok(Credential {
        key: key.trim().to_string(),
        origin: KeyOrigin::Environment,
      });
    }

    if let Some(key) = self.read_cached() {
      debug!(path = %self.path.display(), "using cached API key");
      return Ok(Credential {
        key,
        origin: KeyOrigin::Cached,
      });
    }

    let key = (self.prompt)().map_err(|e| CredentialError::Prompt { source: e })?;
    let key = key.trim();
    if key.is_empty() {
      return Err(CredentialError::Empty);
    }
    self.store(key)?;
    Ok(Credential {
      key: key.to_string(),
      origin: KeyOrigin::Prompted,
    })
  }

  fn invalidate(&mut self, credential: &Credential) -> Result<(), CredentialError> {
    if credential.origin == KeyOrigin::Environment {
      return Ok(());
    }
    match fs::remove_file(&self.path) {
      Ok(()) => {
        info!(path = %self.path.display(), "removed rejected API key");
        Ok(())
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(CredentialError::Remove {
        path: self.path.clone(),
        source: e,
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;
  use tempfile::TempDir;

  fn no_prompt() -> io::Result<String> {
    panic!("prompt should not be called")
  }

  #[test]
  fn environment_key_wins() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("credentials");
    fs::write(&path, "cached-key\n").unwrap();

    let mut store = KeyStore::new(&path, Some("env-key".to_string()), no_prompt);
    let credential = store.acquire().unwrap();

    assert_eq!(credential.key, "env-key");
    assert_eq!(credential.origin, KeyOrigin::Environment);
  }

  #[test]
  fn blank_environment_key_is_ignored() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("credentials");
    fs::write(&path, "cached-key\n").unwrap();

    let mut store = KeyStore::new(&path, Some("  ".to_string()), no_prompt);
    let credential = store.acquire().unwrap();

    assert_eq!(credential.key, "cached-key");
    assert_eq!(credential.origin, KeyOrigin::Cached);
  }

  #[test]
  fn prompted_key_is_cached() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("home/credentials");
    let asked = Cell::new(0);

    let mut store = KeyStore::new(&path, None, || {
      asked.set(asked.get() + 1);
      Ok(" typed-key \n".to_string())
    });
    let first = store.acquire().unwrap();
    let second = store.acquire().unwrap();

    assert_eq!(first.origin, KeyOrigin::Prompted);
    assert_eq!(first.key, "typed-key");
    assert_eq!(second.origin, KeyOrigin::Cached);
    assert_eq!(second.key, "typed-key");
    assert_eq!(asked.get(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "typed-key\n");
  }

  #[cfg(unix)]
  #[test]
  fn cached_key_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("credentials");
    let mut store = KeyStore::new(&path, None, || Ok("k".to_string()));
    store.acquire().unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
  }

  #[test]
  fn empty_prompt_answer_is_an_error() {
    let temp = TempDir::new().unwrap();
    let mut store = KeyStore::new(temp.path().join("credentials"), None, || Ok("\n".to_string()));

    assert!(matches!(store.acquire(), Err(CredentialError::Empty)));
  }

  #[test]
  fn invalidate_removes_cached_key() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("credentials");
    fs::write(&path, "stale\n").unwrap();

    let mut store = KeyStore::new(&path, None, || Ok("fresh".to_string()));
    let stale = store.acquire().unwrap();
    store.invalidate(&stale).unwrap();
    let fresh = store.acquire().unwrap();

    assert_eq!(fresh.key, "fresh");
    assert_eq!(fresh.origin, KeyOrigin::Prompted);
  }

  #[test]
  fn invalidate_missing_file_is_ok() {
    let temp = TempDir::new().unwrap();
    let mut store = KeyStore::new(temp.path().join("credentials"), None, no_prompt);
    let credential = Credential {
      key: "k".to_string(),
      origin: KeyOrigin::Cached,
    };

    assert!(store.invalidate(&credential).is_ok());
  }

  #[test]
  fn debug_output_hides_key() {
    let credential = Credential {
      key: "sk-secret".to_string(),
      origin: KeyOrigin::Cached,
    };
    assert!(!format!("{credential:?}").contains("sk-secret"));
  }
}

use crate::consts::{APP_NAME, HOME_ENV, WORDS_DIR_NAME};
use std::path::PathBuf;

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  let userprofile = std::env::var("USERPROFILE").expect("USERPROFILE not set");
  PathBuf::from(userprofile)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  let home = std::env::var("HOME").expect("HOME not set");
  PathBuf::from(home)
}

/// Returns the global FEW home, shared by every project on the machine.
///
/// `FEW_HOME` takes precedence over `~/.few`.
pub fn few_home() -> PathBuf {
  std::env::var(HOME_ENV)
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(format!(".{}", APP_NAME)))
}

/// Returns the global word cache (`<few_home>/words`)
pub fn words_cache_dir() -> PathBuf {
  few_home().join(WORDS_DIR_NAME)
}

/// Returns the file holding the cached generation-service key
pub fn credentials_path() -> PathBuf {
  few_home().join("credentials")
}

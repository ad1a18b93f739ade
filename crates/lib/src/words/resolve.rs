//! Package reference resolution.
//!
//! A reference is one of:
//! - a URL (`https://host/owner/name.git`, `file:///srv/name`): the name is the
//!   last path segment with its extension stripped
//! - an `owner/name` pair: hosted on the default host under that owner
//! - a bare `name`: hosted on the default host under the default owner
//!
//! Resolution is pure string processing; nothing touches the network.

use serde::Serialize;
use thiserror::Error;

use crate::consts::{DEFAULT_HOST, DEFAULT_OWNER};

/// A reference resolved to where it lives and what it is called locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
  /// Canonical name, the key for the cache, the project copy and the litany.
  pub name: String,
  /// Remote address handed to the version-control client.
  pub url: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
  #[error("invalid package reference '{reference}': {reason}")]
  InvalidReference { reference: String, reason: &'static str },
}

/// Resolve a package reference.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidReference`] if the reference is empty or does
/// not yield a usable canonical name.
pub fn resolve(reference: &str) -> Result<ResolvedPackage, ResolveError> {
  let reference = reference.trim();
  let invalid = |reason| ResolveError::InvalidReference {
    reference: reference.to_string(),
    reason,
  };

  if reference.is_empty() {
    return Err(invalid("reference is empty"));
  }

  let (name, url) = if let Some((_, rest)) = reference.split_once("://") {
    // Drop authority, query and fragment; keep the path.
    let path = rest.split(['?', '#']).next().unwrap_or_default();
    let path = path.split_once('/').map(|(_, p)| p).unwrap_or_default();
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    (strip_extension(segment).to_string(), reference.to_string())
  } else {
    // A trailing '/' leaves an empty name segment, which is rejected below.
    let path = reference.trim_start_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let qualified = if path.contains('/') {
      path.to_string()
    } else {
      format!("{}/{}", DEFAULT_OWNER, path)
    };
    let name = qualified.rsplit('/').next().unwrap_or_default().to_string();
    (name, format!("https://{}/{}.git", DEFAULT_HOST, qualified))
  };

  if name.is_empty() {
    return Err(invalid("no package name in reference"));
  }
  if name == "." || name == ".." || name.contains('\\') {
    return Err(invalid("package name is not a valid directory name"));
  }

  Ok(ResolvedPackage { name, url })
}

/// Strip the final extension, leaving dotfiles (`.name`) intact.
fn strip_extension(segment: &str) -> &str {
  match segment.rfind('.') {
    Some(idx) if idx > 0 => &segment[..idx],
    _ => segment,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bare_name_uses_default_owner() {
    let pkg = resolve("cadence").unwrap();
    assert_eq!(pkg.name, "cadence");
    assert_eq!(pkg.url, "https://github.com/peterbaileyct/cadence.git");
  }

  #[test]
  fn owner_pair_uses_given_owner() {
    let pkg = resolve("someone/cadence").unwrap();
    assert_eq!(pkg.name, "cadence");
    assert_eq!(pkg.url, "https://github.com/someone/cadence.git");
  }

  #[test]
  fn url_keeps_address_and_strips_extension() {
    let pkg = resolve("https://gitlab.com/group/cadence.git").unwrap();
    assert_eq!(pkg.name, "cadence");
    assert_eq!(pkg.url, "https://gitlab.com/group/cadence.git");
  }

  #[test]
  fn url_without_extension() {
    let pkg = resolve("file:///srv/git/cadence").unwrap();
    assert_eq!(pkg.name, "cadence");
    assert_eq!(pkg.url, "file:///srv/git/cadence");
  }

  #[test]
  fn url_trailing_slash_and_query_are_ignored() {
    assert_eq!(resolve("https://host/o/cadence/").unwrap().name, "cadence");
    assert_eq!(resolve("https://host/o/cadence.git?ref=main").unwrap().name, "cadence");
  }

  #[test]
  fn all_forms_agree_on_name() {
    let from_url = resolve("https://github.com/peterbaileyct/cadence.git").unwrap();
    let from_pair = resolve("peterbaileyct/cadence").unwrap();
    let from_bare = resolve("cadence").unwrap();

    assert_eq!(from_url.name, from_pair.name);
    assert_eq!(from_pair.name, from_bare.name);
    assert_eq!(from_pair, from_bare);
    assert_eq!(from_url.url, from_bare.url);
  }

  #[test]
  fn resolution_is_deterministic() {
    for reference in ["cadence", "o/cadence", "https://h/o/cadence.git", "file:///x/y.z.git"] {
      assert_eq!(resolve(reference), resolve(reference));
    }
  }

  #[test]
  fn pair_with_git_suffix_is_not_doubled() {
    let pkg = resolve("someone/cadence.git").unwrap();
    assert_eq!(pkg.name, "cadence");
    assert_eq!(pkg.url, "https://github.com/someone/cadence.git");
  }

  #[test]
  fn dotted_names_keep_inner_dots() {
    assert_eq!(resolve("https://h/o/my.lib.git").unwrap().name, "my.lib");
    assert_eq!(resolve("my.lib").unwrap().name, "my.lib");
  }

  #[test]
  fn empty_reference_is_invalid() {
    assert!(matches!(resolve(""), Err(ResolveError::InvalidReference { .. })));
    assert!(matches!(resolve("   "), Err(ResolveError::InvalidReference { .. })));
    assert!(matches!(resolve("/"), Err(ResolveError::InvalidReference { .. })));
  }

  #[test]
  fn pair_without_name_is_invalid() {
    let err = resolve("someone/").unwrap_err();
    assert!(err.to_string().contains("no package name"));
    assert!(resolve("someone//").is_err());
  }

  #[test]
  fn url_without_path_is_invalid() {
    let err = resolve("https://github.com").unwrap_err();
    assert!(err.to_string().contains("no package name"));
    assert!(resolve("https://github.com/").is_err());
  }

  #[test]
  fn dot_names_are_invalid() {
    assert!(resolve("https://host/o/..").is_err());
    assert!(resolve("someone/.").is_err());
  }
}

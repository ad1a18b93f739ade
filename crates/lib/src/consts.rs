//! Fixed names, locations and limits shared across the crate.

pub const APP_NAME: &str = "few";

/// Project-relative manifest file listing the project's words.
pub const LITANY_FILENAME: &str = "few.litany.yaml";

/// Project-private directory; `.few/words` holds materialized words.
pub const PROJECT_DIR_NAME: &str = ".few";
pub const WORDS_DIR_NAME: &str = "words";

/// AI-facing project notes file at the project root.
pub const PARSEME_FILENAME: &str = "PARSEME.md";
/// Suffix marking additional project-notes files anywhere in the tree.
pub const PARSEME_SUFFIX: &str = ".parseme.md";

pub const README_FILENAME: &str = "README.md";
pub const GITIGNORE_FILENAME: &str = ".gitignore";

/// Append-only audit log of generation traffic, inside the project dir.
pub const LOG_FILENAME: &str = "few.log";

pub const GITIGNORE_ENTRIES: [&str; 2] = [".few/", LITANY_FILENAME];

pub const DEFAULT_HOST: &str = "github.com";
pub const DEFAULT_OWNER: &str = "peterbaileyct";

/// The tool's own repository, used as the reference source for `PARSEME.md`.
pub const FEW_REPO_URL: &str = "https://github.com/peterbaileyct/few.git";

/// Version-control metadata that never reaches a project word.
pub const VCS_METADATA_DIR: &str = ".git";

/// Generation attempts per interpretation (the first request plus repairs).
pub const MAX_GENERATION_ATTEMPTS: u32 = 3;

pub const API_KEY_ENV: &str = "FEW_API_KEY";
pub const API_URL_ENV: &str = "FEW_API_URL";
pub const MODEL_ENV: &str = "FEW_MODEL";
pub const HOME_ENV: &str = "FEW_HOME";
pub const NOTES_REPO_ENV: &str = "FEW_NOTES_REPO";

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 16_000;

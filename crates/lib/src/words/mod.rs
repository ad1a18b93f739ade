//! Words: externally version-controlled packages a project depends on.
//!
//! # Modules
//!
//! - [`resolve`] - turning a package reference into a canonical name and remote
//! - [`vcs`] - the version-control client used to clone and refresh
//! - [`cache`] - the global, project-independent word cache
//! - [`sync`] - cache refresh followed by materialization into the project
//!
//! # Layout
//!
//! ```text
//! ~/.few/words/<name>/          # full checkout, owned by the cache
//! <project>/.few/words/<name>/  # snapshot copy without .git, owned by the project
//! ```

pub mod cache;
pub mod resolve;
pub mod sync;
pub mod vcs;

pub use resolve::{ResolveError, ResolvedPackage, resolve};

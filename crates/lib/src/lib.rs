//! few-lib: Core logic for FEW
//!
//! This crate provides everything behind the `few` command line:
//! - `words`: resolving package references and syncing them through the global cache
//! - `litany`: the per-project list of words (`few.litany.yaml`)
//! - `init`: idempotent project scaffolding
//! - `listen`: the listen / litany flows built on the above
//! - `interpret`: the prompt, generate, parse and repair pipeline that writes AI output

pub mod consts;
pub mod init;
pub mod interpret;
pub mod listen;
pub mod litany;
pub mod platform;
pub mod project;
pub mod util;
pub mod words;

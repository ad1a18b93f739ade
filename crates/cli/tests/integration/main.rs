//! Integration tests that drive `few` against real local git repositories.
//!
//! Every test returns early when `git` is not installed.

mod common;
mod listen_tests;
mod litany_tests;

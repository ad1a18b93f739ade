//! Shared utilities.
//!
//! Directory copying, content hashing and test helpers.

pub mod fs;
pub mod hash;

#[cfg(test)]
pub mod testutil;

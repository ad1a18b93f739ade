//! Built-in content for project scaffolding.

/// Fallback `PARSEME.md`, used when the reference copy cannot be fetched.
pub const PARSEME_TEMPLATE: &str = r#"# PARSEME.md

This file is intended for Large Language Models (LLMs).
It contains structured information about the project to facilitate AI-first development.

## Project Structure
- TBD

## Core Concepts
- TBD

## Packages (Words)
- TBD
"#;

/// Marker prepended to the project README, pointing AI readers at `PARSEME.md`.
pub const README_MARKER: &str =
  "<!-- FEW: This project is developed AI-first. LLMs should read PARSEME.md before making changes. -->";

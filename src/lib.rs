#![warn(missing_docs)]
//! Library support for the `hit` tool manager.

/// Toolkit scanning, search, and lookup.
mod catalog;
/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading and validation.
mod config;
/// Quality checks and issue submission for contributions.
mod contribution;
/// Tool definition file discovery and parsing.
mod definition;
/// Common diagnostics and warning aggregation.
mod diagnostics;
/// Unified diff rendering helpers.
mod diff;
/// Error handling for the crate.
mod error;
/// Copying, backing up, and removing tool directories.
mod files;
/// YAML frontmatter parsing for Markdown definitions.
mod frontmatter;
/// Developer tracing setup.
mod logging;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// Pure-XML prompt definitions.
mod prompt_xml;
/// Installation registry persistence.
mod registry;
/// Claude slash command generation.
mod slash;
/// Tool types, records, and references.
mod tool;
/// Update detection against the toolkit.
mod updates;
/// Lenient semantic version comparison.
mod version;

/// Shared fixtures for unit tests.
#[cfg(test)]
mod testutil;

pub use crate::error::{Error, Result};

/// Run the CLI, returning a structured error on failure.
pub async fn run() -> Result<()> {
    cli::run().await
}

//! CLI command implementations.

use std::{
    env,
    io::{self, IsTerminal},
    path::PathBuf,
};

use inquire::{Confirm, error::InquireError};

use crate::{
    catalog::Catalog,
    config::Config,
    diagnostics::Diagnostics,
    error::{Error, Result},
    paths,
    tool::ToolType,
};

/// Output color handling selection.
#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    /// Colorize only when output is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled.
    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    /// Output color selection.
    pub(crate) color: ColorChoice,
    /// Print skipped definitions and debug tracing.
    pub(crate) verbose: bool,
    /// Toolkit root from `--toolkit`.
    pub(crate) toolkit: Option<PathBuf>,
}

impl GlobalArgs {
    /// Load the config file with the `--toolkit` override applied.
    pub(crate) fn config(&self) -> Result<Config> {
        let toolkit = match &self.toolkit {
            Some(raw) => Some(paths::expand_path(&raw.to_string_lossy(), &current_dir())?),
            None => None,
        };
        Ok(Config::load()?.with_toolkit(toolkit))
    }

    /// Load config and scan the toolkit.
    pub(crate) fn catalog(&self, diagnostics: &mut Diagnostics) -> Result<(Config, Catalog)> {
        let config = self.config()?;
        let catalog = Catalog::load(&config, diagnostics);
        Ok((config, catalog))
    }
}

/// Return the working directory, or `.` when it cannot be read.
pub(crate) fn current_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Ask a yes/no question, mapping cancellation to [`Error::PromptCanceled`].
pub(crate) fn confirm(message: &str, default: bool) -> Result<bool> {
    match Confirm::new(message).with_default(default).prompt() {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Err(Error::PromptCanceled)
        }
        Err(error) => Err(Error::PromptFailed {
            message: error.to_string(),
        }),
    }
}

/// Sort key for a stored type name: known types in scan order, unknown types last.
pub(crate) fn type_rank(kind: &str) -> usize {
    ToolType::from_name(kind)
        .and_then(|kind| ToolType::all().iter().position(|known| *known == kind))
        .unwrap_or(usize::MAX)
}

/// Return `"s"` unless the count is one.
pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

// Command modules are ordered alphabetically - maintain this order.
/// Contribute command implementation.
pub mod contribute;
/// Doctor command implementation.
pub mod doctor;
/// Install command implementation.
pub mod install;
/// List command implementation.
pub mod list;
/// Search command implementation.
pub mod search;
/// Stats command implementation.
pub mod stats;
/// Uninstall command implementation.
pub mod uninstall;
/// Update command implementation.
pub mod update;

#[cfg(test)]
mod tests {
    use super::plural;

    #[test]
    fn pluralizes_counts() {
        assert_eq!(plural(0), "s");
        assert_eq!(plural(1), "");
        assert_eq!(plural(2), "s");
    }
}

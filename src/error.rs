//! Error types for the hit CLI.

use std::{env::VarError, io, path::PathBuf, process::ExitCode, result::Result as StdResult};

use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for hit operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// A user-supplied path could not be expanded.
    #[error("Invalid path: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// An interactive prompt was interrupted or canceled.
    #[error("Prompt canceled.")]
    PromptCanceled,
    /// An interactive prompt failed.
    #[error("Prompt failed: {message}")]
    PromptFailed {
        /// Error message describing the prompt failure.
        message: String,
    },
    /// A tool identifier was not of the form `<type>/<id>`.
    #[error("Invalid tool identifier '{input}'. Use <type>/<id>, e.g. prompt/code-review-ts.")]
    InvalidToolRef {
        /// The rejected identifier.
        input: String,
    },
    /// A tool type name is not one of the supported types.
    #[error(
        "Unsupported tool type '{name}'. Expected one of: prompt, agent, evaluator, guardrail, context-pack, skill."
    )]
    UnsupportedToolType {
        /// The rejected type name.
        name: String,
    },
    /// A tool could not be found in the toolkit.
    #[error("Tool not found in toolkit: {id}. Run `hit search` to see available tools.")]
    ToolNotFound {
        /// Missing tool identifier.
        id: String,
    },
    /// A tool is not recorded in the registry.
    #[error("Tool is not installed: {id}. Run `hit list` to see installed tools.")]
    NotInstalled {
        /// Tool identifier.
        id: String,
    },
    /// A required path already exists.
    #[error("Path already exists: {path}. Use --force to overwrite.")]
    PathExists {
        /// Path that already exists.
        path: PathBuf,
    },
    /// A path required for operation does not exist.
    #[error("Path does not exist: {path}")]
    PathMissing {
        /// Path that does not exist.
        path: PathBuf,
    },
    /// Copying tool files failed.
    #[error("Failed to copy {from} to {to}: {source}")]
    CopyFailed {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Removing an installed tool directory failed.
    #[error("Failed to remove {path}: {source}")]
    RemoveFailed {
        /// Path that could not be removed.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The registry could not be written.
    #[error("Failed to write registry at {path}: {source}")]
    RegistryWrite {
        /// Path to the registry file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The registry could not be serialized.
    #[error("Failed to serialize registry: {source}")]
    RegistrySerialize {
        /// Underlying serialization error.
        source: serde_json::Error,
    },
    /// A tool definition could not be parsed.
    #[error("Invalid tool definition at {path}: {message}")]
    DefinitionInvalid {
        /// Path to the definition file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// A slash command file could not be written.
    #[error("Failed to write command file at {path}: {source}")]
    CommandWrite {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A template could not be rendered.
    #[error("Failed to render template: {message}")]
    TemplateRender {
        /// Error message describing the render failure.
        message: String,
    },
    /// The GitHub CLI failed to create an issue.
    #[error("Failed to create GitHub issue: {message}\nMake sure the gh CLI is installed and authenticated: gh auth login")]
    GithubIssue {
        /// Error message from gh or the spawn failure.
        message: String,
    },
    /// The doctor command found problems.
    #[error("Doctor found {count} problem(s).")]
    DoctorFailed {
        /// Number of error-level findings.
        count: usize,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}

//! Configuration loading.
//!
//! The config file is optional; a missing file yields defaults. Relative paths
//! in the file resolve against the file's directory.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    paths,
};

/// Parsed configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Explicit toolkit root, bypassing discovery.
    toolkit: Option<PathBuf>,
    /// Default root for installed tools.
    install_dir: Option<PathBuf>,
}

/// Raw config file structure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// Toolkit root path.
    toolkit: Option<String>,
    /// Install root path.
    install_dir: Option<String>,
}

impl Config {
    /// Load the default config from disk.
    pub(crate) fn load() -> Result<Self> {
        let path = paths::default_config_path()?;
        Self::load_from(&path)
    }

    /// Load a config file from an explicit path.
    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(error) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };

        let raw: RawConfig = toml::from_str(&contents).map_err(|error| Error::ConfigParse {
            path: path.to_path_buf(),
            source: error,
        })?;

        let base_dir = path.parent().unwrap_or(Path::new("."));
        let expand = |value: Option<String>| -> Result<Option<PathBuf>> {
            value
                .filter(|value| !value.trim().is_empty())
                .map(|value| paths::expand_path(&value, base_dir))
                .transpose()
        };

        Ok(Self {
            toolkit: expand(raw.toolkit)?,
            install_dir: expand(raw.install_dir)?,
        })
    }

    /// Override the toolkit root, typically from `--toolkit`.
    pub(crate) fn with_toolkit(mut self, toolkit: Option<PathBuf>) -> Self {
        if toolkit.is_some() {
            self.toolkit = toolkit;
        }
        self
    }

    /// Return the explicit toolkit root, if any.
    pub(crate) fn toolkit(&self) -> Option<&Path> {
        self.toolkit.as_deref()
    }

    /// Return the configured install root, if any.
    pub(crate) fn install_dir(&self) -> Option<&Path> {
        self.install_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::tempdir;

    use crate::{config::Config, error::Error, paths::normalize_path};

    #[test]
    fn missing_config_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = Config::load_from(&dir.path().join("missing.toml")).expect("defaults");
        assert!(config.toolkit().is_none());
        assert!(config.install_dir().is_none());
    }

    #[test]
    fn resolves_relative_paths_against_config_dir() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "toolkit = \"kit\"\ninstall_dir = \"installed\"\n").expect("write config");

        let config = Config::load_from(&path).expect("config");
        assert_eq!(config.toolkit(), Some(normalize_path(&dir.path().join("kit")).as_path()));
        assert_eq!(
            config.install_dir(),
            Some(normalize_path(&dir.path().join("installed")).as_path())
        );
    }

    #[test]
    fn flag_overrides_configured_toolkit() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "toolkit = \"kit\"\n").expect("write config");

        let config = Config::load_from(&path)
            .expect("config")
            .with_toolkit(Some(PathBuf::from("/elsewhere")));
        assert_eq!(config.toolkit(), Some(PathBuf::from("/elsewhere").as_path()));

        let config = config.with_toolkit(None);
        assert_eq!(config.toolkit(), Some(PathBuf::from("/elsewhere").as_path()));
    }

    #[test]
    fn rejects_invalid_toml() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "toolkit = [").expect("write config");

        let error = Config::load_from(&path).expect_err("config should fail");
        assert!(matches!(error, Error::ConfigParse { .. }));
    }
}

//! Path expansion and normalization utilities.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use path_clean::PathClean;

use crate::error::{Error, Result};

/// Directory under the home directory holding hit state.
const HIT_DIR: &str = ".hit";

/// Return the user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(Error::HomeDirMissing)
}

/// Return the directory holding the registry and config.
pub fn hit_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(HIT_DIR))
}

/// Return the default config path.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(hit_dir()?.join("config.toml"))
}

/// Return the default registry path.
pub fn default_registry_path() -> Result<PathBuf> {
    Ok(hit_dir()?.join("registry.json"))
}

/// Return the Claude directory in the user's home.
pub fn claude_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(".claude"))
}

/// Return the directory Claude reads slash commands from.
pub fn claude_commands_dir() -> Result<PathBuf> {
    Ok(claude_dir()?.join("commands"))
}

/// Expand `~` and environment variables in a path and resolve it against a base directory.
pub fn expand_path(raw: &str, base_dir: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|error| Error::PathExpansion {
        path: raw.to_string(),
        source: error,
    })?;
    let expanded_path = PathBuf::from(expanded.as_ref());
    let resolved = if expanded_path.is_relative() {
        base_dir.join(expanded_path)
    } else {
        expanded_path
    };
    Ok(normalize_path(&resolved))
}

/// Normalize a path for comparisons by cleaning and canonicalizing when possible.
pub fn normalize_path(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(_) => path.clean(),
    }
}

/// Render a path for display, using a tilde prefix for the home directory.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", MAIN_SEPARATOR, stripped.display());
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use tempfile::tempdir;

    use super::{expand_path, normalize_path};

    #[test]
    fn resolves_relative_paths_against_base() {
        let dir = tempdir().expect("tempdir");
        let expanded = expand_path("tools", dir.path()).expect("expand");
        assert_eq!(expanded, normalize_path(&dir.path().join("tools")));
    }

    #[test]
    fn keeps_absolute_paths() {
        let dir = tempdir().expect("tempdir");
        let raw = dir.path().to_string_lossy().to_string();
        let expanded = expand_path(&raw, dir.path().join("elsewhere").as_path()).expect("expand");
        assert_eq!(expanded, normalize_path(dir.path()));
    }

    #[test]
    fn cleans_missing_paths() {
        let cleaned = normalize_path(Path::new("/does/not/../exist"));
        assert_eq!(cleaned, PathBuf::from("/does/exist"));
    }
}

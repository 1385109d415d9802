//! Test utilities for setting up isolated toolkit environments.
//!
//! `ToolkitFixture` creates a temporary toolkit root alongside a fake home
//! directory and project directory, so commands can run against real files
//! without touching `~/.hit` or `~/.claude`.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{
    catalog::Catalog,
    diagnostics::Diagnostics,
    registry::RegistryStore,
    tool::ToolType,
};

/// Minimal YAML definition with the required fields.
pub fn yaml_tool(id: &str, version: &str) -> String {
    format!("id: {id}\nname: {id}\nversion: {version}\ndescription: Description for {id}\n")
}

/// Markdown prompt definition with one required variable.
pub fn markdown_prompt(id: &str, version: &str, body: &str) -> String {
    format!(
        "---\nid: {id}\nname: {id}\nversion: {version}\ndescription: Prompt {id}\nvariables:\n  - name: code\n    description: Code to review\n    required: true\n---\n{body}"
    )
}

/// Test fixture for creating isolated toolkit environments.
pub struct ToolkitFixture {
    /// Root temp directory (holds everything).
    _root: TempDir,
    /// Toolkit root containing type subdirectories.
    toolkit: PathBuf,
    /// Simulated home directory.
    home: PathBuf,
    /// Simulated project directory.
    project: PathBuf,
}

impl ToolkitFixture {
    /// Create a fixture with empty toolkit, home, and project directories.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let toolkit = root.path().join("toolkit");
        let home = root.path().join("home");
        let project = root.path().join("project");
        for dir in [&toolkit, &home, &project] {
            fs::create_dir_all(dir).expect("create fixture dir");
        }
        Self {
            _root: root,
            toolkit,
            home,
            project,
        }
    }

    /// Write a file relative to the toolkit root, creating parent directories.
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        let path = self.toolkit.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(&path, contents).expect("write fixture file");
        self
    }

    /// Add a YAML tool of the given type.
    pub fn with_tool(self, tool_type: ToolType, id: &str, version: &str) -> Self {
        let file = match tool_type {
            ToolType::Prompt => "prompt.yaml",
            ToolType::Agent => "agent.yaml",
            _ => "config.yaml",
        };
        let relative = format!("{}/{id}/{file}", tool_type.dir_name());
        self.with_file(&relative, &yaml_tool(id, version))
    }

    /// Get the toolkit root.
    pub fn root(&self) -> &Path {
        &self.toolkit
    }

    /// Get the simulated home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the simulated project directory.
    pub fn project(&self) -> &Path {
        &self.project
    }

    /// Directory tools are installed into.
    pub fn install_root(&self) -> PathBuf {
        self.project.join(".claude").join("tools")
    }

    /// Directory slash commands are written into.
    pub fn commands_dir(&self) -> PathBuf {
        self.home.join(".claude").join("commands")
    }

    /// Registry store under the simulated home directory.
    pub fn registry(&self) -> RegistryStore {
        RegistryStore::new(self.home.join(".hit").join("registry.json"))
    }

    /// Scan the toolkit root.
    pub fn catalog(&self) -> Catalog {
        Catalog::scan(&self.toolkit, &mut Diagnostics::new(false))
    }
}

impl Default for ToolkitFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{ToolkitFixture, yaml_tool};
    use crate::tool::ToolType;

    #[test]
    fn creates_empty_fixture() {
        let fixture = ToolkitFixture::new();
        assert!(fixture.root().is_dir());
        assert!(fixture.home().is_dir());
        assert!(fixture.project().is_dir());
        assert!(fixture.catalog().tools.is_empty());
    }

    #[test]
    fn adds_tools_by_type() {
        let fixture = ToolkitFixture::new()
            .with_tool(ToolType::Guardrail, "pii", "1.0.0")
            .with_file("prompts/a/prompt.yaml", &yaml_tool("a", "0.1.0"));
        let catalog = fixture.catalog();
        assert_eq!(catalog.tools.len(), 2);
        assert!(fixture.root().join("guardrails/pii/config.yaml").is_file());
    }
}

//! Tool catalog records and tool type metadata.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Serialize;

use crate::error::{Error, Result};

/// Supported tool types, each stored in its own toolkit subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolType {
    /// Prompt templates.
    Prompt,
    /// Agent definitions.
    Agent,
    /// Output evaluators.
    Evaluator,
    /// Guardrail definitions.
    Guardrail,
    /// Bundled context packs.
    ContextPack,
    /// Agent skills.
    Skill,
}

impl ToolType {
    /// Return all supported tool types in scan order.
    pub(crate) fn all() -> [Self; 6] {
        [
            Self::Prompt,
            Self::Agent,
            Self::Evaluator,
            Self::Guardrail,
            Self::ContextPack,
            Self::Skill,
        ]
    }

    /// Return the identifier used in `<type>/<id>` references and the registry.
    pub(crate) fn id(self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Agent => "agent",
            Self::Evaluator => "evaluator",
            Self::Guardrail => "guardrail",
            Self::ContextPack => "context-pack",
            Self::Skill => "skill",
        }
    }

    /// Return the toolkit subdirectory holding tools of this type.
    pub(crate) fn dir_name(self) -> &'static str {
        match self {
            Self::Prompt => "prompts",
            Self::Agent => "agents",
            Self::Evaluator => "evaluators",
            Self::Guardrail => "guardrails",
            Self::ContextPack => "context-packs",
            Self::Skill => "skills",
        }
    }

    /// Return the plural heading used when grouping output.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Prompt => "Prompts",
            Self::Agent => "Agents",
            Self::Evaluator => "Evaluators",
            Self::Guardrail => "Guardrails",
            Self::ContextPack => "Context Packs",
            Self::Skill => "Skills",
        }
    }

    /// Look up a type by its identifier or directory name.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|kind| kind.id() == name || kind.dir_name() == name)
    }

    /// Guess a type from a path containing a toolkit type directory.
    pub(crate) fn detect_from_path(path: &Path) -> Option<Self> {
        path.components().find_map(|component| {
            let name = component.as_os_str().to_str()?;
            Self::all()
                .into_iter()
                .find(|kind| kind.dir_name() == name.to_ascii_lowercase())
        })
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ToolType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::from_name(value).ok_or_else(|| Error::UnsupportedToolType {
            name: value.to_string(),
        })
    }
}

/// Optional descriptive metadata attached to a tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolMetadata {
    /// Author name.
    pub(crate) author: Option<String>,
    /// License identifier.
    pub(crate) license: Option<String>,
    /// Free-form search tags.
    pub(crate) tags: Vec<String>,
    /// Last update date as written in the definition.
    pub(crate) last_updated: Option<String>,
}

/// A catalog entry discovered in the toolkit.
///
/// Tools are rebuilt from disk on every scan; only `id` links a tool to its
/// registry entry across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tool {
    /// Tool identifier, unique within its type directory.
    pub(crate) id: String,
    /// Human readable name.
    pub(crate) name: String,
    /// Short description.
    pub(crate) description: String,
    /// Semantic version string.
    pub(crate) version: String,
    /// Category, `general` when not declared.
    pub(crate) category: String,
    /// Tool type derived from the toolkit subdirectory.
    pub(crate) tool_type: ToolType,
    /// Absolute path to the tool directory.
    pub(crate) path: PathBuf,
    /// Optional metadata block.
    pub(crate) metadata: Option<ToolMetadata>,
}

impl Tool {
    /// Return the tags declared in metadata, or an empty slice.
    pub(crate) fn tags(&self) -> &[String] {
        self.metadata
            .as_ref()
            .map(|metadata| metadata.tags.as_slice())
            .unwrap_or_default()
    }

    /// Return the `<type>/<id>` reference for this tool.
    pub(crate) fn reference(&self) -> String {
        format!("{}/{}", self.tool_type, self.id)
    }
}

/// A `<type>/<id>` reference supplied on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRef {
    /// Requested tool type.
    pub(crate) tool_type: ToolType,
    /// Requested tool identifier.
    pub(crate) id: String,
}

impl FromStr for ToolRef {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidToolRef {
            input: value.to_string(),
        };
        let (kind, id) = value.trim().split_once('/').ok_or_else(invalid)?;
        let id = id.trim();
        if id.is_empty() || id.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            tool_type: kind.parse()?,
            id: id.to_string(),
        })
    }
}

impl fmt::Display for ToolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tool_type, self.id)
    }
}

//! Tool definition discovery and parsing.
//!
//! A tool directory holds one definition file. The file is located by probing
//! a fixed list of names, parsed according to its format into a loosely typed
//! [`Definition`], and only then validated into a [`Tool`]. Any failure along
//! the way means "not a tool" for the scanner.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    diagnostics::Diagnostics,
    frontmatter::split_frontmatter,
    prompt_xml::{PromptXml, is_prompt_xml, parse_prompt_xml},
    tool::{Tool, ToolMetadata, ToolType},
};

/// Category assigned when a definition does not declare one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Definition file names in lookup order; the first existing file wins.
const DEFINITION_FILES: [(&str, DefinitionFormat); 16] = [
    ("prompt.md", DefinitionFormat::Markdown),
    ("agent.md", DefinitionFormat::Markdown),
    ("tool.md", DefinitionFormat::Markdown),
    ("prompt.xml", DefinitionFormat::Xml),
    ("prompt.yaml", DefinitionFormat::Yaml),
    ("prompt.yml", DefinitionFormat::Yaml),
    ("agent.yaml", DefinitionFormat::Yaml),
    ("agent.yml", DefinitionFormat::Yaml),
    ("config.yaml", DefinitionFormat::Yaml),
    ("config.yml", DefinitionFormat::Yaml),
    ("tool.yaml", DefinitionFormat::Yaml),
    ("tool.yml", DefinitionFormat::Yaml),
    ("prompt.json", DefinitionFormat::Json),
    ("agent.json", DefinitionFormat::Json),
    ("config.json", DefinitionFormat::Json),
    ("tool.json", DefinitionFormat::Json),
];

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// Markdown with YAML frontmatter, or a pure-XML prompt saved as Markdown.
    Markdown,
    /// XML rooted at `<prompt>`.
    Xml,
    /// Plain YAML.
    Yaml,
    /// Plain JSON.
    Json,
}

impl DefinitionFormat {
    /// Infer a format from a file extension.
    pub(crate) fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "xml" => Some(Self::Xml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A located definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFile {
    /// Path to the file.
    pub(crate) path: PathBuf,
    /// Format implied by the file name.
    pub(crate) format: DefinitionFormat,
}

/// Error raised while parsing a single definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionError {
    /// A human-readable error message.
    pub message: String,
}

impl DefinitionError {
    /// Create a new definition error message.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A prompt variable declared by a definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variable {
    /// Placeholder name, used as `{{name}}` in templates.
    pub(crate) name: String,
    /// What the variable holds.
    pub(crate) description: String,
    /// Whether the variable must be supplied.
    pub(crate) required: bool,
}

/// A parsed definition before required-field validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definition {
    /// Declared identifier.
    pub(crate) id: Option<String>,
    /// Declared name.
    pub(crate) name: Option<String>,
    /// Declared version.
    pub(crate) version: Option<String>,
    /// Declared description.
    pub(crate) description: Option<String>,
    /// Declared category.
    pub(crate) category: Option<String>,
    /// Declared metadata block.
    pub(crate) metadata: Option<ToolMetadata>,
    /// Prompt body: the `template` field, Markdown body, or XML sections.
    pub(crate) template: Option<String>,
    /// Declared variables.
    pub(crate) variables: Vec<Variable>,
    /// Number of declared examples, when an `examples` list is present.
    pub(crate) examples: Option<usize>,
}

impl Definition {
    /// Validate required fields and build a catalog [`Tool`].
    pub(crate) fn into_tool(self, dir: &Path, tool_type: ToolType) -> Result<Tool, DefinitionError> {
        let id = require(self.id, "id")?;
        let name = require(self.name, "name")?;
        let version = require(self.version, "version")?;
        Ok(Tool {
            id,
            name,
            description: self.description.unwrap_or_default(),
            version,
            category: self
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tool_type,
            path: dir.to_path_buf(),
            metadata: self.metadata,
        })
    }
}

/// Return a required field or a descriptive error.
fn require(value: Option<String>, field: &str) -> Result<String, DefinitionError> {
    value.ok_or_else(|| DefinitionError::new(format!("missing required field '{field}'")))
}

/// Scalar value that may be written as text, a number, or a boolean.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    /// Plain text.
    Text(String),
    /// Integer literal.
    Integer(i64),
    /// Float literal, such as an unquoted `1.2` version.
    Float(f64),
    /// Boolean literal.
    Flag(bool),
}

impl Scalar {
    /// Render the scalar as text.
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Flag(value) => value.to_string(),
        }
    }

    /// Interpret the scalar as a boolean flag.
    fn is_true(&self) -> bool {
        match self {
            Self::Flag(value) => *value,
            Self::Text(text) => text.trim().eq_ignore_ascii_case("true"),
            Self::Integer(_) | Self::Float(_) => false,
        }
    }
}

/// Raw YAML/JSON record prior to normalization.
#[derive(Debug, Deserialize)]
struct RawRecord {
    /// Declared identifier.
    id: Option<Scalar>,
    /// Declared name.
    name: Option<Scalar>,
    /// Declared version.
    version: Option<Scalar>,
    /// Declared description.
    description: Option<Scalar>,
    /// Declared category.
    category: Option<Scalar>,
    /// Declared metadata block.
    metadata: Option<RawMetadata>,
    /// Prompt template.
    template: Option<String>,
    /// Declared variables.
    variables: Option<Vec<RawVariable>>,
    /// Usage examples; only the count matters here.
    examples: Option<Vec<serde_yaml::Value>>,
}

/// Raw metadata block.
#[derive(Debug, Deserialize)]
struct RawMetadata {
    /// Author name.
    author: Option<Scalar>,
    /// License identifier.
    license: Option<Scalar>,
    /// Search tags.
    tags: Option<Vec<Scalar>>,
    /// Last update date.
    #[serde(rename = "lastUpdated", alias = "last_updated")]
    last_updated: Option<Scalar>,
}

/// Raw variable declaration.
#[derive(Debug, Deserialize)]
struct RawVariable {
    /// Placeholder name.
    name: Option<Scalar>,
    /// Variable description.
    description: Option<Scalar>,
    /// Required flag.
    required: Option<Scalar>,
}

impl RawRecord {
    /// Normalize raw values into a [`Definition`].
    fn into_definition(self) -> Definition {
        Definition {
            id: text(self.id),
            name: text(self.name),
            version: text(self.version),
            description: text(self.description),
            category: text(self.category),
            metadata: self.metadata.map(RawMetadata::into_metadata),
            template: self.template.filter(|template| !template.trim().is_empty()),
            variables: self
                .variables
                .unwrap_or_default()
                .into_iter()
                .map(RawVariable::into_variable)
                .collect(),
            examples: self.examples.map(|examples| examples.len()),
        }
    }
}

impl RawMetadata {
    /// Normalize raw metadata.
    fn into_metadata(self) -> ToolMetadata {
        ToolMetadata {
            author: text(self.author),
            license: text(self.license),
            tags: self
                .tags
                .unwrap_or_default()
                .into_iter()
                .filter_map(|tag| text(Some(tag)))
                .collect(),
            last_updated: text(self.last_updated),
        }
    }
}

impl RawVariable {
    /// Normalize a raw variable.
    fn into_variable(self) -> Variable {
        Variable {
            name: text(self.name).unwrap_or_default(),
            description: text(self.description).unwrap_or_default(),
            required: self.required.is_some_and(|flag| flag.is_true()),
        }
    }
}

impl From<PromptXml> for Definition {
    fn from(xml: PromptXml) -> Self {
        Self {
            id: xml.id,
            name: xml.name,
            version: xml.version,
            description: xml.description,
            category: xml.category,
            metadata: xml.metadata,
            template: (!xml.body.is_empty()).then_some(xml.body),
            variables: xml.variables,
            examples: xml.examples,
        }
    }
}

/// Trim a scalar into text, treating blank values as absent.
fn text(value: Option<Scalar>) -> Option<String> {
    let value = value?.into_text();
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Locate the definition file in a directory using the lookup order.
pub fn find_definition_file(dir: &Path) -> Option<DefinitionFile> {
    DEFINITION_FILES.iter().find_map(|(name, format)| {
        let path = dir.join(name);
        path.is_file().then_some(DefinitionFile {
            path,
            format: *format,
        })
    })
}

/// Parse definition contents in the given format.
pub fn parse_definition(contents: &str, format: DefinitionFormat) -> Result<Definition, DefinitionError> {
    match format {
        DefinitionFormat::Markdown if is_prompt_xml(contents) => parse_xml(contents),
        DefinitionFormat::Markdown => parse_markdown(contents),
        DefinitionFormat::Xml => parse_xml(contents),
        DefinitionFormat::Yaml => {
            let raw: RawRecord = serde_yaml::from_str(contents)
                .map_err(|error| DefinitionError::new(error.to_string()))?;
            Ok(raw.into_definition())
        }
        DefinitionFormat::Json => {
            let raw: RawRecord = serde_json::from_str(contents)
                .map_err(|error| DefinitionError::new(error.to_string()))?;
            Ok(raw.into_definition())
        }
    }
}

/// Parse a Markdown document with YAML frontmatter; the body becomes the template.
fn parse_markdown(contents: &str) -> Result<Definition, DefinitionError> {
    let frontmatter = split_frontmatter(contents)
        .ok_or_else(|| DefinitionError::new("missing YAML frontmatter"))?;
    let raw: RawRecord = serde_yaml::from_str(frontmatter.yaml)
        .map_err(|error| DefinitionError::new(error.to_string()))?;
    let mut definition = raw.into_definition();
    let body = frontmatter.body.trim();
    if !body.is_empty() {
        definition.template = Some(body.to_string());
    }
    Ok(definition)
}

/// Parse a pure-XML prompt.
fn parse_xml(contents: &str) -> Result<Definition, DefinitionError> {
    parse_prompt_xml(contents).map(Definition::from)
}

/// Read and parse a located definition file.
pub fn read_definition(file: &DefinitionFile) -> Result<Definition, DefinitionError> {
    let contents =
        fs::read_to_string(&file.path).map_err(|error| DefinitionError::new(error.to_string()))?;
    parse_definition(&contents, file.format)
}

/// Load the tool defined in a directory, if it is a tool directory.
///
/// Directories without a definition file return `None` silently. Definition
/// files that fail to parse or lack required fields are recorded as skipped.
pub fn load_tool(dir: &Path, tool_type: ToolType, diagnostics: &mut Diagnostics) -> Option<Tool> {
    let file = find_definition_file(dir)?;
    match read_definition(&file).and_then(|definition| definition.into_tool(dir, tool_type)) {
        Ok(tool) => Some(tool),
        Err(error) => {
            diagnostics.skip(&file.path, error.message);
            None
        }
    }
}

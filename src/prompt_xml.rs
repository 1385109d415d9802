//! Pure-XML prompt documents rooted at `<prompt>`.

use roxmltree::{Document, Node};

use crate::{
    definition::{DefinitionError, Variable},
    tool::ToolMetadata,
};

/// Root element name for XML prompts.
const ROOT: &str = "prompt";

/// Prompt sections copied into the prompt body, in output order.
const BODY_SECTIONS: [&str; 4] = ["context", "instructions", "constraints", "output_format"];

/// Fields extracted from an XML prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptXml {
    /// `<metadata><id>`.
    pub(crate) id: Option<String>,
    /// `<metadata><name>`.
    pub(crate) name: Option<String>,
    /// `<metadata><description>`.
    pub(crate) description: Option<String>,
    /// `<metadata><version>`.
    pub(crate) version: Option<String>,
    /// `<metadata><category>`.
    pub(crate) category: Option<String>,
    /// Author, license, tags, and update date from `<metadata>`.
    pub(crate) metadata: Option<ToolMetadata>,
    /// Declared variables, normalized to a list.
    pub(crate) variables: Vec<Variable>,
    /// Number of `<example>` elements under `<examples>`, when present.
    pub(crate) examples: Option<usize>,
    /// Prompt sections re-wrapped in their tags.
    pub(crate) body: String,
}

/// Return true when the contents look like an XML prompt document.
pub fn is_prompt_xml(contents: &str) -> bool {
    let trimmed = contents.trim_start();
    let trimmed = match trimmed.strip_prefix("<?xml") {
        Some(rest) => rest.split_once("?>").map_or("", |(_, rest)| rest).trim_start(),
        None => trimmed,
    };
    trimmed.starts_with("<prompt>") || trimmed.starts_with("<prompt ")
}

/// Parse an XML prompt document.
pub fn parse_prompt_xml(contents: &str) -> Result<PromptXml, DefinitionError> {
    let document =
        Document::parse(contents).map_err(|error| DefinitionError::new(error.to_string()))?;
    let root = document.root_element();
    if root.tag_name().name() != ROOT {
        return Err(DefinitionError::new(format!(
            "expected <{ROOT}> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let metadata = child(root, "metadata")
        .ok_or_else(|| DefinitionError::new("missing <metadata> element"))?;

    Ok(PromptXml {
        id: child_text(metadata, "id"),
        name: child_text(metadata, "name"),
        description: child_text(metadata, "description"),
        version: child_text(metadata, "version"),
        category: child_text(metadata, "category"),
        metadata: parse_metadata(metadata),
        variables: parse_variables(metadata),
        examples: child(root, "examples").map(|examples| elements(examples, "example").count()),
        body: render_body(root, contents),
    })
}

/// Collect optional descriptive metadata; `None` when nothing is declared.
fn parse_metadata(metadata: Node<'_, '_>) -> Option<ToolMetadata> {
    let tags = child(metadata, "tags")
        .map(|tags| {
            elements(tags, "tag")
                .filter_map(|tag| tag.text().map(str::trim))
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let parsed = ToolMetadata {
        author: child_text(metadata, "author"),
        license: child_text(metadata, "license"),
        tags,
        last_updated: child_text(metadata, "lastUpdated")
            .or_else(|| child_text(metadata, "last_updated")),
    };
    (parsed != ToolMetadata::default()).then_some(parsed)
}

/// Collect variables whether declared as one element, a wrapped list, or repeated elements.
fn parse_variables(metadata: Node<'_, '_>) -> Vec<Variable> {
    let mut variables = Vec::new();
    for group in elements(metadata, "variables") {
        let mut nested = elements(group, "variable").peekable();
        if nested.peek().is_none() {
            if child(group, "name").is_some() {
                variables.push(parse_variable(group));
            }
            continue;
        }
        variables.extend(nested.map(parse_variable));
    }
    variables
}

/// Parse a single variable element.
fn parse_variable(node: Node<'_, '_>) -> Variable {
    Variable {
        name: child_text(node, "name").unwrap_or_default(),
        description: child_text(node, "description").unwrap_or_default(),
        required: child_text(node, "required").is_some_and(|value| value == "true"),
    }
}

/// Re-assemble the prompt sections into a body string.
fn render_body(root: Node<'_, '_>, contents: &str) -> String {
    let mut parts = Vec::new();
    for section in BODY_SECTIONS {
        let Some(node) = child(root, section) else {
            continue;
        };
        let inner = inner_xml(node, contents);
        if inner.is_empty() {
            continue;
        }
        parts.push(format!("<{section}>\n{inner}\n</{section}>"));
    }
    parts.join("\n\n")
}

/// Return the trimmed source text between an element's start and end tags.
fn inner_xml<'a>(node: Node<'_, '_>, contents: &'a str) -> &'a str {
    let (Some(first), Some(last)) = (node.first_child(), node.last_child()) else {
        return "";
    };
    contents[first.range().start..last.range().end].trim()
}

/// Find the first child element with the given name.
fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
}

/// Iterate child elements with the given name.
fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// Return the trimmed text of a child element, if present and non-empty.
fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    let element = child(node, name)?;
    let text: String = element
        .descendants()
        .filter(|descendant| descendant.is_text())
        .filter_map(|descendant| descendant.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

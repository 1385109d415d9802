//! Quality checks and issue submission for contributed tools.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    process::Command,
    sync::LazyLock,
};

use regex::Regex;
use tracing::debug;

use crate::{
    definition::{DefinitionFile, DefinitionFormat, find_definition_file, parse_definition},
    error::{Error, Result},
    tool::ToolType,
};

/// Opening XML tags such as `<context>`.
static OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(\w+)>").expect("open tag pattern is valid"));

/// Closing XML tags such as `</context>`.
static CLOSE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</(\w+)>").expect("close tag pattern is valid"));

/// Structure tags a prompt template should use at least one of.
const RECOMMENDED_TAGS: [&str; 3] = ["context", "instructions", "output_format"];

/// Fields every contributed definition must declare.
const REQUIRED_FIELDS: [&str; 5] = ["id", "name", "version", "description", "category"];

/// README section that must be present.
const USAGE_HEADING: &str = "## Usage";

/// README length below which a warning is raised.
const MIN_README_BYTES: usize = 200;

/// Errors and warnings from one group of checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Blocking problems.
    pub(crate) errors: Vec<String>,
    /// Non-blocking suggestions.
    pub(crate) warnings: Vec<String>,
}

impl ValidationReport {
    /// Return true when no errors were recorded.
    pub(crate) fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Merge another report into this one.
    fn extend(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Results of validating a contribution.
#[derive(Debug, Clone)]
pub struct Contribution {
    /// Declared tool type.
    pub(crate) tool_type: ToolType,
    /// Tool name taken from the tool directory.
    pub(crate) name: String,
    /// Definition file that was checked.
    pub(crate) definition_path: PathBuf,
    /// Definition checks.
    pub(crate) definition: ValidationReport,
    /// README checks.
    pub(crate) documentation: ValidationReport,
}

impl Contribution {
    /// Return true when both check groups passed.
    pub(crate) fn passed(&self) -> bool {
        self.definition.passed() && self.documentation.passed()
    }

    /// Return every warning, definition warnings first.
    pub(crate) fn warnings(&self) -> impl Iterator<Item = &String> {
        self.definition
            .warnings
            .iter()
            .chain(&self.documentation.warnings)
    }
}

/// Validate a definition file, or the definition inside a tool directory.
pub fn validate_contribution(path: &Path, tool_type: ToolType) -> Result<Contribution> {
    if !path.exists() {
        return Err(Error::PathMissing {
            path: path.to_path_buf(),
        });
    }
    let file = locate_definition(path)?;
    let tool_dir = file.path.parent().unwrap_or(Path::new("."));
    let name = tool_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Contribution {
        tool_type,
        name,
        definition: validate_definition(&file, tool_type),
        documentation: validate_documentation(tool_dir),
        definition_path: file.path,
    })
}

/// Resolve the definition file for a file or directory path.
fn locate_definition(path: &Path) -> Result<DefinitionFile> {
    if path.is_dir() {
        return find_definition_file(path).ok_or_else(|| Error::DefinitionInvalid {
            path: path.to_path_buf(),
            message: "no definition file found".to_string(),
        });
    }
    let format = DefinitionFormat::from_path(path).ok_or_else(|| Error::DefinitionInvalid {
        path: path.to_path_buf(),
        message: "unsupported definition file extension".to_string(),
    })?;
    Ok(DefinitionFile {
        path: path.to_path_buf(),
        format,
    })
}

/// Check required fields, metadata, template structure, and examples.
pub fn validate_definition(file: &DefinitionFile, tool_type: ToolType) -> ValidationReport {
    let mut report = ValidationReport::default();
    let contents = match fs::read_to_string(&file.path) {
        Ok(contents) => contents,
        Err(error) => {
            report.errors.push(format!("Failed to read definition: {error}"));
            return report;
        }
    };
    let definition = match parse_definition(&contents, file.format) {
        Ok(definition) => definition,
        Err(error) => {
            report
                .errors
                .push(format!("Failed to parse definition: {}", error.message));
            return report;
        }
    };

    let fields = [
        &definition.id,
        &definition.name,
        &definition.version,
        &definition.description,
        &definition.category,
    ];
    for (field, value) in REQUIRED_FIELDS.iter().zip(fields) {
        if value.is_none() {
            report.errors.push(format!("Missing required field: {field}"));
        }
    }

    match &definition.metadata {
        None => report.errors.push("Missing metadata section".to_string()),
        Some(metadata) => {
            if metadata.author.is_none() {
                report
                    .errors
                    .push("Missing required metadata field: author".to_string());
            }
            if metadata.license.is_none() {
                report
                    .errors
                    .push("Missing required metadata field: license".to_string());
            }
        }
    }

    if tool_type == ToolType::Prompt {
        match &definition.template {
            Some(template) => report.extend(check_template(template)),
            None => report
                .errors
                .push("Prompts must have a template".to_string()),
        }
    }

    if definition.examples.unwrap_or(0) == 0 {
        report
            .warnings
            .push("No examples provided (recommended: at least 2)".to_string());
    }
    report
}

/// Check that template XML tags balance and follow the recommended structure.
pub fn check_template(template: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    let open: Vec<&str> = OPEN_TAG
        .captures_iter(template)
        .filter_map(|captures| captures.get(1).map(|tag| tag.as_str()))
        .collect();

    let mut balance: BTreeMap<&str, i64> = BTreeMap::new();
    for tag in &open {
        *balance.entry(*tag).or_default() += 1;
    }
    for captures in CLOSE_TAG.captures_iter(template) {
        if let Some(tag) = captures.get(1) {
            *balance.entry(tag.as_str()).or_default() -= 1;
        }
    }
    for (tag, count) in balance {
        match count.cmp(&0) {
            Ordering::Greater => report.errors.push(format!("Unclosed XML tag: <{tag}>")),
            Ordering::Less => report.errors.push(format!("Extra closing tag: </{tag}>")),
            Ordering::Equal => {}
        }
    }

    let has_recommended = RECOMMENDED_TAGS
        .iter()
        .any(|tag| template.contains(&format!("<{tag}>")));
    if !has_recommended {
        report.warnings.push(
            "Template missing recommended XML structure tags (context, instructions, output_format)"
                .to_string(),
        );
    }

    let has_user_input = template.contains("{{") && open.iter().any(|tag| *tag != "thinking");
    if has_user_input && !open.iter().any(|tag| tag.contains("input")) {
        report.warnings.push(
            "Template contains variables but no input-related XML tags. Consider wrapping user input in descriptive tags (e.g., <code_to_review>, <user_input>)"
                .to_string(),
        );
    }
    report
}

/// Check the README beside the definition.
pub fn validate_documentation(tool_dir: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();
    let readme = tool_dir.join("README.md");
    let Ok(contents) = fs::read_to_string(&readme) else {
        report.errors.push("Missing README.md file".to_string());
        return report;
    };
    if !contents.contains(USAGE_HEADING) {
        report
            .errors
            .push(format!("README.md missing required \"{USAGE_HEADING}\" section"));
    }
    if contents.len() < MIN_README_BYTES {
        report
            .warnings
            .push("README.md is very short (recommended: detailed documentation)".to_string());
    }
    report
}

/// Title for the contribution issue.
pub fn issue_title(contribution: &Contribution) -> String {
    format!(
        "[Contribution] New {}: {}",
        contribution.tool_type, contribution.name
    )
}

/// Markdown body for the contribution issue.
pub fn issue_body(contribution: &Contribution) -> String {
    let status = if contribution.passed() {
        "All validations passed"
    } else {
        "Validation issues found"
    };
    let mut body = format!(
        "## New Contribution\n\n**Type:** {}\n**Name:** {}\n**Status:** {status}\n\n---\n\n### Validation Results\n",
        contribution.tool_type, contribution.name
    );
    write_section(&mut body, "Definition", &contribution.definition);
    write_section(&mut body, "Documentation", &contribution.documentation);

    body.push_str("\n---\n\n### Next Steps\n\n");
    if contribution.passed() {
        body.push_str(
            "1. Create a pull request with your changes\n2. Link this issue to your PR\n3. Wait for maintainer review\n",
        );
    } else {
        body.push_str(
            "1. Fix the validation errors listed above\n2. Run `hit contribute` again to validate\n3. Create a PR once all checks pass\n",
        );
    }
    body
}

/// Append one validation section to an issue body.
fn write_section(body: &mut String, title: &str, report: &ValidationReport) {
    let outcome = if report.passed() { "Passed" } else { "Failed" };
    body.push_str(&format!("\n#### {title}\n{outcome}\n"));
    if !report.errors.is_empty() {
        body.push_str("\n**Errors:**\n");
        for error in &report.errors {
            body.push_str(&format!("- {error}\n"));
        }
    }
    if !report.warnings.is_empty() {
        body.push_str("\n**Warnings:**\n");
        for warning in &report.warnings {
            body.push_str(&format!("- {warning}\n"));
        }
    }
}

/// Open a GitHub issue with the `gh` CLI and return its URL.
pub fn create_issue(title: &str, body: &str) -> Result<String> {
    debug!(%title, "creating contribution issue");
    let output = Command::new("gh")
        .args(["issue", "create", "--title", title, "--body", body])
        .output()
        .map_err(|error| Error::GithubIssue {
            message: error.to_string(),
        })?;
    if !output.status.success() {
        return Err(Error::GithubIssue {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

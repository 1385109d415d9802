//! Claude slash-command generation for installed prompts.

use std::{
    fs,
    path::{Path, PathBuf},
};

use minijinja::{Environment, UndefinedBehavior, context};
use serde::Serialize;
use tracing::debug;

use crate::{
    definition::{Definition, find_definition_file, read_definition},
    error::{Error, Result},
    tool::Tool,
};

/// Layout of a generated command file.
const COMMAND_TEMPLATE: &str = "{% if name %}# {{ name }}\n\n{% endif %}\
{% if description %}# {{ description }}\n\n{% endif %}\
# Generated by Human in the Loop CLI\n\n\
{% if variables %}# Variables:\n\
{% for var in variables %}#   {{ var.placeholder }} {% if var.required %}(required){% else %}(optional){% endif %} - {{ var.description }}\n{% endfor %}\
\n{% endif %}{{ body }}";

/// Variable as listed in the command header.
#[derive(Debug, Serialize)]
struct CommandVariable {
    /// `{{name}}` placeholder text.
    placeholder: String,
    /// Whether the variable must be supplied.
    required: bool,
    /// Variable description, possibly empty.
    description: String,
}

/// Render command file contents for a definition with a prompt body.
pub fn render_command(definition: &Definition, body: &str) -> Result<String> {
    let variables: Vec<CommandVariable> = definition
        .variables
        .iter()
        .map(|variable| CommandVariable {
            placeholder: format!("{{{{{}}}}}", variable.name),
            required: variable.required,
            description: variable.description.clone(),
        })
        .collect();

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    let template = env
        .template_from_str(COMMAND_TEMPLATE)
        .map_err(|error| Error::TemplateRender {
            message: error.to_string(),
        })?;
    template
        .render(context! {
            name => definition.name.as_deref().unwrap_or_default(),
            description => definition.description.as_deref().unwrap_or_default(),
            variables => variables,
            body => body,
        })
        .map_err(|error| Error::TemplateRender {
            message: error.to_string(),
        })
}

/// Write `<commands_dir>/<id>.md` for a prompt tool.
///
/// Returns `None` when the prompt has no body to expose as a command.
pub fn install_command(tool: &Tool, commands_dir: &Path) -> Result<Option<PathBuf>> {
    let file = find_definition_file(&tool.path).ok_or_else(|| Error::PathMissing {
        path: tool.path.clone(),
    })?;
    let definition = read_definition(&file).map_err(|error| Error::DefinitionInvalid {
        path: file.path.clone(),
        message: error.message,
    })?;
    let Some(body) = definition.template.as_deref() else {
        return Ok(None);
    };

    let contents = render_command(&definition, body)?;
    let path = commands_dir.join(format!("{}.md", tool.id));
    let write_error = |source| Error::CommandWrite {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(commands_dir).map_err(write_error)?;
    fs::write(&path, contents).map_err(write_error)?;
    debug!(path = %path.display(), "wrote slash command");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{install_command, render_command};
    use crate::{
        definition::{Definition, Variable},
        error::Error,
        testutil::{ToolkitFixture, markdown_prompt, yaml_tool},
    };

    #[test]
    fn renders_header_variables_and_body() {
        let definition = Definition {
            name: Some("Code Review".to_string()),
            description: Some("Reviews code".to_string()),
            variables: vec![
                Variable {
                    name: "code".to_string(),
                    description: "Code to review".to_string(),
                    required: true,
                },
                Variable {
                    name: "style".to_string(),
                    description: String::new(),
                    required: false,
                },
            ],
            ..Definition::default()
        };
        let rendered = render_command(&definition, "Review {{code}}").expect("render");
        assert_eq!(
            rendered,
            "# Code Review\n\n# Reviews code\n\n# Generated by Human in the Loop CLI\n\n# Variables:\n#   {{code}} (required) - Code to review\n#   {{style}} (optional) - \n\nReview {{code}}"
        );
    }

    #[test]
    fn omits_missing_header_fields() {
        let rendered = render_command(&Definition::default(), "Body").expect("render");
        assert_eq!(rendered, "# Generated by Human in the Loop CLI\n\nBody");
    }

    #[test]
    fn writes_command_for_markdown_prompt() {
        let fixture = ToolkitFixture::new().with_file(
            "prompts/review/prompt.md",
            &markdown_prompt("review", "1.0.0", "Review {{code}} please.\n"),
        );
        let catalog = fixture.catalog();
        let tool = catalog.get("review").expect("tool");

        let path = install_command(tool, &fixture.commands_dir())
            .expect("install")
            .expect("written");
        assert_eq!(path, fixture.commands_dir().join("review.md"));
        let contents = fs::read_to_string(path).expect("read");
        assert!(contents.starts_with("# review\n\n# Prompt review\n\n"));
        assert!(contents.contains("#   {{code}} (required) - Code to review"));
        assert!(contents.ends_with("Review {{code}} please."));
    }

    #[test]
    fn skips_prompts_without_body() {
        let fixture = ToolkitFixture::new()
            .with_file("prompts/bare/prompt.yaml", &yaml_tool("bare", "1.0.0"));
        let catalog = fixture.catalog();
        let tool = catalog.get("bare").expect("tool");
        assert_eq!(install_command(tool, &fixture.commands_dir()).expect("install"), None);
        assert!(!fixture.commands_dir().join("bare.md").exists());
    }

    #[test]
    fn definition_broken_after_scan_is_reported_as_invalid() {
        let fixture = ToolkitFixture::new()
            .with_file("prompts/bare/prompt.yaml", &yaml_tool("bare", "1.0.0"));
        let catalog = fixture.catalog();
        let tool = catalog.get("bare").expect("tool");
        let definition = tool.path.join("prompt.yaml");
        fs::write(&definition, "id: [unclosed\n").expect("write");

        let error = install_command(tool, &fixture.commands_dir()).expect_err("invalid");
        assert!(
            matches!(error, Error::DefinitionInvalid { ref path, .. } if *path == definition),
            "{error:?}"
        );
    }
}

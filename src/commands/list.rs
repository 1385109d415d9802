//! Implementation of the `hit list` command.

use crate::{
    commands::{GlobalArgs, plural, type_rank},
    diagnostics::Diagnostics,
    error::Result,
    palette::{fmt_description, fmt_heading, fmt_tool_ref, fmt_version},
    paths::display_path,
    registry::{InstalledTool, RegistryStore},
    tool::ToolType,
};

/// Execute the list command.
pub async fn run(globals: GlobalArgs) -> Result<()> {
    let mut diagnostics = Diagnostics::new(globals.verbose);
    let store = RegistryStore::open_default()?;
    let installed = store.list();

    if installed.is_empty() {
        diagnostics.warn("No tools installed yet");
        println!("Use `hit search` to find tools.");
        println!("Use `hit install <type>/<id>` to install a tool.");
        return Ok(());
    }

    print!("{}", render_installed(&installed, globals.color.enabled()));
    Ok(())
}

/// Group installed tools by type: known types in type order, unknown types last.
fn group_by_type(installed: &[InstalledTool]) -> Vec<(String, Vec<&InstalledTool>)> {
    let mut groups: Vec<(String, Vec<&InstalledTool>)> = Vec::new();
    for entry in installed {
        match groups.iter_mut().find(|(kind, _)| *kind == entry.tool_type) {
            Some((_, entries)) => entries.push(entry),
            None => groups.push((entry.tool_type.clone(), vec![entry])),
        }
    }
    groups.sort_by_key(|(kind, _)| type_rank(kind));
    groups
}

/// Return the heading for a stored type name.
fn type_label(kind: &str) -> String {
    ToolType::from_name(kind).map_or_else(|| kind.to_string(), |kind| kind.label().to_string())
}

/// Render the grouped list with a closing total.
fn render_installed(installed: &[InstalledTool], use_color: bool) -> String {
    let mut output = String::new();
    for (kind, entries) in group_by_type(installed) {
        let heading = format!("{}:", type_label(&kind));
        output.push_str(&fmt_heading(&heading, use_color));
        output.push('\n');
        for entry in entries {
            output.push_str(&format!(
                "  {} {}\n",
                fmt_tool_ref(&entry.id, use_color),
                fmt_version(&format!("v{}", entry.version), use_color)
            ));
            let location = format!("Installed at: {}", display_path(&entry.installed_path));
            output.push_str(&format!("    {}\n", fmt_description(&location, use_color)));
        }
        output.push('\n');
    }
    output.push_str(&format!(
        "Total: {} tool{} installed\n",
        installed.len(),
        plural(installed.len())
    ));
    output
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Utc;

    use super::{group_by_type, render_installed, type_label};
    use crate::registry::InstalledTool;

    fn entry(id: &str, kind: &str) -> InstalledTool {
        InstalledTool {
            id: id.to_string(),
            name: id.to_string(),
            version: "1.0.0".to_string(),
            tool_type: kind.to_string(),
            installed_path: PathBuf::from(format!("/tools/{id}")),
            installed_at: Utc::now(),
        }
    }

    #[test]
    fn groups_in_type_order_with_unknown_last() {
        let installed = vec![
            entry("a", "agent"),
            entry("w", "workflow"),
            entry("p", "prompt"),
            entry("b", "agent"),
        ];
        let groups = group_by_type(&installed);
        let kinds: Vec<_> = groups.iter().map(|(kind, entries)| (kind.as_str(), entries.len())).collect();
        assert_eq!(kinds, vec![("prompt", 1), ("agent", 2), ("workflow", 1)]);
    }

    #[test]
    fn labels_known_and_unknown_types() {
        assert_eq!(type_label("context-pack"), "Context Packs");
        assert_eq!(type_label("workflow"), "workflow");
    }

    #[test]
    fn renders_entries_and_total() {
        let output = render_installed(&[entry("review", "prompt")], false);
        assert_eq!(
            output,
            "Prompts:\n  review v1.0.0\n    Installed at: /tools/review\n\nTotal: 1 tool installed\n"
        );
    }
}

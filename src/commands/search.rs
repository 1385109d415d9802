//! Implementation of the `hit search` command.

use textwrap::Options;

use crate::{
    commands::{GlobalArgs, plural},
    diagnostics::Diagnostics,
    error::Result,
    palette::{fmt_description, fmt_heading, fmt_label, fmt_success, fmt_tool_ref, fmt_version},
    registry::{Registry, RegistryStore},
    tool::Tool,
};

/// Indent for the lines under each result.
const DETAIL_INDENT: &str = "   ";

/// Column at which descriptions wrap.
const WRAP_WIDTH: usize = 80;

/// Execute the search command.
pub async fn run(globals: GlobalArgs, query: Option<String>) -> Result<()> {
    let mut diagnostics = Diagnostics::new(globals.verbose);
    let (_, catalog) = globals.catalog(&mut diagnostics)?;
    let use_color = globals.color.enabled();

    let query = query.filter(|query| !query.trim().is_empty());
    let results = catalog.search(query.as_deref());
    if results.is_empty() {
        match &query {
            Some(query) => diagnostics.warn(format!("No tools found matching \"{query}\"")),
            None => diagnostics.warn(format!(
                "No tools found in toolkit {}",
                catalog.root.display()
            )),
        }
        diagnostics.print_skipped_summary();
        return Ok(());
    }

    let heading = format!("Found {} tool{}:", results.len(), plural(results.len()));
    println!("{}", fmt_heading(&heading, use_color));
    println!();
    let registry = RegistryStore::open_default()?.load();
    print!("{}", render_results(&results, &registry, use_color));
    println!("Use `hit install <type>/<id>` to install a tool.");

    if globals.verbose {
        diagnostics.print_skipped_summary();
    }
    Ok(())
}

/// Render numbered search results, marking tools already in the registry.
fn render_results(tools: &[&Tool], registry: &Registry, use_color: bool) -> String {
    let wrap = Options::new(WRAP_WIDTH)
        .initial_indent(DETAIL_INDENT)
        .subsequent_indent(DETAIL_INDENT);
    let mut output = String::new();
    for (index, tool) in tools.iter().enumerate() {
        let marker = if registry.is_installed(&tool.id) {
            format!(" {}", fmt_success("(installed)", use_color))
        } else {
            String::new()
        };
        output.push_str(&format!(
            "{}. {}{marker}\n",
            index + 1,
            fmt_tool_ref(&tool.reference(), use_color)
        ));
        if !tool.description.is_empty() {
            for line in textwrap::wrap(&tool.description, &wrap) {
                output.push_str(&fmt_description(&line, use_color));
                output.push('\n');
            }
        }
        output.push_str(&format!(
            "{DETAIL_INDENT}{} {}\n",
            fmt_label("Version:", use_color),
            fmt_version(&tool.version, use_color)
        ));
        if !tool.tags().is_empty() {
            output.push_str(&format!(
                "{DETAIL_INDENT}{} {}\n",
                fmt_label("Tags:", use_color),
                tool.tags().join(", ")
            ));
        }
        output.push('\n');
    }
    output
}

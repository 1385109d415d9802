//! Implementation of the `hit stats` command.
//!
//! Only installation data is reported; usage tracking does not exist.

use chrono::{DateTime, Utc};

use crate::{
    commands::{GlobalArgs, plural, type_rank},
    diagnostics::Diagnostics,
    error::Result,
    palette::{fmt_description, fmt_heading, fmt_label, fmt_tool_ref},
    paths::display_path,
    registry::{InstalledTool, RegistryStore},
};

/// Number of recent installs shown in the overview.
const RECENT_LIMIT: usize = 3;

/// Note printed after every report.
const USAGE_NOTE: &str = "Note: usage tracking is not implemented. This shows installation data only.";

/// Execute the stats command.
pub async fn run(globals: GlobalArgs, tool: Option<String>) -> Result<()> {
    let mut diagnostics = Diagnostics::new(globals.verbose);
    let store = RegistryStore::open_default()?;
    let installed = store.list();
    let use_color = globals.color.enabled();

    let report = match tool {
        Some(id) => match installed.iter().find(|entry| entry.id == id) {
            Some(entry) => render_tool(entry, use_color),
            None => {
                diagnostics.warn(format!("Tool \"{id}\" not found in installed tools"));
                println!("Use `hit list` to see installed tools.");
                return Ok(());
            }
        },
        None if installed.is_empty() => {
            diagnostics.warn("No tools installed yet");
            println!("Use `hit search` to find tools.");
            return Ok(());
        }
        None => render_overview(&installed, Utc::now(), use_color),
    };

    print!("{report}");
    println!();
    println!("{}", fmt_description(USAGE_NOTE, use_color));
    Ok(())
}

/// Render details for one installed tool.
fn render_tool(entry: &InstalledTool, use_color: bool) -> String {
    let rows = [
        ("ID:", entry.id.clone()),
        ("Type:", entry.tool_type.clone()),
        ("Version:", entry.version.clone()),
        ("Installed:", entry.installed_at.format("%Y-%m-%d").to_string()),
        ("Path:", display_path(&entry.installed_path)),
    ];
    let mut output = format!("{}\n", fmt_heading(&format!("Stats for {}:", entry.name), use_color));
    for (label, value) in rows {
        output.push_str(&format!("  {} {value}\n", fmt_label(label, use_color)));
    }
    output
}

/// Render totals, per-type counts, and the most recent installs.
fn render_overview(installed: &[InstalledTool], now: DateTime<Utc>, use_color: bool) -> String {
    let mut output = format!(
        "{} {}\n\n",
        fmt_label("Tools installed:", use_color),
        installed.len()
    );

    output.push_str(&fmt_heading("By type:", use_color));
    output.push('\n');
    for (kind, count) in count_by_type(installed) {
        output.push_str(&format!("  {kind}: {count}\n"));
    }

    let mut recent: Vec<&InstalledTool> = installed.iter().collect();
    recent.sort_by(|a, b| b.installed_at.cmp(&a.installed_at));
    output.push('\n');
    output.push_str(&fmt_heading("Recently installed:", use_color));
    output.push('\n');
    for (index, entry) in recent.into_iter().take(RECENT_LIMIT).enumerate() {
        output.push_str(&format!(
            "  {}. {} ({})\n",
            index + 1,
            fmt_tool_ref(&entry.id, use_color),
            relative_age(entry.installed_at, now)
        ));
    }
    output
}

/// Count installs per stored type, known types first in type order.
fn count_by_type(installed: &[InstalledTool]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entry in installed {
        match counts.iter_mut().find(|(kind, _)| *kind == entry.tool_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.tool_type.clone(), 1)),
        }
    }
    counts.sort_by_key(|(kind, _)| type_rank(kind));
    counts
}

/// Describe how long ago something happened in whole days.
fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - then).num_days().max(0);
    match days {
        0 => "today".to_string(),
        days => {
            let days = usize::try_from(days).unwrap_or(usize::MAX);
            format!("{days} day{} ago", plural(days))
        }
    }
}

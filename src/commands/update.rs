//! Implementation of the `hit update` command.
//!
//! An update backs up the installed copy (unless disabled), replaces it with
//! the catalog copy, and re-registers it. There is no rollback: a failure
//! after removal leaves the install incomplete, and the backup is the only
//! way back.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    commands::{GlobalArgs, confirm, plural},
    diagnostics::Diagnostics,
    diff::{colorize_diff, definition_diff},
    error::{Error, Result},
    files::{backup_directory, copy_directory, remove_directory},
    palette::{fmt_heading, fmt_success, fmt_tool_ref, fmt_version},
    paths::display_path,
    registry::{InstalledTool, RegistryStore},
    tool::ToolRef,
    updates::{UpdateCandidate, find_updates},
};

/// Command-line options for update.
#[derive(Debug, Clone, Default)]
pub struct UpdateArgs {
    /// Optional `<type>/<id>` to limit the update to.
    pub(crate) tool: Option<String>,
    /// Update every installed tool.
    pub(crate) all: bool,
    /// Only report available updates.
    pub(crate) check: bool,
    /// Skip the confirmation prompt.
    pub(crate) force: bool,
    /// Do not back up installed copies.
    pub(crate) no_backup: bool,
    /// Show definition diffs before applying.
    pub(crate) diff: bool,
}

impl UpdateArgs {
    /// Return true when updates should only be reported.
    fn report_only(&self) -> bool {
        self.check || (self.tool.is_none() && !self.all)
    }
}

/// Execute the update command.
pub async fn run(globals: GlobalArgs, args: UpdateArgs) -> Result<()> {
    let mut diagnostics = Diagnostics::new(globals.verbose);
    let reference = args.tool.as_deref().map(str::parse::<ToolRef>).transpose()?;
    let store = RegistryStore::open_default()?;
    let installed = select_installed(&store, reference.as_ref())?;
    let use_color = globals.color.enabled();

    if installed.is_empty() {
        println!("No tools installed yet. Use `hit install <type>/<id>` to install a tool.");
        return Ok(());
    }

    let (_, catalog) = globals.catalog(&mut diagnostics)?;
    let candidates = find_updates(&installed, &catalog, &mut diagnostics);
    if candidates.is_empty() {
        println!("{}", fmt_success("All installed tools are up to date.", use_color));
        diagnostics.print_warning_summary();
        return Ok(());
    }

    let heading = format!(
        "{} update{} available:",
        candidates.len(),
        plural(candidates.len())
    );
    println!("{}", fmt_heading(&heading, use_color));
    for candidate in &candidates {
        println!("{}", describe(candidate, use_color));
    }
    println!();

    if args.diff {
        for candidate in &candidates {
            if let Some(diff) = definition_diff(&candidate.installed_path, &candidate.source_path) {
                print!("{}", colorize_diff(&diff, use_color));
            }
        }
        println!();
    }

    if args.report_only() {
        if !args.check {
            println!("Run `hit update --all` to apply, or `hit update <type>/<id>` for one tool.");
        }
        diagnostics.print_warning_summary();
        return Ok(());
    }

    if !args.force {
        let question = format!("Update {} tool{}?", candidates.len(), plural(candidates.len()));
        if !confirm(&question, true)? {
            println!("Update canceled.");
            return Ok(());
        }
    }

    let backup = !args.no_backup;
    for candidate in &candidates {
        let backup_path = apply_update(&store, candidate, backup, Utc::now())?;
        let message = format!(
            "Updated {} to v{}",
            candidate.id, candidate.latest_version
        );
        println!("{}", fmt_success(&message, use_color));
        if let Some(path) = backup_path {
            println!("  Backup: {}", display_path(&path));
        }
    }

    diagnostics.print_warning_summary();
    Ok(())
}

/// Return the installed tools to check, limited to the entry matching a reference's type and id.
fn select_installed(store: &RegistryStore, reference: Option<&ToolRef>) -> Result<Vec<InstalledTool>> {
    let Some(reference) = reference else {
        return Ok(store.list());
    };
    store
        .get(&reference.id)
        .filter(|entry| entry.tool_type() == Some(reference.tool_type))
        .map(|entry| vec![entry])
        .ok_or_else(|| Error::NotInstalled {
            id: reference.to_string(),
        })
}

/// One-line summary of an available update.
fn describe(candidate: &UpdateCandidate, use_color: bool) -> String {
    format!(
        "  {} {} -> {}",
        fmt_tool_ref(&format!("{}/{}", candidate.tool_type, candidate.id), use_color),
        fmt_version(&candidate.current_version, use_color),
        fmt_version(&candidate.latest_version, use_color)
    )
}

/// Replace an installed copy with the catalog copy and re-register it.
///
/// Returns the backup location when a backup was taken.
fn apply_update(
    store: &RegistryStore,
    candidate: &UpdateCandidate,
    backup: bool,
    now: DateTime<Utc>,
) -> Result<Option<PathBuf>> {
    let installed = &candidate.installed_path;
    let backup_path = if backup && installed.exists() {
        Some(backup_directory(installed, now)?)
    } else {
        None
    };

    remove_directory(installed)?;
    copy_directory(&candidate.source_path, installed)?;
    store.register(InstalledTool {
        id: candidate.id.clone(),
        name: candidate.name.clone(),
        version: candidate.latest_version.clone(),
        tool_type: candidate.tool_type.id().to_string(),
        installed_path: installed.clone(),
        installed_at: now,
    })?;
    info!(id = %candidate.id, version = %candidate.latest_version, "updated tool");
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{TimeZone, Utc};

    use super::{UpdateArgs, apply_update, describe, select_installed};
    use crate::{
        diagnostics::Diagnostics,
        error::Error,
        files::copy_directory,
        registry::InstalledTool,
        testutil::ToolkitFixture,
        tool::ToolType,
        updates::find_updates,
    };

    /// Install `x` at 1.0.0 by hand, then bump the catalog copy to 1.2.0.
    fn outdated_fixture() -> ToolkitFixture {
        let fixture = ToolkitFixture::new().with_tool(ToolType::Prompt, "x", "1.0.0");
        let installed = fixture.install_root().join("x");
        copy_directory(&fixture.root().join("prompts/x"), &installed).expect("copy");
        fs::write(installed.join("notes.txt"), "local edits").expect("write");
        fixture
            .registry()
            .register(InstalledTool {
                id: "x".to_string(),
                name: "x".to_string(),
                version: "1.0.0".to_string(),
                tool_type: "prompt".to_string(),
                installed_path: installed,
                installed_at: Utc::now(),
            })
            .expect("register");
        fixture.with_tool(ToolType::Prompt, "x", "1.2.0")
    }

    #[test]
    fn report_only_without_target() {
        assert!(UpdateArgs::default().report_only());
        let all = UpdateArgs {
            all: true,
            ..UpdateArgs::default()
        };
        assert!(!all.report_only());
        let check = UpdateArgs {
            tool: Some("prompt/x".to_string()),
            check: true,
            ..UpdateArgs::default()
        };
        assert!(check.report_only());
    }

    #[test]
    fn selecting_uninstalled_tool_fails() {
        let fixture = ToolkitFixture::new();
        let reference = "prompt/x".parse().expect("reference");
        let error = select_installed(&fixture.registry(), Some(&reference)).expect_err("missing");
        assert!(matches!(error, Error::NotInstalled { .. }));
        assert!(select_installed(&fixture.registry(), None).expect("all").is_empty());
    }

    #[test]
    fn selection_requires_matching_type() {
        let fixture = outdated_fixture();
        let store = fixture.registry();
        let prompt = "prompt/x".parse().expect("reference");
        assert_eq!(select_installed(&store, Some(&prompt)).expect("prompt").len(), 1);

        let agent = "agent/x".parse().expect("reference");
        let error = select_installed(&store, Some(&agent)).expect_err("wrong type");
        assert!(matches!(error, Error::NotInstalled { ref id } if id == "agent/x"));
    }

    #[test]
    fn applies_update_with_backup() {
        let fixture = outdated_fixture();
        let store = fixture.registry();
        let candidates = find_updates(&store.list(), &fixture.catalog(), &mut Diagnostics::new(false));
        assert_eq!(candidates.len(), 1);
        assert_eq!(describe(&candidates[0], false), "  prompt/x 1.0.0 -> 1.2.0");

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).single().expect("time");
        let backup = apply_update(&store, &candidates[0], true, now)
            .expect("update")
            .expect("backup");

        let installed = fixture.install_root().join("x");
        assert_eq!(backup, fixture.install_root().join("x.backup-20240601093000"));
        assert!(backup.join("notes.txt").is_file());
        assert!(!installed.join("notes.txt").exists());
        let definition = fs::read_to_string(installed.join("prompt.yaml")).expect("read");
        assert!(definition.contains("version: 1.2.0"));

        let entry = store.get("x").expect("entry");
        assert_eq!(entry.version, "1.2.0");
        assert_eq!(entry.installed_at, now);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn applies_update_without_backup() {
        let fixture = outdated_fixture();
        let store = fixture.registry();
        let candidates = find_updates(&store.list(), &fixture.catalog(), &mut Diagnostics::new(false));
        let backup = apply_update(&store, &candidates[0], false, Utc::now()).expect("update");
        assert_eq!(backup, None);
        assert!(fixture.install_root().join("x/prompt.yaml").is_file());
    }
}

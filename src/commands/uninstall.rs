//! Implementation of the `hit uninstall` command.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    commands::{GlobalArgs, confirm},
    error::{Error, Result},
    files::remove_directory,
    palette::{fmt_success, fmt_tool_ref},
    paths::{self, display_path},
    registry::{InstalledTool, RegistryStore},
    tool::{ToolRef, ToolType},
};

/// Command-line options for uninstall.
#[derive(Debug, Clone, Default)]
pub struct UninstallArgs {
    /// `<type>/<id>` reference.
    pub(crate) tool: String,
    /// Skip the confirmation prompt.
    pub(crate) force: bool,
}

/// What an uninstall removed.
#[derive(Debug)]
struct Removal {
    /// Registry entry that was dropped.
    entry: InstalledTool,
    /// Slash command file that was deleted, if any.
    command: Option<PathBuf>,
}

/// Execute the uninstall command.
pub async fn run(globals: GlobalArgs, args: UninstallArgs) -> Result<()> {
    let reference: ToolRef = args.tool.parse()?;
    let store = RegistryStore::open_default()?;
    let use_color = globals.color.enabled();

    let entry = find_installed(&store, &reference)?;
    if !args.force {
        let question = format!(
            "Remove {} from {}?",
            reference,
            display_path(&entry.installed_path)
        );
        if !confirm(&question, false)? {
            println!("Uninstall canceled.");
            return Ok(());
        }
    }

    let removal = uninstall_tool(&store, entry, &paths::claude_commands_dir()?)?;
    let message = format!(
        "Uninstalled {} v{}",
        fmt_tool_ref(&reference.to_string(), use_color),
        removal.entry.version
    );
    println!("{}", fmt_success(&message, use_color));
    if let Some(command) = removal.command {
        println!("  Removed slash command {}", display_path(&command));
    }
    Ok(())
}

/// Return the registry entry matching both the type and id of a reference.
fn find_installed(store: &RegistryStore, reference: &ToolRef) -> Result<InstalledTool> {
    store
        .get(&reference.id)
        .filter(|entry| entry.tool_type() == Some(reference.tool_type))
        .ok_or_else(|| Error::NotInstalled {
            id: reference.to_string(),
        })
}

/// Delete the installed copy and its slash command, then unregister it.
fn uninstall_tool(store: &RegistryStore, entry: InstalledTool, commands_dir: &Path) -> Result<Removal> {
    remove_directory(&entry.installed_path)?;
    let command = if entry.tool_type() == Some(ToolType::Prompt) {
        remove_command(&commands_dir.join(format!("{}.md", entry.id)))?
    } else {
        None
    };
    store.unregister(&entry.id)?;
    info!(id = %entry.id, "uninstalled tool");
    Ok(Removal { entry, command })
}

/// Remove a slash command file, returning its path when it existed.
fn remove_command(path: &Path) -> Result<Option<PathBuf>> {
    match fs::remove_file(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::RemoveFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::Utc;

    use super::{find_installed, uninstall_tool};
    use crate::{
        error::Error,
        files::copy_directory,
        registry::InstalledTool,
        testutil::ToolkitFixture,
        tool::{ToolRef, ToolType},
    };

    /// Install a tool by hand and return its registry entry.
    fn install(fixture: &ToolkitFixture, tool_type: ToolType, id: &str) -> InstalledTool {
        let installed = fixture.install_root().join(id);
        let source = fixture.root().join(tool_type.dir_name()).join(id);
        copy_directory(&source, &installed).expect("copy");
        let entry = InstalledTool {
            id: id.to_string(),
            name: id.to_string(),
            version: "1.0.0".to_string(),
            tool_type: tool_type.id().to_string(),
            installed_path: installed,
            installed_at: Utc::now(),
        };
        fixture.registry().register(entry.clone()).expect("register");
        entry
    }

    fn reference(value: &str) -> ToolRef {
        value.parse().expect("reference")
    }

    #[test]
    fn lookup_requires_matching_type() {
        let fixture = ToolkitFixture::new().with_tool(ToolType::Agent, "bot", "1.0.0");
        install(&fixture, ToolType::Agent, "bot");
        let store = fixture.registry();

        assert!(find_installed(&store, &reference("agent/bot")).is_ok());
        for value in ["prompt/bot", "agent/other"] {
            let error = find_installed(&store, &reference(value)).expect_err("mismatch");
            assert!(matches!(error, Error::NotInstalled { .. }), "{value}");
        }
    }

    #[test]
    fn removes_prompt_directory_command_and_entry() {
        let fixture = ToolkitFixture::new().with_tool(ToolType::Prompt, "review", "1.0.0");
        let entry = install(&fixture, ToolType::Prompt, "review");
        let commands_dir = fixture.commands_dir();
        fs::create_dir_all(&commands_dir).expect("mkdir");
        fs::write(commands_dir.join("review.md"), "# review\n").expect("write");

        let removal = uninstall_tool(&fixture.registry(), entry, &commands_dir).expect("uninstall");

        assert_eq!(removal.command, Some(commands_dir.join("review.md")));
        assert_eq!(removal.entry.id, "review");
        assert!(!fixture.install_root().join("review").exists());
        assert!(!commands_dir.join("review.md").exists());
        assert!(fixture.registry().list().is_empty());
    }

    #[test]
    fn tolerates_missing_directory_and_command() {
        let fixture = ToolkitFixture::new().with_tool(ToolType::Agent, "bot", "1.0.0");
        let entry = install(&fixture, ToolType::Agent, "bot");
        fs::remove_dir_all(&entry.installed_path).expect("remove");

        let removal =
            uninstall_tool(&fixture.registry(), entry, &fixture.commands_dir()).expect("uninstall");
        assert_eq!(removal.command, None);
        assert!(fixture.registry().get("bot").is_none());
    }
}

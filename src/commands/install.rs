//! Implementation of the `hit install` command.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::{
    catalog::Catalog,
    commands::{GlobalArgs, current_dir, plural},
    config::Config,
    diagnostics::Diagnostics,
    error::{Error, Result},
    files::{copy_directory, remove_directory},
    palette::{fmt_label, fmt_path, fmt_success, fmt_tool_ref},
    paths::{self, display_path},
    registry::{InstalledTool, RegistryStore},
    slash,
    tool::{ToolRef, ToolType},
};

/// Install root used when neither `--path` nor config sets one.
const DEFAULT_INSTALL_DIR: [&str; 2] = [".claude", "tools"];

/// Command-line options for install.
#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    /// `<type>/<id>` reference.
    pub(crate) tool: String,
    /// Install root override.
    pub(crate) path: Option<PathBuf>,
    /// Reinstall over existing installs.
    pub(crate) force: bool,
    /// Skip writing a Claude slash command.
    pub(crate) no_claude_command: bool,
}

/// Result of an install attempt.
#[derive(Debug)]
enum InstallOutcome {
    /// The tool was already registered and `--force` was not given.
    AlreadyInstalled(InstalledTool),
    /// The tool was copied and registered.
    Installed {
        /// New registry entry.
        entry: InstalledTool,
        /// Number of files copied.
        files: usize,
        /// Slash command written for prompts.
        command: Option<PathBuf>,
    },
}

/// Execute the install command.
pub async fn run(globals: GlobalArgs, args: InstallArgs) -> Result<()> {
    let mut diagnostics = Diagnostics::new(globals.verbose);
    let reference: ToolRef = args.tool.parse()?;
    let (config, catalog) = globals.catalog(&mut diagnostics)?;
    let store = RegistryStore::open_default()?;
    let install_root = resolve_install_root(args.path.as_deref(), &config, &current_dir())?;
    let commands_dir = if args.no_claude_command {
        None
    } else {
        Some(paths::claude_commands_dir()?)
    };
    let use_color = globals.color.enabled();

    let outcome = install_tool(
        &catalog,
        &store,
        &reference,
        &install_root,
        args.force,
        commands_dir.as_deref(),
        &mut diagnostics,
    )?;

    match outcome {
        InstallOutcome::AlreadyInstalled(entry) => {
            println!(
                "{} is already installed at {}.",
                fmt_tool_ref(&reference.to_string(), use_color),
                fmt_path(&display_path(&entry.installed_path), use_color)
            );
            println!("Use --force to reinstall, or `hit update` to upgrade.");
        }
        InstallOutcome::Installed {
            entry,
            files,
            command,
        } => {
            let message = format!("Installed {} v{}", reference, entry.version);
            println!("{}", fmt_success(&message, use_color));
            println!(
                "  {} {} ({files} file{})",
                fmt_label("Installed to:", use_color),
                fmt_path(&display_path(&entry.installed_path), use_color),
                plural(files)
            );
            if let Some(command) = command {
                println!(
                    "  {} /{} ({})",
                    fmt_label("Slash command:", use_color),
                    entry.id,
                    display_path(&command)
                );
            }
            println!("Run `hit list` to see all installed tools.");
        }
    }

    diagnostics.print_warning_summary();
    Ok(())
}

/// Resolve the install root: explicit path, then config, then `./.claude/tools`.
fn resolve_install_root(explicit: Option<&Path>, config: &Config, cwd: &Path) -> Result<PathBuf> {
    if let Some(explicit) = explicit {
        return paths::expand_path(&explicit.to_string_lossy(), cwd);
    }
    if let Some(configured) = config.install_dir() {
        return Ok(configured.to_path_buf());
    }
    Ok(DEFAULT_INSTALL_DIR
        .iter()
        .fold(cwd.to_path_buf(), |path, part| path.join(part)))
}

/// Copy a catalog tool into `<install_root>/<id>` and register it.
///
/// Slash command failures are warnings; the install itself still succeeds.
fn install_tool(
    catalog: &Catalog,
    store: &RegistryStore,
    reference: &ToolRef,
    install_root: &Path,
    force: bool,
    commands_dir: Option<&Path>,
    diagnostics: &mut Diagnostics,
) -> Result<InstallOutcome> {
    let tool = catalog
        .find(reference.tool_type, &reference.id)
        .ok_or_else(|| Error::ToolNotFound {
            id: reference.to_string(),
        })?;

    if !force && let Some(existing) = store.get(&tool.id) {
        diagnostics.warn(format!("{reference} is already installed"));
        return Ok(InstallOutcome::AlreadyInstalled(existing));
    }

    let destination = install_root.join(&tool.id);
    if destination.exists() {
        if !force {
            return Err(Error::PathExists { path: destination });
        }
        remove_directory(&destination)?;
    }

    let files = copy_directory(&tool.path, &destination)?;
    debug!(from = %tool.path.display(), to = %destination.display(), files, "copied tool");
    let entry = InstalledTool::from_tool(tool, destination, Utc::now());
    store.register(entry.clone())?;

    let command = match commands_dir {
        Some(dir) if tool.tool_type == ToolType::Prompt => {
            match slash::install_command(tool, dir) {
                Ok(command) => command,
                Err(error) => {
                    diagnostics.warn(format!("Could not create slash command: {error}"));
                    None
                }
            }
        }
        _ => None,
    };

    Ok(InstallOutcome::Installed {
        entry,
        files,
        command,
    })
}

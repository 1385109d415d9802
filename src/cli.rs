//! CLI parsing and command dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    commands::{
        self, GlobalArgs, contribute::ContributeArgs, install::InstallArgs,
        uninstall::UninstallArgs, update::UpdateArgs,
    },
    error::Result,
    logging,
};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "hit",
    version,
    about = "Search, install, and update Human-in-the-Loop AI tools"
)]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,
    /// Enable verbose output.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    /// Toolkit root to scan instead of the configured or detected one.
    #[arg(long, global = true, value_name = "DIR")]
    toolkit: Option<PathBuf>,
    /// Command to execute (defaults to list).
    #[command(subcommand)]
    command: Option<Command>,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a tool and open a contribution issue.
    Contribute {
        /// Tool type (prompt, agent, evaluator, guardrail, context-pack, skill).
        tool_type: String,
        /// Definition file or tool directory.
        path: PathBuf,
        /// Run the checks without opening an issue.
        #[arg(long, short = 'n')]
        dry_run: bool,
    },
    /// Check the local environment, toolkit, and registry.
    Doctor,
    /// Install a tool from the toolkit.
    #[command(alias = "add")]
    Install {
        /// Tool to install, as <type>/<id>.
        tool: String,
        /// Install root (defaults to ./.claude/tools).
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
        /// Reinstall over an existing install.
        #[arg(long, short = 'f')]
        force: bool,
        /// Do not create a Claude slash command for prompts.
        #[arg(long)]
        no_claude_command: bool,
    },
    /// List installed tools.
    #[command(alias = "ls")]
    List,
    /// Search the toolkit.
    #[command(alias = "find")]
    Search {
        /// Text to match against id, name, description, category, and tags.
        query: Option<String>,
    },
    /// Show installation statistics.
    Stats {
        /// Limit output to one installed tool id.
        #[arg(long)]
        tool: Option<String>,
    },
    /// Remove an installed tool.
    #[command(alias = "rm")]
    Uninstall {
        /// Tool to remove, as <type>/<id>.
        tool: String,
        /// Remove without prompting.
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Check for and apply tool updates.
    Update {
        /// Tool to update, as <type>/<id>.
        tool: Option<String>,
        /// Update every installed tool.
        #[arg(long, conflicts_with = "tool")]
        all: bool,
        /// Only report available updates.
        #[arg(long)]
        check: bool,
        /// Apply without prompting.
        #[arg(long, short = 'f')]
        force: bool,
        /// Do not back up installed copies.
        #[arg(long)]
        no_backup: bool,
        /// Show definition diffs for available updates.
        #[arg(long)]
        diff: bool,
    },
}

/// Run the requested command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let globals = GlobalArgs {
        color: cli.color.into_choice(),
        verbose: cli.verbose,
        toolkit: cli.toolkit,
    };

    // Match arms are ordered alphabetically - maintain this order.
    match cli.command.unwrap_or(Command::List) {
        Command::Contribute {
            tool_type,
            path,
            dry_run,
        } => {
            let args = ContributeArgs {
                tool_type,
                path,
                dry_run,
            };
            commands::contribute::run(globals, args).await
        }
        Command::Doctor => commands::doctor::run(globals).await,
        Command::Install {
            tool,
            path,
            force,
            no_claude_command,
        } => {
            let args = InstallArgs {
                tool,
                path,
                force,
                no_claude_command,
            };
            commands::install::run(globals, args).await
        }
        Command::List => commands::list::run(globals).await,
        Command::Search { query } => commands::search::run(globals, query).await,
        Command::Stats { tool } => commands::stats::run(globals, tool).await,
        Command::Uninstall { tool, force } => {
            commands::uninstall::run(globals, UninstallArgs { tool, force }).await
        }
        Command::Update {
            tool,
            all,
            check,
            force,
            no_backup,
            diff,
        } => {
            let args = UpdateArgs {
                tool,
                all,
                check,
                force,
                no_backup,
                diff,
            };
            commands::update::run(globals, args).await
        }
    }
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}

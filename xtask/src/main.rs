//! Developer workflow tasks for the hit workspace.
//!
//! `cargo xtask tidy` formats and applies clippy fixes in place.
//! `cargo xtask check` verifies formatting, lints, and tests without writing.

use std::{
    env,
    path::Path,
    process::{Command, ExitCode, Stdio},
};

/// Optional nightly rustfmt configuration.
const NIGHTLY_FMT_CONFIG: &str = "rustfmt-nightly.toml";

fn main() -> ExitCode {
    let Some(task) = parse_command() else {
        eprintln!("Usage: cargo xtask <tidy|check>");
        return ExitCode::from(2);
    };
    for (program, args) in task.steps() {
        if !run_command(program, &args) {
            return ExitCode::from(1);
        }
    }
    ExitCode::SUCCESS
}

enum Task {
    Tidy,
    Check,
}

impl Task {
    /// Commands to run, in order; the first failure stops the task.
    fn steps(&self) -> Vec<(&'static str, Vec<&'static str>)> {
        match self {
            Self::Tidy => vec![
                ("cargo", fmt_args(false)),
                (
                    "cargo",
                    vec![
                        "clippy",
                        "-q",
                        "--fix",
                        "--all",
                        "--all-targets",
                        "--all-features",
                        "--allow-dirty",
                    ],
                ),
            ],
            Self::Check => vec![
                ("cargo", fmt_args(true)),
                (
                    "cargo",
                    vec!["clippy", "-q", "--all", "--all-targets", "--", "-D", "warnings"],
                ),
                ("cargo", vec!["test", "-q", "--all"]),
            ],
        }
    }
}

fn parse_command() -> Option<Task> {
    let mut args = env::args().skip(1);
    let task = match args.next().as_deref() {
        Some("tidy") => Task::Tidy,
        Some("check") => Task::Check,
        _ => return None,
    };
    args.next().is_none().then_some(task)
}

/// Nightly rustfmt arguments, using the nightly config when present.
fn fmt_args(check: bool) -> Vec<&'static str> {
    let mut args = vec!["+nightly", "fmt", "--all"];
    if check || Path::new(NIGHTLY_FMT_CONFIG).exists() {
        args.push("--");
    }
    if check {
        args.push("--check");
    }
    if Path::new(NIGHTLY_FMT_CONFIG).exists() {
        args.extend(["--config-path", NIGHTLY_FMT_CONFIG]);
    }
    args
}

fn run_command(program: &str, args: &[&str]) -> bool {
    match Command::new(program)
        .args(args)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            eprintln!("Command `{program} {}` failed with status {status}", args.join(" "));
            false
        }
        Err(err) => {
            eprintln!("Failed to run `{program}`: {err}");
            false
        }
    }
}

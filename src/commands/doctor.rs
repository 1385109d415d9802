//! Implementation of the `hit doctor` command.

use std::{
    path::Path,
    process::{Command, Stdio},
    sync::LazyLock,
};

use regex::Regex;
use tracing::debug;

use crate::{
    catalog::{Catalog, is_toolkit_dir},
    commands::{GlobalArgs, plural},
    diagnostics::Diagnostics,
    error::{Error, Result},
    palette::{fmt_description, fmt_error, fmt_heading, fmt_success, fmt_warning},
    paths::{self, display_path},
    registry::{InstalledTool, RegistryState, RegistryStore},
};

/// First `x.y.z` triple in a `--version` banner.
static VERSION_TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("version pattern is valid"));

/// Severity of a single doctor finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    /// The check passed.
    Ok,
    /// Something optional is missing or stale.
    Warning,
    /// The environment cannot work as configured.
    Error,
}

/// One line of doctor output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Finding {
    /// Severity.
    level: Level,
    /// What was checked.
    subject: String,
    /// Detail shown after the subject.
    detail: String,
}

impl Finding {
    /// Build a finding.
    fn new(level: Level, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level,
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}

/// A titled group of findings.
#[derive(Debug)]
struct Section {
    /// Heading printed above the findings.
    title: &'static str,
    /// Findings in print order.
    findings: Vec<Finding>,
}

/// Execute the doctor command.
pub async fn run(globals: GlobalArgs) -> Result<()> {
    let mut diagnostics = Diagnostics::new(globals.verbose);
    let use_color = globals.color.enabled();
    let (_, catalog) = globals.catalog(&mut diagnostics)?;
    let store = RegistryStore::open_default()?;
    let (registry_findings, installed) = check_registry(&store);

    let sections = [
        Section {
            title: "Version Control:",
            findings: vec![
                check_command("git", "git", "not found (recommended)"),
                check_command("gh", "GitHub CLI", "not found (needed for contribute)"),
            ],
        },
        Section {
            title: "Toolkit:",
            findings: check_toolkit(&catalog, &diagnostics),
        },
        Section {
            title: "Registry:",
            findings: registry_findings
                .into_iter()
                .chain(check_installed_paths(&installed))
                .collect(),
        },
        Section {
            title: "Claude:",
            findings: vec![check_claude_dir(&paths::claude_dir()?)],
        },
    ];

    print!("{}", render_sections(&sections, use_color));
    diagnostics.print_skipped_summary();

    let findings = || sections.iter().flat_map(|section| &section.findings);
    let errors = findings().filter(|f| f.level == Level::Error).count();
    let warnings = findings().filter(|f| f.level == Level::Warning).count();
    println!();
    if errors > 0 {
        println!("{}", fmt_error("Some critical checks failed.", use_color));
        return Err(Error::DoctorFailed { count: errors });
    }
    if warnings > 0 {
        let message = format!(
            "All critical checks passed, with {warnings} warning{}.",
            plural(warnings)
        );
        println!("{}", fmt_warning(&message, use_color));
    } else {
        println!("{}", fmt_success("All checks passed.", use_color));
    }
    Ok(())
}

/// Run a program with `--version`; a missing program is a warning.
fn check_command(program: &str, subject: &str, missing: &str) -> Finding {
    match detect_version(program) {
        Some(version) => Finding::new(Level::Ok, subject, version),
        None => Finding::new(Level::Warning, subject, missing),
    }
}

/// Run `<program> --version` and return its version, or `None` when it cannot run.
fn detect_version(program: &str) -> Option<String> {
    let output = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        debug!(program, status = %output.status, "version check failed");
        return None;
    }
    Some(extract_version(&String::from_utf8_lossy(&output.stdout)))
}

/// Pull the first `x.y.z` out of a version banner, else its first line.
fn extract_version(banner: &str) -> String {
    VERSION_TRIPLE.find(banner).map_or_else(
        || banner.lines().next().unwrap_or_default().trim().to_string(),
        |found| found.as_str().to_string(),
    )
}

/// Report the toolkit root, per-type counts, and skipped definitions.
fn check_toolkit(catalog: &Catalog, diagnostics: &Diagnostics) -> Vec<Finding> {
    let root = display_path(&catalog.root);
    if !is_toolkit_dir(&catalog.root) {
        return vec![Finding::new(
            Level::Error,
            "toolkit root",
            format!("{root} has no tool directories (set --toolkit or `toolkit` in config)"),
        )];
    }

    let mut findings = vec![Finding::new(Level::Ok, "toolkit root", root)];
    for (kind, count) in catalog.counts_by_type() {
        findings.push(Finding::new(Level::Ok, kind.label(), count.to_string()));
    }
    if catalog.tools.is_empty() {
        findings.push(Finding::new(Level::Warning, "tools", "none found"));
    }
    let skipped = diagnostics.skipped().len();
    if skipped > 0 {
        findings.push(Finding::new(
            Level::Warning,
            "skipped definitions",
            format!("{skipped} could not be parsed (see below)"),
        ));
    }
    findings
}

/// Report the registry file state and return its entries.
fn check_registry(store: &RegistryStore) -> (Vec<Finding>, Vec<InstalledTool>) {
    let path = display_path(store.path());
    match store.inspect() {
        RegistryState::Missing => (
            vec![Finding::new(
                Level::Warning,
                "registry.json",
                format!("{path} not found (created on first install)"),
            )],
            Vec::new(),
        ),
        RegistryState::Loaded(registry) => {
            let count = registry.installations.len();
            let finding = Finding::new(
                Level::Ok,
                "registry.json",
                format!("{path} ({count} tool{} installed)", plural(count)),
            );
            (vec![finding], registry.installations)
        }
        RegistryState::Unreadable(message) => (
            vec![Finding::new(
                Level::Error,
                "registry.json",
                format!("{path} is unreadable: {message}"),
            )],
            Vec::new(),
        ),
    }
}

/// Warn about registry entries whose install directory is gone.
fn check_installed_paths(installed: &[InstalledTool]) -> Vec<Finding> {
    installed
        .iter()
        .filter(|entry| !entry.installed_path.exists())
        .map(|entry| {
            Finding::new(
                Level::Warning,
                format!("{}/{}", entry.tool_type, entry.id),
                format!("missing at {}", display_path(&entry.installed_path)),
            )
        })
        .collect()
}

/// Report whether `~/.claude` exists.
fn check_claude_dir(path: &Path) -> Finding {
    if path.is_dir() {
        Finding::new(Level::Ok, ".claude directory", display_path(path))
    } else {
        Finding::new(
            Level::Warning,
            ".claude directory",
            "not found (slash commands create it on first prompt install)",
        )
    }
}

/// Render every section with a status marker per finding.
fn render_sections(sections: &[Section], use_color: bool) -> String {
    let mut output = String::new();
    for (index, section) in sections.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        output.push_str(&fmt_heading(section.title, use_color));
        output.push('\n');
        for finding in &section.findings {
            let marker = match finding.level {
                Level::Ok => fmt_success("ok", use_color),
                Level::Warning => fmt_warning("warn", use_color),
                Level::Error => fmt_error("error", use_color),
            };
            output.push_str(&format!(
                "  [{marker}] {} {}\n",
                finding.subject,
                fmt_description(&finding.detail, use_color)
            ));
        }
    }
    output
}

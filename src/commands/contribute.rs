//! Implementation of the `hit contribute` command.

use std::path::{Path, PathBuf};

use crate::{
    commands::{GlobalArgs, current_dir},
    contribution::{
        Contribution, ValidationReport, create_issue, issue_body, issue_title,
        validate_contribution,
    },
    error::Result,
    palette::{fmt_description, fmt_error, fmt_heading, fmt_success, fmt_warning},
    paths::{self, display_path},
    tool::ToolType,
};

/// Command-line options for contribute.
#[derive(Debug, Clone)]
pub struct ContributeArgs {
    /// Declared tool type.
    pub(crate) tool_type: String,
    /// Definition file or tool directory.
    pub(crate) path: PathBuf,
    /// Validate only; do not open an issue.
    pub(crate) dry_run: bool,
}

/// Execute the contribute command.
pub async fn run(globals: GlobalArgs, args: ContributeArgs) -> Result<()> {
    let use_color = globals.color.enabled();
    let tool_type: ToolType = args.tool_type.parse()?;
    let path = paths::expand_path(&args.path.to_string_lossy(), &current_dir())?;

    println!("Validating {}...", display_path(&path));
    if let Some(note) = type_mismatch(&path, tool_type) {
        println!("{}", fmt_description(&note, use_color));
    }

    let contribution = validate_contribution(&path, tool_type)?;
    println!("Checked {}", display_path(&contribution.definition_path));
    println!();
    print!("{}", render_report(&contribution, use_color));

    if args.dry_run {
        println!();
        println!("Dry run: no issue created.");
        return Ok(());
    }

    println!();
    println!("Creating GitHub issue...");
    let url = create_issue(&issue_title(&contribution), &issue_body(&contribution))?;
    println!("{}", fmt_success("Contribution issue created.", use_color));
    println!("  {url}");
    println!();
    println!("{}", fmt_heading("Next steps:", use_color));
    for (index, step) in next_steps(contribution.passed()).iter().enumerate() {
        println!("  {}. {step}", index + 1);
    }
    Ok(())
}

/// Describe a disagreement between the declared type and the path's type directory.
fn type_mismatch(path: &Path, declared: ToolType) -> Option<String> {
    ToolType::detect_from_path(path)
        .filter(|detected| *detected != declared)
        .map(|detected| format!("Detected type from path: {detected} (you specified: {declared})"))
}

/// Render pass/fail lines for each check group, then all warnings.
fn render_report(contribution: &Contribution, use_color: bool) -> String {
    let mut output = String::new();
    render_group(&mut output, "Definition", &contribution.definition, use_color);
    render_group(&mut output, "Documentation", &contribution.documentation, use_color);

    let warnings: Vec<&String> = contribution.warnings().collect();
    if !warnings.is_empty() {
        output.push('\n');
        output.push_str(&fmt_warning("Warnings:", use_color));
        output.push('\n');
        for warning in warnings {
            output.push_str(&format!("  - {warning}\n"));
        }
    }
    output
}

/// Render one check group and its errors.
fn render_group(output: &mut String, title: &str, report: &ValidationReport, use_color: bool) {
    if report.passed() {
        output.push_str(&fmt_success(&format!("{title} validation passed"), use_color));
        output.push('\n');
        return;
    }
    output.push_str(&fmt_error(&format!("{title} validation failed"), use_color));
    output.push('\n');
    for error in &report.errors {
        output.push_str(&format!("  - {error}\n"));
    }
}

/// Follow-up steps printed after the issue is opened.
fn next_steps(passed: bool) -> &'static [&'static str] {
    if passed {
        &[
            "Create a pull request with your changes",
            "Link the PR to the issue above",
            "Wait for review and address feedback",
        ]
    } else {
        &[
            "Fix the validation errors listed above",
            "Run `hit contribute <type> <path> --dry-run` to validate again",
            "Create a PR once all checks pass",
        ]
    }
}

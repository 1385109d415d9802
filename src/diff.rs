//! Unified diffs between installed and catalog definitions.

use std::{fs, path::Path};

use owo_colors::OwoColorize;
use similar::TextDiff;

use crate::{definition::find_definition_file, paths::display_path};

/// Render a unified diff between two texts.
pub fn unified_diff(old_label: &str, new_label: &str, old: &str, new: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(old_label, new_label)
        .to_string()
}

/// Diff the definition file of an installed copy against the catalog copy.
///
/// A side without a readable definition file diffs as empty. Returns `None`
/// when the definitions are identical.
pub fn definition_diff(installed_dir: &Path, catalog_dir: &Path) -> Option<String> {
    let (old_label, old) = read_definition_text(installed_dir);
    let (new_label, new) = read_definition_text(catalog_dir);
    if old == new {
        return None;
    }
    Some(unified_diff(&old_label, &new_label, &old, &new))
}

/// Read a tool directory's definition file, returning its display label and contents.
fn read_definition_text(dir: &Path) -> (String, String) {
    match find_definition_file(dir) {
        Some(file) => (
            display_path(&file.path),
            fs::read_to_string(&file.path).unwrap_or_default(),
        ),
        None => (display_path(dir), String::new()),
    }
}

/// Colorize a unified diff string when enabled.
pub fn colorize_diff(diff: &str, color: bool) -> String {
    if !color {
        return diff.to_string();
    }

    let mut output = String::new();
    for line in diff.lines() {
        let colored = if line.starts_with("+++") || line.starts_with("---") {
            line.bold().to_string()
        } else if line.starts_with("@@") {
            line.cyan().to_string()
        } else if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else {
            line.to_string()
        };
        output.push_str(&colored);
        output.push('\n');
    }

    if !diff.ends_with('\n') && output.ends_with('\n') {
        output.pop();
    }

    output
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{colorize_diff, definition_diff};

    #[test]
    fn diffs_changed_definitions() {
        let dir = tempdir().expect("tempdir");
        let installed = dir.path().join("installed");
        let catalog = dir.path().join("catalog");
        fs::create_dir_all(&installed).expect("mkdir");
        fs::create_dir_all(&catalog).expect("mkdir");
        fs::write(installed.join("prompt.yaml"), "id: x\nversion: 1.0.0\n").expect("write");
        fs::write(catalog.join("prompt.yaml"), "id: x\nversion: 1.2.0\n").expect("write");

        let diff = definition_diff(&installed, &catalog).expect("diff");
        assert!(diff.contains("-version: 1.0.0"));
        assert!(diff.contains("+version: 1.2.0"));
        assert_eq!(colorize_diff(&diff, false), diff);
    }

    #[test]
    fn identical_definitions_have_no_diff() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("prompt.yaml"), "id: x\n").expect("write");
        assert!(definition_diff(dir.path(), dir.path()).is_none());
    }
}

//! YAML frontmatter splitting for Markdown tool definitions.

/// A Markdown document split into its frontmatter and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    /// Raw YAML between the `---` delimiters.
    pub(crate) yaml: &'a str,
    /// Document body after the closing delimiter.
    pub(crate) body: &'a str,
}

/// Split a Markdown document into frontmatter and body.
///
/// Returns `None` when the document does not open with a `---` line or the
/// block is never closed.
pub fn split_frontmatter(contents: &str) -> Option<Frontmatter<'_>> {
    let mut offset = 0;
    let mut lines = contents.split_inclusive('\n');
    let first = lines.next()?;
    if trim_line_endings(first).trim_end() != "---" {
        return None;
    }
    offset += first.len();
    let start = offset;

    for line in lines {
        if trim_line_endings(line).trim_end() == "---" {
            return Some(Frontmatter {
                yaml: &contents[start..offset],
                body: &contents[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    None
}

/// Trim CRLF and LF suffixes from a line fragment.
fn trim_line_endings(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

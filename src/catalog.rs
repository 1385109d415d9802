//! Toolkit scanning, root resolution, and catalog queries.

use std::{
    env,
    path::{Path, PathBuf},
};

use tracing::debug;
use walkdir::WalkDir;

use crate::{
    config::Config,
    definition::load_tool,
    diagnostics::Diagnostics,
    paths::normalize_path,
    tool::{Tool, ToolType},
};

/// Candidate toolkit directory names relative to the working directory.
const LOCAL_CANDIDATES: [&str; 2] = ["lib", "toolkit"];

/// Candidate toolkit directories relative to the directory holding the executable.
const PACKAGE_CANDIDATES: [&str; 3] = ["lib", "../lib", "../share/hit/lib"];

/// In-memory catalog of tools discovered in a toolkit.
///
/// Order follows the scan: tool types in declaration order, directory entries
/// sorted by name within each type.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Toolkit root the catalog was scanned from.
    pub(crate) root: PathBuf,
    /// Discovered tools.
    pub(crate) tools: Vec<Tool>,
}

impl Catalog {
    /// Resolve the toolkit root from configuration and scan it.
    pub(crate) fn load(config: &Config, diagnostics: &mut Diagnostics) -> Self {
        let root = match config.toolkit() {
            Some(root) => root.to_path_buf(),
            None => default_toolkit_root(),
        };
        Self::scan(&root, diagnostics)
    }

    /// Scan a toolkit root directory.
    pub(crate) fn scan(root: &Path, diagnostics: &mut Diagnostics) -> Self {
        let root = normalize_path(root);
        let tools = scan_toolkit(&root, diagnostics);
        debug!(root = %root.display(), count = tools.len(), "scanned toolkit");
        Self { root, tools }
    }

    /// Return every tool matching a case-insensitive query, or all tools without one.
    ///
    /// A tool matches when its id, name, description, category, or any tag
    /// contains the query. The query is trimmed first, so an empty or
    /// whitespace-only query behaves like no query and returns every tool.
    pub(crate) fn search(&self, query: Option<&str>) -> Vec<&Tool> {
        let Some(query) = query.map(str::trim).filter(|query| !query.is_empty()) else {
            return self.tools.iter().collect();
        };
        let query = query.to_lowercase();
        self.tools
            .iter()
            .filter(|tool| matches_query(tool, &query))
            .collect()
    }

    /// Return the first tool with the given id.
    ///
    /// Ids are not unique across type directories; the first scanned tool wins.
    pub(crate) fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.id == id)
    }

    /// Return the first tool with the given type and id.
    pub(crate) fn find(&self, tool_type: ToolType, id: &str) -> Option<&Tool> {
        self.tools
            .iter()
            .find(|tool| tool.tool_type == tool_type && tool.id == id)
    }

    /// Count tools per type, in type order, omitting empty types.
    pub(crate) fn counts_by_type(&self) -> Vec<(ToolType, usize)> {
        ToolType::all()
            .into_iter()
            .map(|kind| {
                let count = self.tools.iter().filter(|tool| tool.tool_type == kind).count();
                (kind, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Return true when any searchable field contains the lowercased query.
fn matches_query(tool: &Tool, query: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query);
    contains(&tool.id)
        || contains(&tool.name)
        || contains(&tool.description)
        || contains(&tool.category)
        || tool.tags().iter().any(|tag| contains(tag))
}

/// Scan every type subdirectory of a toolkit root.
///
/// Missing roots and missing type directories yield no tools.
pub fn scan_toolkit(root: &Path, diagnostics: &mut Diagnostics) -> Vec<Tool> {
    let mut tools = Vec::new();
    for tool_type in ToolType::all() {
        let type_dir = root.join(tool_type.dir_name());
        if !type_dir.is_dir() {
            continue;
        }
        scan_type_dir(&type_dir, tool_type, &mut tools, diagnostics);
    }
    tools
}

/// Walk one type directory depth-first.
///
/// A directory whose definition parses is recorded as a tool and not descended
/// into; any other directory is treated as a grouping folder.
fn scan_type_dir(
    type_dir: &Path,
    tool_type: ToolType,
    tools: &mut Vec<Tool>,
    diagnostics: &mut Diagnostics,
) {
    let mut walker = WalkDir::new(type_dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                debug!(%error, "skipping unreadable toolkit entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(tool) = load_tool(entry.path(), tool_type, diagnostics) {
            tools.push(tool);
            walker.skip_current_dir();
        }
    }
}

/// Return true when a directory looks like a toolkit root.
pub fn is_toolkit_dir(path: &Path) -> bool {
    path.is_dir()
        && ToolType::all()
            .into_iter()
            .any(|kind| path.join(kind.dir_name()).is_dir())
}

/// Resolve the default toolkit root for this process.
fn default_toolkit_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let package_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    resolve_toolkit_root(&cwd, package_dir.as_deref())
}

/// Pick the first valid toolkit candidate, falling back to `<cwd>/lib`.
///
/// Working directory candidates win over candidates next to the installed
/// executable.
pub fn resolve_toolkit_root(cwd: &Path, package_dir: Option<&Path>) -> PathBuf {
    let local = LOCAL_CANDIDATES.iter().map(|name| cwd.join(name));
    let packaged = package_dir
        .into_iter()
        .flat_map(|dir| PACKAGE_CANDIDATES.iter().map(move |name| dir.join(name)));
    local
        .chain(packaged)
        .find(|candidate| is_toolkit_dir(candidate))
        .map(|candidate| normalize_path(&candidate))
        .unwrap_or_else(|| cwd.join(LOCAL_CANDIDATES[0]))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{Catalog, resolve_toolkit_root, scan_toolkit};
    use crate::{
        diagnostics::Diagnostics,
        paths::normalize_path,
        testutil::{ToolkitFixture, yaml_tool},
        tool::ToolType,
    };

    fn scan(fixture: &ToolkitFixture) -> Catalog {
        Catalog::scan(fixture.root(), &mut Diagnostics::new(false))
    }

    #[test]
    fn empty_root_yields_empty_catalog() {
        let fixture = ToolkitFixture::new();
        let catalog = scan(&fixture);
        assert!(catalog.tools.is_empty());
        assert!(catalog.search(None).is_empty());
        assert!(catalog.get("anything").is_none());
    }

    #[test]
    fn missing_root_yields_empty_catalog() {
        let dir = tempdir().expect("tempdir");
        let tools = scan_toolkit(&dir.path().join("absent"), &mut Diagnostics::new(false));
        assert!(tools.is_empty());
    }

    #[test]
    fn finds_yaml_prompt() {
        let fixture = ToolkitFixture::new().with_file(
            "prompts/code-review-ts/prompt.yaml",
            &yaml_tool("code-review-ts", "1.2.0"),
        );
        let catalog = scan(&fixture);
        let tool = catalog.get("code-review-ts").expect("tool");
        assert_eq!(tool.tool_type, ToolType::Prompt);
        assert_eq!(tool.version, "1.2.0");
        assert_eq!(tool.path, normalize_path(&fixture.root().join("prompts/code-review-ts")));
        assert!(tool.path.is_absolute());
    }

    #[test]
    fn recurses_through_grouping_folders() {
        let fixture = ToolkitFixture::new()
            .with_file("agents/backend/api/agent.yaml", &yaml_tool("api", "1.0.0"))
            .with_file("agents/backend/db/agent.yaml", &yaml_tool("db", "1.0.0"))
            .with_file("agents/backend/notes.txt", "not a tool");
        let catalog = scan(&fixture);
        let ids: Vec<_> = catalog.tools.iter().map(|tool| tool.id.as_str()).collect();
        assert_eq!(ids, vec!["api", "db"]);
    }

    #[test]
    fn does_not_descend_into_tool_directories() {
        let fixture = ToolkitFixture::new()
            .with_file("prompts/outer/prompt.yaml", &yaml_tool("outer", "1.0.0"))
            .with_file("prompts/outer/inner/prompt.yaml", &yaml_tool("inner", "1.0.0"));
        let catalog = scan(&fixture);
        assert!(catalog.get("outer").is_some());
        assert!(catalog.get("inner").is_none());
    }

    #[test]
    fn recurses_past_malformed_definitions() {
        let fixture = ToolkitFixture::new()
            .with_file("prompts/broken/prompt.yaml", "name: no id\n")
            .with_file("prompts/broken/nested/prompt.yaml", &yaml_tool("nested", "1.0.0"))
            .with_file("prompts/fine/prompt.yaml", &yaml_tool("fine", "1.0.0"));
        let mut diagnostics = Diagnostics::new(false);
        let catalog = Catalog::scan(fixture.root(), &mut diagnostics);
        assert!(catalog.get("fine").is_some());
        assert!(catalog.get("nested").is_some());
        assert_eq!(diagnostics.skipped().len(), 1);
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn scans_every_format_and_type() {
        let fixture = ToolkitFixture::new()
            .with_file("prompts/md/prompt.md", "---\nid: md\nname: Md\nversion: 1.0.0\n---\nBody")
            .with_file(
                "prompts/xml/prompt.xml",
                "<prompt><metadata><id>xml</id><name>Xml</name><version>1.0.0</version></metadata></prompt>",
            )
            .with_file("evaluators/json/config.json", r#"{"id":"json","name":"Json","version":"1.0.0"}"#)
            .with_file("context-packs/pack/config.yaml", &yaml_tool("pack", "1.0.0"))
            .with_file("skills/skill/tool.md", "---\nid: skill\nname: Skill\nversion: 1.0.0\n---\n");
        let catalog = scan(&fixture);
        assert_eq!(catalog.tools.len(), 5);
        assert_eq!(catalog.get("json").expect("json").tool_type, ToolType::Evaluator);
        assert_eq!(catalog.get("pack").expect("pack").tool_type, ToolType::ContextPack);
        assert_eq!(catalog.get("skill").expect("skill").tool_type, ToolType::Skill);
        assert_eq!(
            catalog.counts_by_type(),
            vec![
                (ToolType::Prompt, 2),
                (ToolType::Evaluator, 1),
                (ToolType::ContextPack, 1),
                (ToolType::Skill, 1)
            ]
        );
    }

    #[test]
    fn lookups_are_first_match() {
        let fixture = ToolkitFixture::new()
            .with_file("prompts/dup/prompt.yaml", &yaml_tool("dup", "1.0.0"))
            .with_file("agents/dup/agent.yaml", &yaml_tool("dup", "2.0.0"));
        let catalog = scan(&fixture);
        assert_eq!(catalog.get("dup").expect("dup").tool_type, ToolType::Prompt);
        assert_eq!(catalog.find(ToolType::Agent, "dup").expect("agent").version, "2.0.0");
    }

    #[test]
    fn searches_all_fields_case_insensitively() {
        let fixture = ToolkitFixture::new()
            .with_file(
                "prompts/a/prompt.yaml",
                "id: unit-gen\nname: Unit Generator\nversion: 1.0.0\ndescription: Writes TESTING scaffolds\n",
            )
            .with_file(
                "prompts/b/prompt.yaml",
                "id: b\nname: B\nversion: 1.0.0\nmetadata:\n  tags: [Testing]\n",
            )
            .with_file(
                "prompts/c/prompt.yaml",
                "id: c\nname: C\nversion: 1.0.0\ncategory: testing-tools\n",
            )
            .with_file("prompts/d/prompt.yaml", "id: d\nname: D\nversion: 1.0.0\n");
        let catalog = scan(&fixture);

        assert_eq!(catalog.search(None).len(), 4);
        let ids: Vec<_> = catalog
            .search(Some("testing"))
            .into_iter()
            .map(|tool| tool.id.as_str())
            .collect();
        assert_eq!(ids, vec!["unit-gen", "b", "c"]);
        assert_eq!(catalog.search(Some("GENERATOR")).len(), 1);
        assert!(catalog.search(Some("nothing-matches")).is_empty());
    }

    #[test]
    fn blank_query_matches_everything() {
        let fixture = ToolkitFixture::new()
            .with_tool(ToolType::Prompt, "a", "1.0.0")
            .with_tool(ToolType::Agent, "b", "1.0.0");
        let catalog = scan(&fixture);

        for query in ["", "   ", "\t"] {
            assert_eq!(catalog.search(Some(query)).len(), 2, "{query:?}");
        }
        assert_eq!(catalog.search(Some("  b ")).len(), 1);
    }

    #[test]
    fn resolves_working_directory_candidates_first() {
        let cwd = tempdir().expect("cwd");
        let package = tempdir().expect("package");
        fs::create_dir_all(package.path().join("lib/prompts")).expect("package lib");

        let resolved = resolve_toolkit_root(cwd.path(), Some(package.path()));
        assert_eq!(resolved, normalize_path(&package.path().join("lib")));

        fs::create_dir_all(cwd.path().join("toolkit/agents")).expect("cwd toolkit");
        let resolved = resolve_toolkit_root(cwd.path(), Some(package.path()));
        assert_eq!(resolved, normalize_path(&cwd.path().join("toolkit")));
    }

    #[test]
    fn falls_back_to_local_lib() {
        let cwd = tempdir().expect("cwd");
        fs::create_dir_all(cwd.path().join("lib")).expect("empty lib");
        let resolved = resolve_toolkit_root(cwd.path(), None);
        assert_eq!(resolved, cwd.path().join("lib"));
    }
}

//! Update resolution: installed tools with newer catalog versions.

use std::path::PathBuf;

use tracing::debug;

use crate::{
    catalog::Catalog,
    diagnostics::Diagnostics,
    registry::InstalledTool,
    tool::ToolType,
    version::is_newer,
};

/// An installed tool with a newer version in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCandidate {
    /// Tool identifier.
    pub(crate) id: String,
    /// Catalog name.
    pub(crate) name: String,
    /// Installed version.
    pub(crate) current_version: String,
    /// Catalog version.
    pub(crate) latest_version: String,
    /// Where the installed copy lives.
    pub(crate) installed_path: PathBuf,
    /// Catalog tool type.
    pub(crate) tool_type: ToolType,
    /// Catalog directory to copy from.
    pub(crate) source_path: PathBuf,
}

/// Compare installed tools against the catalog.
///
/// Entries are matched by their recorded type and id; only an entry whose
/// stored type is unknown falls back to the first tool with that id.
/// Installed tools missing from the catalog produce a warning and are skipped.
pub fn find_updates(
    installed: &[InstalledTool],
    catalog: &Catalog,
    diagnostics: &mut Diagnostics,
) -> Vec<UpdateCandidate> {
    let mut candidates = Vec::new();
    for entry in installed {
        let resolved = entry
            .tool_type()
            .map_or_else(|| catalog.get(&entry.id), |kind| catalog.find(kind, &entry.id));
        let Some(tool) = resolved else {
            diagnostics.warn(format!(
                "Tool {} not found in toolkit (may have been removed)",
                entry.id
            ));
            continue;
        };
        if !is_newer(&entry.version, &tool.version) {
            debug!(id = %entry.id, version = %entry.version, "tool is up to date");
            continue;
        }
        candidates.push(UpdateCandidate {
            id: entry.id.clone(),
            name: tool.name.clone(),
            current_version: entry.version.clone(),
            latest_version: tool.version.clone(),
            installed_path: entry.installed_path.clone(),
            tool_type: tool.tool_type,
            source_path: tool.path.clone(),
        });
    }
    candidates
}

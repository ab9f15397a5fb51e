//! One end-to-end extraction run
//!
//! Resolve the graph, anchor it at the common base, add sibling assets,
//! relocate, then write reports and look up package versions. Structural
//! failures come back as [`GraftError`]; per-file problems live in the
//! returned [`SyncReport`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::assets::expand_assets;
use crate::classify::{MarkerClassifier, SyntaxClassifier};
use crate::config::ExtractConfig;
use crate::error::{GraftError, Result};
use crate::file_kind::promoted_path;
use crate::graph::DependencyGraph;
use crate::manifest::{ManifestVersionMap, resolve_versions};
use crate::paths::{
    AbsolutePathSet, find_common_base, normalize_lexically, resolve_graph, strip_base,
};
use crate::report::{ReportPaths, write_reports};
use crate::sync::{RelocationSync, SyncReport};

/// Everything a caller needs to know about a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub entry: PathBuf,
    pub common_base: PathBuf,
    /// Entry path relative to the destination, `/`-separated, with its
    /// promoted extension if it was promoted.
    pub relative_entry: String,
    pub destination: PathBuf,
    pub files: AbsolutePathSet,
    pub assets_added: usize,
    pub sync: SyncReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<ReportPaths>,
    pub versions: ManifestVersionMap,
}

/// Name used for the destination folder and report files: the entry's stem.
pub fn component_name(entry: &Path) -> String {
    entry
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "component".to_string())
}

/// Anchor directory for `paths`.
///
/// A lone file is its own common base; its parent is used instead so the
/// file keeps a name under the destination.
pub fn anchor_for(paths: &AbsolutePathSet) -> Result<PathBuf> {
    let list = paths.to_vec();
    let base = find_common_base(&list)?;
    if paths.contains(&base) {
        return Ok(base.parent().map(Path::to_path_buf).unwrap_or(base));
    }
    Ok(base)
}

/// Relative path of `entry` under `base`, as used by import statements.
fn relative_entry(base: &Path, entry: &Path, promoted: bool) -> String {
    let relative = strip_base(entry, base).unwrap_or_else(|| entry.to_path_buf());
    let relative = if promoted {
        promoted_path(&relative)
    } else {
        relative
    };
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Extract `entry` and its dependencies into `destination`.
pub fn extract(
    entry: &Path,
    graph: &DependencyGraph,
    destination: &Path,
    config: &ExtractConfig,
) -> Result<ExtractionOutcome> {
    extract_with(entry, graph, destination, config, &MarkerClassifier)
}

/// [`extract`] with a caller-supplied component classifier.
pub fn extract_with(
    entry: &Path,
    graph: &DependencyGraph,
    destination: &Path,
    config: &ExtractConfig,
    classifier: &dyn SyntaxClassifier,
) -> Result<ExtractionOutcome> {
    let entry = normalize_lexically(entry);
    if !entry.is_file() {
        return Err(GraftError::EntryNotFound(entry));
    }

    let resolved = resolve_graph(graph, &entry);
    info!(files = resolved.len(), "resolved dependency graph");

    let common_base = anchor_for(&resolved)?;
    info!(common_base = %common_base.display(), "common base identified");

    let files = if config.expand_assets {
        expand_assets(&resolved)
    } else {
        resolved.clone()
    };
    let assets_added = files.len() - resolved.len();
    if assets_added > 0 {
        info!(assets = assets_added, "added sibling assets");
    }

    let sync = RelocationSync::new(&common_base, destination, classifier)
        .with_options(config.sync_options())
        .run(&files)?;

    let entry_promoted = sync
        .destination_of(&entry)
        .is_some_and(|dest| dest.extension() != entry.extension());
    let relative_entry = relative_entry(&common_base, &entry, entry_promoted);
    info!(relative_entry = %relative_entry, "entry relocated");

    let reports = if config.write_reports {
        Some(write_reports(graph, destination, &component_name(&entry))?)
    } else {
        None
    };

    let search_start = entry.parent().unwrap_or(&entry);
    let versions = resolve_versions(search_start, &config.requested_packages);

    Ok(ExtractionOutcome {
        entry,
        common_base,
        relative_entry,
        destination: destination.to_path_buf(),
        files,
        assets_added,
        sync,
        reports,
        versions,
    })
}

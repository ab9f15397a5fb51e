//! Sibling asset discovery
//!
//! The dependency analyzer only reports code. Stylesheets and images that
//! sit next to reported files are picked up here by extension, using the
//! stylesheet and image kinds of [`crate::file_kind::FileKind`]. Assets imported
//! from other directories are missed, and unrelated assets sharing a
//! directory are included.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::file_kind::is_asset_path;
use crate::paths::AbsolutePathSet;

/// Allow-listed asset files directly inside `dir`, sorted.
///
/// Hidden files are skipped. An unreadable directory yields no assets.
pub fn sibling_assets(dir: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .hidden(true)
        .max_depth(Some(1))
        .build();

    let mut assets: Vec<PathBuf> = Vec::new();
    for result in walker {
        match result {
            Ok(entry) => {
                let is_file = entry.file_type().is_some_and(|t| t.is_file());
                if is_file && entry.depth() == 1 && is_asset_path(entry.path()) {
                    assets.push(entry.into_path());
                }
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "cannot list directory for assets");
            }
        }
    }

    assets.sort();
    assets
}

/// Add sibling assets of every file in `paths`.
///
/// Returns the expanded set; applying it again to its own output adds
/// nothing, since assets live in directories that were already scanned.
pub fn expand_assets(paths: &AbsolutePathSet) -> AbsolutePathSet {
    let dirs: BTreeSet<&Path> = paths.iter().filter_map(Path::parent).collect();

    let mut expanded = paths.clone();
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        for asset in sibling_assets(dir) {
            if expanded.insert(asset.clone()) {
                debug!(asset = %asset.display(), "added sibling asset");
            }
        }
    }

    expanded
}

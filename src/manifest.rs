//! Nearest-manifest version lookup
//!
//! Walks up from a directory to the closest `package.json` and reports the
//! declared version strings of requested packages. Version ranges are opaque
//! strings. Absence of a manifest is not an error, it just means no version
//! information; callers apply their own defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{GraftError, Result};

pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Requested package name -> declared version string.
pub type ManifestVersionMap = BTreeMap<String, String>;

/// The dependency sections of a package manifest.
///
/// Entries whose value is not a string are ignored rather than failing the
/// whole manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, Value>,
}

impl PackageManifest {
    pub fn from_json(json: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| GraftError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Both sections merged, runtime taking precedence.
    pub fn merged(&self) -> ManifestVersionMap {
        let mut merged = ManifestVersionMap::new();
        for (name, value) in self.dev_dependencies.iter().chain(&self.dependencies) {
            if let Some(version) = value.as_str() {
                merged.insert(name.clone(), version.to_string());
            }
        }
        merged
    }
}

/// Closest manifest at or above `start`, stopping at the filesystem root.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Read and parse a manifest file.
pub fn read_manifest(path: &Path) -> Result<PackageManifest> {
    let json = fs::read_to_string(path)?;
    PackageManifest::from_json(&json, path)
}

/// Versions of `requested` packages from the nearest manifest above `start`.
///
/// Names absent from the manifest are omitted. A missing or unreadable
/// manifest yields an empty map.
pub fn resolve_versions<S: AsRef<str>>(start: &Path, requested: &[S]) -> ManifestVersionMap {
    let Some(path) = find_manifest(start) else {
        debug!(start = %start.display(), "no manifest found");
        return ManifestVersionMap::new();
    };

    let manifest = match read_manifest(&path) {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!(manifest = %path.display(), error = %err, "ignoring unreadable manifest");
            return ManifestVersionMap::new();
        }
    };

    debug!(manifest = %path.display(), "resolving versions");
    let mut declared = manifest.merged();
    requested
        .iter()
        .filter_map(|name| declared.remove_entry(name.as_ref()))
        .collect()
}

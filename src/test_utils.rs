//! Test utilities for building throwaway source projects.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::manifest::MANIFEST_FILE_NAME;

/// A temporary project tree for extraction tests.
///
/// Files are written relative to the tree root. The directory is removed
/// when the value is dropped.
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Write a `package.json` into `dir` (relative to the root).
    pub fn add_manifest(&self, dir: &str, json: &str) -> PathBuf {
        let rel = Path::new(dir).join(MANIFEST_FILE_NAME);
        self.add_file(&rel.to_string_lossy(), json)
    }

    /// Write an analyzer graph as `deps.json` at the root.
    pub fn add_graph(&self, json: &str) -> PathBuf {
        self.add_file("deps.json", json)
    }

    /// Read a file below the root, panicking if it is absent.
    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.dir.path().join(path)).expect("Failed to read file")
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

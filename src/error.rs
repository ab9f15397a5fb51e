//! Error types for extraction runs
//!
//! Only structural failures live here. Per-file problems during relocation
//! are recorded as [`crate::sync::FileOutcome`] values and never abort a run.

use std::io;
use std::path::PathBuf;

/// Structural errors that stop an extraction run.
#[derive(Debug, thiserror::Error)]
pub enum GraftError {
    #[error("no files to relocate")]
    EmptyPathSet,

    #[error(
        "no common ancestor directory between '{}' and '{}' (different filesystem roots?)",
        first.display(),
        second.display()
    )]
    NoCommonBase { first: PathBuf, second: PathBuf },

    #[error("entry file not found: {}", .0.display())]
    EntryNotFound(PathBuf),

    #[error("cannot create destination root '{}': {source}", path.display())]
    DestinationRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read dependency graph '{}': {source}", path.display())]
    GraphRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed dependency graph: {0}")]
    GraphParse(#[source] serde_json::Error),

    #[error("malformed manifest '{}': {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write report '{}': {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GraftError>;

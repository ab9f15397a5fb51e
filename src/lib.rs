//! Graft - lift a component and its dependency tree out of one project and
//! replant it, self-contained, somewhere else

pub mod assets;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod file_kind;
pub mod graph;
pub mod manifest;
pub mod paths;
pub mod report;
pub mod rewrite;
pub mod summary;
pub mod sync;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use assets::expand_assets;
pub use classify::{MarkerClassifier, SourceClass, SyntaxClassifier};
pub use config::ExtractConfig;
pub use error::{GraftError, Result};
pub use extract::{ExtractionOutcome, component_name, extract, extract_with};
pub use graph::DependencyGraph;
pub use manifest::{ManifestVersionMap, resolve_versions};
pub use paths::{AbsolutePathSet, find_common_base, resolve_graph};
pub use report::{ReportPaths, write_reports};
pub use rewrite::{RewritePolicy, rewrite_imports};
pub use summary::{print_json, print_summary};
pub use sync::{FileOutcome, RelocationSync, SyncOptions, SyncReport};

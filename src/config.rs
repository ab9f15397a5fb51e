//! Configuration for an extraction run

use crate::rewrite::RewritePolicy;
use crate::sync::SyncOptions;

/// Packages whose versions are looked up when none are requested.
pub const DEFAULT_REQUESTED_PACKAGES: &[&str] = &["react", "react-dom"];

/// Configuration for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Pull in stylesheets and images sitting next to graph files
    pub expand_assets: bool,
    pub promote_components: bool,
    pub rewrite_policy: RewritePolicy,
    /// Write `<name>.json` and `<name>.md` into the destination
    pub write_reports: bool,
    /// Package names resolved from the nearest manifest above the entry file
    pub requested_packages: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            expand_assets: true,
            promote_components: true,
            rewrite_policy: RewritePolicy::PromotedOnly,
            write_reports: true,
            requested_packages: DEFAULT_REQUESTED_PACKAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ExtractConfig {
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            promote_components: self.promote_components,
            rewrite_policy: self.rewrite_policy,
        }
    }
}

//! File classification by extension
//!
//! This module holds the fixed extension tables used across the crate:
//! which files are code (and therefore eligible for content transforms),
//! which are carried-along assets, and the single promotion rule from the
//! generic script extension to its component-aware variant.

use std::path::{Path, PathBuf};

/// Extension of a generic script that may be promoted.
pub const GENERIC_SCRIPT_EXTENSION: &str = "js";

/// Extension a promoted script is written with.
pub const COMPONENT_EXTENSION: &str = "jsx";

/// Kinds of files the relocation engine cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Script,
    Component,
    TypedScript,
    TypedComponent,
    Stylesheet,
    Image,
}

impl FileKind {
    /// Detect the kind of a file from its extension.
    ///
    /// Matching is case-insensitive. Returns `None` for extensions the
    /// engine does not recognize.
    ///
    /// # Examples
    ///
    /// ```
    /// use graft::file_kind::FileKind;
    ///
    /// assert_eq!(FileKind::from_extension("js"), Some(FileKind::Script));
    /// assert_eq!(FileKind::from_extension("JSX"), Some(FileKind::Component));
    /// assert_eq!(FileKind::from_extension("png"), Some(FileKind::Image));
    /// assert_eq!(FileKind::from_extension("md"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(FileKind::Script),
            "jsx" => Some(FileKind::Component),
            "ts" | "mts" | "cts" => Some(FileKind::TypedScript),
            "tsx" => Some(FileKind::TypedComponent),
            "css" | "scss" | "sass" | "less" => Some(FileKind::Stylesheet),
            "svg" | "png" | "jpg" | "jpeg" | "gif" | "webp" | "avif" | "ico" | "bmp" => {
                Some(FileKind::Image)
            }
            _ => None,
        }
    }

    /// Detect the kind of a file from its path.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Code files are read as text and run through import rewriting.
    pub fn is_code(&self) -> bool {
        matches!(
            self,
            FileKind::Script | FileKind::Component | FileKind::TypedScript | FileKind::TypedComponent
        )
    }

    /// Assets are never transformed, only copied. Stylesheets and images
    /// are the allow-list picked up from sibling directories.
    pub fn is_asset(&self) -> bool {
        matches!(self, FileKind::Stylesheet | FileKind::Image)
    }
}

/// Whether the file carries exactly the generic script extension.
///
/// `.mjs`/`.cjs` are scripts too, but only `.js` takes part in promotion.
pub fn is_promotable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(GENERIC_SCRIPT_EXTENSION))
}

/// The destination path of a promoted file.
pub fn promoted_path(path: &Path) -> PathBuf {
    path.with_extension(COMPONENT_EXTENSION)
}

/// Whether a file belongs to the asset allow-list.
pub fn is_asset_path(path: &Path) -> bool {
    FileKind::from_path(path).is_some_and(|kind| kind.is_asset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_code() {
        assert_eq!(FileKind::from_extension("js"), Some(FileKind::Script));
        assert_eq!(FileKind::from_extension("mjs"), Some(FileKind::Script));
        assert_eq!(FileKind::from_extension("jsx"), Some(FileKind::Component));
        assert_eq!(FileKind::from_extension("ts"), Some(FileKind::TypedScript));
        assert_eq!(FileKind::from_extension("tsx"), Some(FileKind::TypedComponent));
    }

    #[test]
    fn test_from_extension_case_insensitive() {
        assert_eq!(FileKind::from_extension("JS"), Some(FileKind::Script));
        assert_eq!(FileKind::from_extension("Css"), Some(FileKind::Stylesheet));
        assert_eq!(FileKind::from_extension("PNG"), Some(FileKind::Image));
    }

    #[test]
    fn test_from_extension_unknown() {
        assert_eq!(FileKind::from_extension("json"), None);
        assert_eq!(FileKind::from_extension("md"), None);
        assert_eq!(FileKind::from_extension(""), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            FileKind::from_path(Path::new("/src/Form.js")),
            Some(FileKind::Script)
        );
        assert_eq!(
            FileKind::from_path(Path::new("styles/form.module.scss")),
            Some(FileKind::Stylesheet)
        );
        assert_eq!(FileKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_code_and_asset_are_disjoint() {
        for ext in ["js", "jsx", "ts", "tsx", "css", "svg", "png"] {
            let kind = FileKind::from_extension(ext).unwrap();
            assert_ne!(kind.is_code(), kind.is_asset(), "{}", ext);
        }
    }

    #[test]
    fn test_asset_allow_list() {
        for ext in ["css", "scss", "sass", "less", "svg", "png", "jpg", "webp", "ico"] {
            let kind = FileKind::from_extension(ext).unwrap();
            assert!(kind.is_asset(), "{} should be an asset", ext);
        }
    }

    #[test]
    fn test_is_promotable() {
        assert!(is_promotable(Path::new("/src/Form.js")));
        assert!(is_promotable(Path::new("/src/Form.JS")));
        assert!(!is_promotable(Path::new("/src/Form.jsx")));
        assert!(!is_promotable(Path::new("/src/Form.mjs")));
        assert!(!is_promotable(Path::new("/src/Form.ts")));
        assert!(!is_promotable(Path::new("/src/Makefile")));
    }

    #[test]
    fn test_promoted_path() {
        assert_eq!(
            promoted_path(Path::new("/out/utils/date.js")),
            PathBuf::from("/out/utils/date.jsx")
        );
    }

    #[test]
    fn test_is_asset_path() {
        assert!(is_asset_path(Path::new("logo.SVG")));
        assert!(is_asset_path(Path::new("form.css")));
        assert!(!is_asset_path(Path::new("Form.js")));
        assert!(!is_asset_path(Path::new("README")));
    }
}

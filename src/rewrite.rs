//! Import extension rewriting
//!
//! Relative, quote-delimited import targets ending in the generic script
//! extension are rewritten to the component extension. This is a textual
//! substitution over `import`/`from`/`require(`/`import(` string literals,
//! not a parse-tree transform. Package imports are never touched.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::file_kind::{COMPONENT_EXTENSION, GENERIC_SCRIPT_EXTENSION};

/// Which relative imports get their extension rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RewritePolicy {
    /// Only imports whose target file was promoted in the same run.
    #[default]
    PromotedOnly,
    /// Every relative import ending in `.js`, promoted or not.
    AllRelative,
    /// Leave import statements alone.
    Never,
}

// Rust regex has no backreferences, so each quote style gets its own branch.
static RELATIVE_SCRIPT_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<lead>\b(?:from|import)\s*\(?\s*|\brequire\s*\(\s*)(?:'(?P<single>\.{1,2}/[^'\n]*\.(?i-u:js))'|"(?P<double>\.{1,2}/[^"\n]*\.(?i-u:js))")"#,
    )
    .expect("RELATIVE_SCRIPT_IMPORT regex is invalid")
});

/// Result of rewriting one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite<'a> {
    pub content: Cow<'a, str>,
    /// Number of import targets that were changed.
    pub rewritten: usize,
}

/// Rewrite relative `.js` import targets for which `should_promote` holds.
///
/// The extension is matched ASCII case-insensitively, like
/// [`crate::file_kind::is_promotable`].
///
/// `should_promote` receives the literal target as written, e.g.
/// `./utils/date.js`.
///
/// # Examples
///
/// ```
/// use graft::rewrite::rewrite_imports;
///
/// let out = rewrite_imports("import Foo from './Foo.js'", |_| true);
/// assert_eq!(out.content, "import Foo from './Foo.jsx'");
///
/// let out = rewrite_imports("import React from 'react'", |_| true);
/// assert_eq!(out.content, "import React from 'react'");
/// assert_eq!(out.rewritten, 0);
/// ```
pub fn rewrite_imports<F>(content: &str, mut should_promote: F) -> Rewrite<'_>
where
    F: FnMut(&str) -> bool,
{
    let mut rewritten = 0;
    let content = RELATIVE_SCRIPT_IMPORT.replace_all(content, |caps: &Captures| {
        let (quote, target) = match (caps.name("single"), caps.name("double")) {
            (Some(m), _) => ('\'', m.as_str()),
            (None, Some(m)) => ('"', m.as_str()),
            (None, None) => return caps[0].to_string(),
        };
        // The matched extension is ASCII, so byte slicing stays on a boundary.
        let stem = &target[..target.len() - GENERIC_SCRIPT_EXTENSION.len() - 1];
        if should_promote(target) {
            rewritten += 1;
            format!(
                "{}{quote}{stem}.{COMPONENT_EXTENSION}{quote}",
                &caps["lead"]
            )
        } else {
            caps[0].to_string()
        }
    });

    Rewrite { content, rewritten }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite_all(content: &str) -> String {
        rewrite_imports(content, |_| true).content.into_owned()
    }

    #[test]
    fn test_default_import() {
        assert_eq!(
            rewrite_all("import Foo from './Foo.js'"),
            "import Foo from './Foo.jsx'"
        );
    }

    #[test]
    fn test_package_import_untouched() {
        let src = "import React from 'react'";
        let out = rewrite_imports(src, |_| true);
        assert_eq!(out.content, src);
        assert!(matches!(out.content, Cow::Borrowed(_)));
        assert_eq!(out.rewritten, 0);
    }

    #[test]
    fn test_package_with_js_suffix_untouched() {
        // Bare specifiers ending in .js are packages, not relative files.
        let src = "import Chart from 'chart.js';\nimport x from 'lib/thing.js';";
        assert_eq!(rewrite_all(src), src);
    }

    #[test]
    fn test_absolute_import_untouched() {
        let src = "import x from '/abs/path/x.js';";
        assert_eq!(rewrite_all(src), src);
    }

    #[test]
    fn test_double_quotes_and_parent_dirs() {
        assert_eq!(
            rewrite_all(r#"import { a } from "../../utils/date.js";"#),
            r#"import { a } from "../../utils/date.jsx";"#
        );
    }

    #[test]
    fn test_side_effect_dynamic_and_require() {
        let src = "import './register.js';\nconst m = await import('./lazy.js');\nconst r = require(\"./cjs.js\");\nexport * from './barrel.js';";
        let out = rewrite_imports(src, |_| true);
        assert_eq!(out.rewritten, 4);
        assert_eq!(
            out.content,
            "import './register.jsx';\nconst m = await import('./lazy.jsx');\nconst r = require(\"./cjs.jsx\");\nexport * from './barrel.jsx';"
        );
    }

    #[test]
    fn test_other_extensions_untouched() {
        let src = "import data from './data.json';\nimport './form.css';\nimport B from './B.jsx';\nimport M from './m.mjs';";
        assert_eq!(rewrite_all(src), src);
    }

    #[test]
    fn test_mismatched_quotes_untouched() {
        let src = "import x from './x.js\"";
        assert_eq!(rewrite_all(src), src);
    }

    #[test]
    fn test_string_literal_outside_import_untouched() {
        let src = "const label = './notes.js';";
        assert_eq!(rewrite_all(src), src);
    }

    #[test]
    fn test_predicate_selects_targets() {
        let src = "import A from './A.js';\nimport u from './util.js';";
        let mut seen = Vec::new();
        let out = rewrite_imports(src, |target| {
            seen.push(target.to_string());
            target == "./A.js"
        });
        assert_eq!(seen, vec!["./A.js", "./util.js"]);
        assert_eq!(out.rewritten, 1);
        assert_eq!(out.content, "import A from './A.jsx';\nimport u from './util.js';");
    }

    #[test]
    fn test_uppercase_extension_matches_promotion_rule() {
        let src = "import Foo from './Foo.JS';\nimport Bar from \"./Bar.Js\";";
        let mut seen = Vec::new();
        let out = rewrite_imports(src, |target| {
            seen.push(target.to_string());
            true
        });
        assert_eq!(seen, vec!["./Foo.JS", "./Bar.Js"]);
        assert_eq!(out.rewritten, 2);
        assert_eq!(
            out.content,
            "import Foo from './Foo.jsx';\nimport Bar from \"./Bar.jsx\";"
        );
    }

    #[test]
    fn test_rewrite_is_stable() {
        let once = rewrite_all("import Foo from './Foo.js'");
        assert_eq!(rewrite_all(&once), once);
    }
}

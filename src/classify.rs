//! Component-syntax detection
//!
//! Decides whether a generic script actually holds component-style code and
//! should be written with the component extension. This is a textual
//! heuristic behind the [`SyntaxClassifier`] trait, so a syntax-aware
//! implementation can replace it without touching the relocation code.

use regex::Regex;
use std::sync::LazyLock;

/// Outcome of classifying a script's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceClass {
    Component,
    PlainScript,
}

/// Evidence that a script contains component syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentMarker {
    /// A tag opening with an uppercase identifier, e.g. `<Button`.
    ComponentTag,
    /// An import or require of a UI framework package.
    FrameworkImport,
    /// `return (` closing a line, the usual shape of a returned element tree.
    ParenthesizedReturn,
}

/// Classifies script source text.
pub trait SyntaxClassifier {
    fn classify(&self, source: &str) -> SourceClass;
}

/// UI framework packages whose import marks a file as a component.
pub const FRAMEWORK_PACKAGES: &[&str] = &["react", "react-dom", "preact"];

static COMPONENT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|[^\w$.])<[A-Z][\w.]*(?:\s|/?>)").expect("COMPONENT_TAG regex is invalid")
});

static FRAMEWORK_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    let packages = FRAMEWORK_PACKAGES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r#"(?:\bfrom\s*|\bimport\s*|\brequire\s*\(\s*)['"](?:{packages})(?:/[^'"]*)?['"]"#
    ))
    .expect("FRAMEWORK_IMPORT regex is invalid")
});

static PARENTHESIZED_RETURN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\breturn\s*\(\s*$").expect("PARENTHESIZED_RETURN regex is invalid")
});

/// Pattern-based classifier over [`ComponentMarker`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerClassifier;

impl MarkerClassifier {
    /// All markers present in `source`, in declaration order.
    pub fn markers(&self, source: &str) -> Vec<ComponentMarker> {
        let mut found = Vec::new();
        if COMPONENT_TAG.is_match(source) {
            found.push(ComponentMarker::ComponentTag);
        }
        if FRAMEWORK_IMPORT.is_match(source) {
            found.push(ComponentMarker::FrameworkImport);
        }
        if PARENTHESIZED_RETURN.is_match(source) {
            found.push(ComponentMarker::ParenthesizedReturn);
        }
        found
    }
}

impl SyntaxClassifier for MarkerClassifier {
    fn classify(&self, source: &str) -> SourceClass {
        if self.markers(source).is_empty() {
            SourceClass::PlainScript
        } else {
            SourceClass::Component
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(source: &str) -> SourceClass {
        MarkerClassifier.classify(source)
    }

    #[test]
    fn test_component_tag() {
        let src = "export const Form = () => <Field name=\"a\" />;";
        assert_eq!(MarkerClassifier.markers(src), vec![ComponentMarker::ComponentTag]);
        assert_eq!(classify(src), SourceClass::Component);
    }

    #[test]
    fn test_component_tag_self_closing_without_space() {
        assert_eq!(classify("const x = <Spinner/>;"), SourceClass::Component);
        assert_eq!(classify("const x = <Form.Item>a</Form.Item>;"), SourceClass::Component);
    }

    #[test]
    fn test_framework_import() {
        assert_eq!(classify("import React from 'react';"), SourceClass::Component);
        assert_eq!(
            classify("import { useState } from \"react\";"),
            SourceClass::Component
        );
        assert_eq!(
            classify("const { render } = require('react-dom/client');"),
            SourceClass::Component
        );
    }

    #[test]
    fn test_framework_name_prefix_is_not_enough() {
        assert_eq!(
            classify("import router from 'react-router-like';"),
            SourceClass::PlainScript
        );
    }

    #[test]
    fn test_parenthesized_return() {
        let src = "function Row() {\n  return (\n    <div>row</div>\n  );\n}\n";
        assert!(
            MarkerClassifier
                .markers(src)
                .contains(&ComponentMarker::ParenthesizedReturn)
        );
        assert_eq!(classify(src), SourceClass::Component);
    }

    #[test]
    fn test_plain_utility() {
        let src = r#"
import { format } from 'date-fns';

export function formatDate(d) {
  return format(d, 'yyyy-MM-dd');
}

export const isBefore = (a, b) => a < b;
"#;
        assert!(MarkerClassifier.markers(src).is_empty());
        assert_eq!(classify(src), SourceClass::PlainScript);
    }

    #[test]
    fn test_comparison_with_constant_is_not_a_tag() {
        assert_eq!(classify("if (count <MAX_ITEMS) {}"), SourceClass::PlainScript);
        assert_eq!(classify("const ok = a<B && c;"), SourceClass::PlainScript);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(classify(""), SourceClass::PlainScript);
    }
}

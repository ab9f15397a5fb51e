//! Dependency graph supplied by the external analyzer
//!
//! The analyzer reports a JSON object mapping each file reference to the
//! ordered list of references it depends on. All references are relative to
//! the entry file's directory. Key order is kept as reported.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::error::{GraftError, Result};

/// File reference -> direct dependency references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the analyzer's JSON object form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(GraftError::GraphParse)
    }

    /// Load a graph from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| GraftError::GraphRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Add or replace the dependency list for `file`.
    pub fn insert<S: Into<String>>(&mut self, file: impl Into<String>, deps: Vec<S>) {
        self.edges
            .insert(file.into(), deps.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterate over `(file, dependencies)` in reported order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.edges.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every reference in the graph, keys and values alike, in first-seen order.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.edges
            .iter()
            .flat_map(|(k, v)| std::iter::once(k.as_str()).chain(v.iter().map(String::as_str)))
    }

    /// Circular dependencies in the graph.
    ///
    /// Each cycle is a strongly connected component of two or more files, or
    /// a single file that lists itself. Members are sorted, and cycles are
    /// ordered by their first member.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut nodes: IndexMap<&str, NodeIndex> = IndexMap::new();

        for reference in self.references() {
            if !nodes.contains_key(reference) {
                let idx = graph.add_node(reference);
                nodes.insert(reference, idx);
            }
        }
        for (file, deps) in self.iter() {
            let from = nodes[file];
            for dep in deps {
                graph.update_edge(from, nodes[dep.as_str()], ());
            }
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut members: Vec<String> =
                    scc.into_iter().map(|idx| graph[idx].to_string()).collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Pretty-printed JSON in the analyzer's own shape.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(GraftError::GraphParse)
    }
}

impl FromIterator<(String, Vec<String>)> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

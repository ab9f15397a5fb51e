//! Dependency reports written next to the relocated tree
//!
//! Two files per run: `<name>.json` holds the analyzer's graph verbatim and
//! `<name>.md` is a human-readable summary with a per-file dependency table.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::error::{GraftError, Result};
use crate::graph::DependencyGraph;

/// Where the reports of a run were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

/// Render the Markdown report for `graph`.
pub fn render_markdown(graph: &DependencyGraph, base_name: &str, date: NaiveDate) -> String {
    let cycles = graph.find_cycles();

    let mut md = String::new();
    md.push_str(&format!("# Dependency Report: {}\n", base_name));
    md.push_str(&format!("*Generated on {}*\n\n", date.format("%Y-%m-%d")));

    md.push_str("## Summary\n");
    md.push_str(&format!("* **Total Files:** {}\n", graph.len()));
    if cycles.is_empty() {
        md.push_str("* **Circular Dependencies:** None\n\n");
    } else {
        md.push_str(&format!("* **Circular Dependencies:** {}\n\n", cycles.len()));
    }

    md.push_str("## Dependency Details\n");
    md.push_str("| File | Depends On |\n");
    md.push_str("| :--- | :--- |\n");
    for (file, deps) in graph.iter() {
        let dep_list = if deps.is_empty() {
            "_None_".to_string()
        } else {
            deps.iter()
                .map(|d| format!("`{}`", d))
                .collect::<Vec<_>>()
                .join(", ")
        };
        md.push_str(&format!("| `{}` | {} |\n", file, dep_list));
    }

    if !cycles.is_empty() {
        md.push_str("\n## Circular Dependencies\n");
        for cycle in &cycles {
            let members: Vec<String> = cycle.iter().map(|f| format!("`{}`", f)).collect();
            md.push_str(&format!("* {}\n", members.join(" <-> ")));
        }
    }

    md
}

fn write_report(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| GraftError::Report {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `<base_name>.json` and `<base_name>.md` into `output_dir`.
///
/// The directory is created if needed. Existing reports are overwritten.
pub fn write_reports(graph: &DependencyGraph, output_dir: &Path, base_name: &str) -> Result<ReportPaths> {
    fs::create_dir_all(output_dir).map_err(|source| GraftError::Report {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let json = output_dir.join(format!("{}.json", base_name));
    let markdown = output_dir.join(format!("{}.md", base_name));

    write_report(&json, &graph.to_json_pretty()?)?;
    write_report(
        &markdown,
        &render_markdown(graph, base_name, Local::now().date_naive()),
    )?;

    Ok(ReportPaths { json, markdown })
}

//! Terminal summary of an extraction run

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::extract::ExtractionOutcome;
use crate::sync::FileOutcome;

fn write_label<W: WriteColor>(out: &mut W, label: &str) -> io::Result<()> {
    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    out.set_color(&bold)?;
    write!(out, "{:<14}", label)?;
    out.reset()
}

fn write_count<W: WriteColor>(out: &mut W, label: &str, count: usize, color: Color) -> io::Result<()> {
    write_label(out, label)?;
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    out.set_color(&spec)?;
    writeln!(out, "{}", count)?;
    out.reset()
}

/// Write the run summary to any color-capable writer.
///
/// Missing and failed files are listed individually, after the tally.
pub fn write_summary<W: WriteColor>(out: &mut W, outcome: &ExtractionOutcome) -> io::Result<()> {
    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    out.set_color(&bold)?;
    writeln!(out, "Extraction Summary")?;
    out.reset()?;
    writeln!(out, "──────────────────")?;

    write_label(out, "Entry:")?;
    writeln!(out, "{}", outcome.relative_entry)?;
    write_label(out, "Common base:")?;
    writeln!(out, "{}", outcome.common_base.display())?;
    write_label(out, "Destination:")?;
    writeln!(out, "{}", outcome.destination.display())?;
    writeln!(out)?;

    let sync = &outcome.sync;
    write_count(out, "Copied:", sync.copied(), Color::Green)?;
    if outcome.assets_added > 0 {
        write_count(out, "Assets:", outcome.assets_added, Color::Cyan)?;
    }
    if sync.promoted() > 0 {
        write_count(out, "Promoted:", sync.promoted(), Color::Cyan)?;
        write_count(out, "Rewritten:", sync.imports_rewritten(), Color::Cyan)?;
    }
    if sync.missing() > 0 {
        write_count(out, "Missing:", sync.missing(), Color::Yellow)?;
    }
    if sync.failed() > 0 {
        write_count(out, "Failed:", sync.failed(), Color::Red)?;
    }

    let problems: Vec<&FileOutcome> = sync
        .outcomes
        .iter()
        .filter(|o| !matches!(o, FileOutcome::Copied { .. }))
        .collect();
    if !problems.is_empty() {
        writeln!(out)?;
        for problem in problems {
            match problem {
                FileOutcome::Missing { source } => {
                    writeln!(out, "  missing  {}", source.display())?;
                }
                FileOutcome::Failed { source, reason } => {
                    writeln!(out, "  failed   {}: {}", source.display(), reason)?;
                }
                FileOutcome::Copied { .. } => {}
            }
        }
    }

    if !outcome.versions.is_empty() {
        writeln!(out)?;
        write_label(out, "Versions:")?;
        let versions: Vec<String> = outcome
            .versions
            .iter()
            .map(|(name, version)| format!("{}@{}", name, version))
            .collect();
        writeln!(out, "{}", versions.join(", "))?;
    }

    if let Some(reports) = &outcome.reports {
        write_label(out, "Reports:")?;
        writeln!(out, "{}", reports.json.display())?;
        write_label(out, "")?;
        writeln!(out, "{}", reports.markdown.display())?;
    }

    Ok(())
}

/// Print the run summary to stdout with optional color.
pub fn print_summary(outcome: &ExtractionOutcome, use_color: bool) -> io::Result<()> {
    let color_choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color_choice);
    write_summary(&mut stdout, outcome)
}

/// Print any serializable value as pretty JSON to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::AbsolutePathSet;
    use crate::sync::SyncReport;
    use std::path::PathBuf;
    use termcolor::NoColor;

    fn outcome(outcomes: Vec<FileOutcome>) -> ExtractionOutcome {
        ExtractionOutcome {
            entry: PathBuf::from("/src/Form.js"),
            common_base: PathBuf::from("/src"),
            relative_entry: "Form.jsx".to_string(),
            destination: PathBuf::from("/out/Form"),
            files: AbsolutePathSet::new(),
            assets_added: 0,
            sync: SyncReport { outcomes },
            reports: None,
            versions: [("react".to_string(), "^18.2.0".to_string())]
                .into_iter()
                .collect(),
        }
    }

    fn render(outcome: &ExtractionOutcome) -> String {
        let mut out = NoColor::new(Vec::new());
        write_summary(&mut out, outcome).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_summary_tally() {
        let text = render(&outcome(vec![
            FileOutcome::Copied {
                source: PathBuf::from("/src/Form.js"),
                destination: PathBuf::from("/out/Form/Form.jsx"),
                promoted: true,
                imports_rewritten: 1,
            },
            FileOutcome::Missing {
                source: PathBuf::from("/src/gone.js"),
            },
        ]));

        assert!(text.contains("Copied:       1"), "got: {}", text);
        assert!(text.contains("Promoted:     1"));
        assert!(text.contains("Missing:      1"));
        assert!(!text.contains("Failed:"));
        assert!(text.contains("missing  /src/gone.js"));
        assert!(text.contains("react@^18.2.0"));
    }

    #[test]
    fn test_summary_lists_failures() {
        let text = render(&outcome(vec![FileOutcome::Failed {
            source: PathBuf::from("/src/locked.js"),
            reason: "Permission denied (os error 13)".to_string(),
        }]));
        assert!(text.contains("Failed:       1"));
        assert!(text.contains("failed   /src/locked.js: Permission denied"));
    }

    #[test]
    fn test_summary_clean_run_has_no_problem_lines() {
        let text = render(&outcome(Vec::new()));
        assert!(text.contains("Copied:       0"));
        assert!(!text.contains("Missing:"));
        assert!(!text.contains("missing  "));
    }
}

//! Relocation of a resolved file set into a destination tree
//!
//! Each source is copied to `destination_root / relative(common_base, source)`.
//! Code files pass through two transforms on the way: generic scripts that
//! hold component syntax are written with the component extension, and
//! relative imports of promoted files are rewritten to match.
//!
//! The run is best effort. A missing source or a failed copy is recorded as
//! a [`FileOutcome`] and the batch continues; only an uncreatable
//! destination root aborts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::{SourceClass, SyntaxClassifier};
use crate::error::{GraftError, Result};
use crate::file_kind::{FileKind, is_promotable, promoted_path};
use crate::paths::{AbsolutePathSet, resolve_reference, strip_base};
use crate::rewrite::{RewritePolicy, rewrite_imports};

/// Options for one relocation pass.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub promote_components: bool,
    pub rewrite_policy: RewritePolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            promote_components: true,
            rewrite_policy: RewritePolicy::default(),
        }
    }
}

/// What happened to a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Copied {
        source: PathBuf,
        destination: PathBuf,
        promoted: bool,
        imports_rewritten: usize,
    },
    Missing {
        source: PathBuf,
    },
    Failed {
        source: PathBuf,
        reason: String,
    },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Copied { source, .. }
            | FileOutcome::Missing { source }
            | FileOutcome::Failed { source, .. } => source,
        }
    }
}

/// Per-file outcomes of one relocation run, in the iteration order of the
/// relocated path set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub outcomes: Vec<FileOutcome>,
}

impl SyncReport {
    pub fn copied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Copied { .. }))
            .count()
    }

    pub fn missing(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Missing { .. }))
            .count()
    }

    pub fn promoted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Copied { promoted: true, .. }))
            .count()
    }

    pub fn imports_rewritten(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Copied {
                    imports_rewritten, ..
                } => *imports_rewritten,
                _ => 0,
            })
            .sum()
    }

    /// Failed files with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { source, reason } => Some((source.as_path(), reason.as_str())),
            _ => None,
        })
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Destination of a copied source, if it was copied.
    pub fn destination_of(&self, source: &Path) -> Option<&Path> {
        self.outcomes.iter().find_map(|o| match o {
            FileOutcome::Copied {
                source: s,
                destination,
                ..
            } if s == source => Some(destination.as_path()),
            _ => None,
        })
    }
}

/// Where `source` lands under `destination_root`.
///
/// `None` when `source` is not under `common_base`; such a file would
/// escape the destination.
pub fn destination_for(common_base: &Path, destination_root: &Path, source: &Path) -> Option<PathBuf> {
    let relative = strip_base(source, common_base)?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(destination_root.join(relative))
}

/// A source file that passed the existence and placement checks.
struct PlannedFile {
    source: PathBuf,
    /// Destination with the source's own extension.
    natural: PathBuf,
    destination: PathBuf,
    /// Text of code files; `None` means copy bytes untouched.
    text: Option<String>,
    promoted: bool,
}

impl PlannedFile {
    fn demote(&mut self) {
        self.destination = self.natural.clone();
        self.promoted = false;
    }
}

/// One entry of the plan, kept in set order.
enum Step {
    Write(PlannedFile),
    Done(FileOutcome),
}

/// Undo promotions whose destination is already taken.
///
/// Unpromoted destinations are claimed first, so `Foo.js` holding component
/// syntax keeps its extension when a sibling `Foo.jsx` is relocated too.
/// Among promotions onto the same path the first in set order wins.
fn settle_destinations(steps: &mut [Step]) {
    let mut claimed: AbsolutePathSet = steps
        .iter()
        .filter_map(|step| match step {
            Step::Write(file) => Some(file.natural.clone()),
            Step::Done(_) => None,
        })
        .collect();

    for step in steps.iter_mut() {
        let Step::Write(file) = step else { continue };
        if file.promoted && !claimed.insert(file.destination.clone()) {
            warn!(
                source = %file.source.display(),
                destination = %file.destination.display(),
                "promotion would overwrite another file; keeping extension"
            );
            file.demote();
        }
    }
}

/// Copies a path set into a destination tree.
pub struct RelocationSync<'a> {
    common_base: &'a Path,
    destination_root: &'a Path,
    options: SyncOptions,
    classifier: &'a dyn SyntaxClassifier,
}

impl<'a> RelocationSync<'a> {
    pub fn new(
        common_base: &'a Path,
        destination_root: &'a Path,
        classifier: &'a dyn SyntaxClassifier,
    ) -> Self {
        Self {
            common_base,
            destination_root,
            options: SyncOptions::default(),
            classifier,
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Relocate every file in `paths`.
    ///
    /// Classification runs over the whole set before anything is written, so
    /// an import can be rewritten no matter which of the two files comes
    /// first in iteration order.
    pub fn run(&self, paths: &AbsolutePathSet) -> Result<SyncReport> {
        fs::create_dir_all(self.destination_root).map_err(|source| {
            GraftError::DestinationRoot {
                path: self.destination_root.to_path_buf(),
                source,
            }
        })?;

        let mut steps: Vec<Step> = paths
            .iter()
            .map(|source| match self.plan(source) {
                Ok(Some(file)) => Step::Write(file),
                Ok(None) => {
                    warn!(source = %source.display(), "file missing (skipped)");
                    Step::Done(FileOutcome::Missing {
                        source: source.to_path_buf(),
                    })
                }
                Err(err) => Step::Done(self.failure(source, &err)),
            })
            .collect();

        settle_destinations(&mut steps);

        let promoted: AbsolutePathSet = steps
            .iter()
            .filter_map(|step| match step {
                Step::Write(file) if file.promoted => Some(file.source.clone()),
                _ => None,
            })
            .collect();

        let mut report = SyncReport::default();
        for step in steps {
            let outcome = match step {
                Step::Done(outcome) => outcome,
                Step::Write(file) => match self.write(&file, &promoted) {
                    Ok(imports_rewritten) => {
                        debug!(
                            source = %file.source.display(),
                            destination = %file.destination.display(),
                            promoted = file.promoted,
                            imports_rewritten,
                            "copied"
                        );
                        FileOutcome::Copied {
                            source: file.source,
                            destination: file.destination,
                            promoted: file.promoted,
                            imports_rewritten,
                        }
                    }
                    Err(err) => self.failure(&file.source, &err),
                },
            };
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    fn failure(&self, source: &Path, err: &io::Error) -> FileOutcome {
        warn!(source = %source.display(), error = %err, "failed to copy");
        FileOutcome::Failed {
            source: source.to_path_buf(),
            reason: err.to_string(),
        }
    }

    /// `Ok(None)` when the source does not exist as a file.
    fn plan(&self, source: &Path) -> io::Result<Option<PlannedFile>> {
        if !source.is_file() {
            return Ok(None);
        }

        let natural = destination_for(self.common_base, self.destination_root, source)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not under common base '{}'", self.common_base.display()),
                )
            })?;

        let is_code = FileKind::from_path(source).is_some_and(|kind| kind.is_code());
        if !is_code {
            return Ok(Some(PlannedFile {
                source: source.to_path_buf(),
                destination: natural.clone(),
                natural,
                text: None,
                promoted: false,
            }));
        }

        // Non-UTF-8 code is copied verbatim rather than failed.
        let text = match fs::read_to_string(source) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => None,
            Err(err) => return Err(err),
        };

        let promoted = self.options.promote_components
            && is_promotable(source)
            && text
                .as_deref()
                .is_some_and(|t| self.classifier.classify(t) == SourceClass::Component);

        let destination = if promoted {
            promoted_path(&natural)
        } else {
            natural.clone()
        };

        Ok(Some(PlannedFile {
            source: source.to_path_buf(),
            natural,
            destination,
            text,
            promoted,
        }))
    }

    /// Write one planned file; returns the number of rewritten imports.
    fn write(&self, file: &PlannedFile, promoted: &AbsolutePathSet) -> io::Result<usize> {
        if let Some(parent) = file.destination.parent() {
            fs::create_dir_all(parent)?;
        }

        let Some(text) = &file.text else {
            fs::copy(&file.source, &file.destination)?;
            return Ok(0);
        };

        let source_dir = file.source.parent().unwrap_or(Path::new(""));
        let rewrite = match self.options.rewrite_policy {
            RewritePolicy::Never => None,
            RewritePolicy::AllRelative => Some(rewrite_imports(text, |_| true)),
            RewritePolicy::PromotedOnly => Some(rewrite_imports(text, |target| {
                promoted.contains(&resolve_reference(source_dir, target))
            })),
        };

        match rewrite {
            Some(rewrite) => {
                fs::write(&file.destination, rewrite.content.as_bytes())?;
                Ok(rewrite.rewritten)
            }
            None => {
                fs::write(&file.destination, text)?;
                Ok(0)
            }
        }
    }
}

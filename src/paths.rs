//! Path resolution and common-base computation
//!
//! Everything here is pure path algebra: nothing touches the filesystem, so
//! references to files that do not exist yet still resolve. Existence is
//! checked later, when files are copied.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Component, MAIN_SEPARATOR_STR, Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::error::{GraftError, Result};
use crate::graph::DependencyGraph;

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` never climbs above a root or drive prefix.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Resolve an analyzer reference against `base_dir`.
///
/// Both `/` and `\` are accepted as separators in `reference`. Absolute
/// references ignore `base_dir`.
pub fn resolve_reference(base_dir: &Path, reference: &str) -> PathBuf {
    let native = reference.replace(['/', '\\'], MAIN_SEPARATOR_STR);
    normalize_lexically(&base_dir.join(native))
}

/// Whether two path components name the same thing.
///
/// Exact on case-sensitive platforms; ASCII case-insensitive on Windows.
/// Compares raw `OsStr` values, so distinct non-UTF-8 names stay distinct.
pub fn same_component(a: &Component<'_>, b: &Component<'_>) -> bool {
    if cfg!(windows) {
        a.as_os_str().eq_ignore_ascii_case(b.as_os_str())
    } else {
        a == b
    }
}

/// Key used for de-duplication: components joined with `/`, ASCII-lowercased
/// on Windows to match [`same_component`].
fn dedup_key(path: &Path) -> OsString {
    let mut key = OsString::new();
    for (i, component) in path.components().enumerate() {
        if i > 0 {
            key.push("/");
        }
        key.push(component.as_os_str());
    }
    if cfg!(windows) {
        key.make_ascii_lowercase();
    }
    key
}

/// De-duplicated set of absolute paths.
///
/// Iteration order is sorted by the de-duplication key, so two runs over the
/// same graph visit files in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsolutePathSet {
    entries: BTreeMap<OsString, PathBuf>,
}

impl AbsolutePathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path; returns `false` when an equivalent path is already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        let key = dedup_key(&path);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, path);
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&dedup_key(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.values().map(PathBuf::as_path)
    }

    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.entries.values().cloned().collect()
    }
}

impl Extend<PathBuf> for AbsolutePathSet {
    fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path);
        }
    }
}

impl FromIterator<PathBuf> for AbsolutePathSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Serialize for AbsolutePathSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Resolve the entry file and every graph reference to absolute paths.
///
/// References are resolved against the entry file's directory. An empty
/// graph yields a set holding only the entry file.
pub fn resolve_graph(graph: &DependencyGraph, entry: &Path) -> AbsolutePathSet {
    let entry = normalize_lexically(entry);
    let base_dir = entry.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut set = AbsolutePathSet::new();
    set.insert(entry);
    set.extend(
        graph
            .references()
            .map(|reference| resolve_reference(&base_dir, reference)),
    );
    set
}

/// Longest common component prefix of all paths.
///
/// A left fold truncating the running prefix at the first divergence. The
/// result is empty when the paths disagree at the first component, i.e. sit
/// on different roots or drives.
pub fn common_components<'a>(paths: &[&'a Path]) -> Vec<Component<'a>> {
    let mut iter = paths.iter().map(|&p| p.components());
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut common: Vec<Component<'a>> = first.collect();
    for components in iter {
        let shared = common
            .iter()
            .zip(components)
            .take_while(|(a, b)| same_component(a, b))
            .count();
        common.truncate(shared);
    }

    common
}

/// Deepest directory shared by every path.
///
/// With a single input the result is that path itself; callers that need a
/// directory must handle that case. Paths on different roots share nothing
/// and produce [`GraftError::NoCommonBase`] naming two offending paths.
pub fn find_common_base<P: AsRef<Path>>(paths: &[P]) -> Result<PathBuf> {
    let paths: Vec<&Path> = paths.iter().map(|p| p.as_ref()).collect();
    let Some(&first) = paths.first() else {
        return Err(GraftError::EmptyPathSet);
    };

    let common = common_components(&paths);
    if common.is_empty() {
        let head = first.components().next();
        let second = paths
            .iter()
            .copied()
            .find(|p| match (p.components().next(), &head) {
                (Some(a), Some(b)) => !same_component(&a, b),
                (a, b) => a.is_some() != b.is_some(),
            })
            .unwrap_or(first);
        return Err(GraftError::NoCommonBase {
            first: first.to_path_buf(),
            second: second.to_path_buf(),
        });
    }

    Ok(common.iter().collect())
}

/// `path` relative to `base`, compared with [`same_component`].
///
/// `None` when `base` is not a prefix of `path`.
pub fn strip_base(path: &Path, base: &Path) -> Option<PathBuf> {
    let mut rest = path.components();
    for expected in base.components() {
        let actual = rest.next()?;
        if !same_component(&actual, &expected) {
            return None;
        }
    }
    Some(rest.as_path().to_path_buf())
}

//! Polling change detection.
//!
//! A `Snapshot` records modification time, size and kind for every entry
//! under the root. Diffing two snapshots yields the paths an index must
//! upsert or remove to catch up with the disk, reduced to their minimal
//! ancestor cover so a changed directory is re-walked once instead of once
//! per child.

use crate::error::{QuireError, Result};
use crate::scope::SkipList;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// What the poller remembers about one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStamp {
    pub modified: Option<SystemTime>,
    pub size: u64,
    pub is_dir: bool,
}

/// Filesystem state at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<PathBuf, EntryStamp>,
}

/// Paths that differ between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Added or modified entries
    pub changed: Vec<PathBuf>,

    /// Entries that no longer exist
    pub removed: Vec<PathBuf>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changed.len() + self.removed.len()
    }
}

impl Snapshot {
    /// Record every entry below `root`, pruning skip-listed names.
    pub fn scan(root: &Path, skip: &SkipList) -> Result<Self> {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !skip.should_skip(&entry.file_name().to_string_lossy()));

        let mut entries = BTreeMap::new();
        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                let source = err.into_io_error().unwrap_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected")
                });
                QuireError::ReadDir { path, source }
            })?;
            // Entries can vanish between listing and stat.
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            let stamp = EntryStamp {
                modified: meta.modified().ok(),
                size: if meta.is_dir() { 0 } else { meta.len() },
                is_dir: meta.is_dir(),
            };
            entries.insert(entry.into_path(), stamp);
        }

        Ok(Snapshot { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// What changed going from `old` to `self`.
    ///
    /// Both lists are coalesced to their minimal ancestor cover.
    pub fn diff(&self, old: &Snapshot) -> SnapshotDiff {
        let changed: Vec<PathBuf> = self
            .entries
            .iter()
            .filter(|(path, stamp)| old.entries.get(*path) != Some(*stamp))
            .map(|(path, _)| path.clone())
            .collect();
        let removed: Vec<PathBuf> = old
            .entries
            .keys()
            .filter(|path| !self.entries.contains_key(*path))
            .cloned()
            .collect();

        let diff = SnapshotDiff {
            changed: coalesce_paths(changed),
            removed: coalesce_paths(removed),
        };
        if !diff.is_empty() {
            debug!(changed = diff.changed.len(), removed = diff.removed.len(), "Snapshot diff");
        }
        diff
    }
}

/// Reduce a batch of paths to the smallest set that covers them all.
///
/// Any path with an ancestor in the batch is dropped, as are duplicates.
/// The result is ordered shallowest first, then by path.
pub fn coalesce_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.len() <= 1 {
        return paths;
    }

    let mut candidates: Vec<(PathBuf, usize)> = paths
        .into_iter()
        .map(|path| {
            let depth = path.components().count();
            (path, depth)
        })
        .collect();
    candidates.sort_unstable_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));
    candidates.dedup_by(|(a, _), (b, _)| a == b);

    let mut selected = Vec::with_capacity(candidates.len());
    let mut seen = HashSet::with_capacity(candidates.len());
    for (path, _) in candidates {
        if path.ancestors().any(|ancestor| seen.contains(ancestor)) {
            continue;
        }
        seen.insert(path.clone());
        selected.push(path);
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_scan_skips_managed_dir() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.md", "one");
        write(root, ".quire/usage.json", "{}");
        write(root, "dir/b.md", "two");

        let snap = Snapshot::scan(root, &SkipList::default()).unwrap();
        assert_eq!(snap.len(), 3);
        assert!(snap.entries.get(&root.join("dir")).unwrap().is_dir);
        assert_eq!(snap.entries.get(&root.join("a.md")).unwrap().size, 3);
        assert!(snap.entries.get(&root.join(".quire")).is_none());
    }

    #[test]
    fn test_diff_reports_added_modified_removed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let keep = write(root, "keep.md", "same");
        let edit = write(root, "edit.md", "short");
        let gone = write(root, "gone.md", "bye");
        let before = Snapshot::scan(root, &SkipList::default()).unwrap();

        write(root, "edit.md", "a good deal longer");
        fs::remove_file(&gone).unwrap();
        let added = write(root, "added.md", "hi");
        let after = Snapshot::scan(root, &SkipList::default()).unwrap();

        let diff = after.diff(&before);
        assert_eq!(diff.changed, vec![added, edit]);
        assert_eq!(diff.removed, vec![gone]);
        assert!(!diff.changed.contains(&keep));
    }

    #[test]
    fn test_diff_of_identical_snapshots_is_empty() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.md", "x");
        let snap = Snapshot::scan(temp.path(), &SkipList::default()).unwrap();
        assert!(snap.diff(&snap.clone()).is_empty());
    }

    #[test]
    fn test_diff_coalesces_removed_subtree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "dir/a.md", "x");
        write(root, "dir/sub/b.md", "y");
        let before = Snapshot::scan(root, &SkipList::default()).unwrap();

        fs::remove_dir_all(root.join("dir")).unwrap();
        let after = Snapshot::scan(root, &SkipList::default()).unwrap();

        let diff = after.diff(&before);
        assert_eq!(diff.removed, vec![root.join("dir")]);
        assert!(diff.changed.is_empty());
    }

    #[test]
    fn test_scan_missing_root_errors() {
        let temp = TempDir::new().unwrap();
        let err = Snapshot::scan(&temp.path().join("nope"), &SkipList::default()).unwrap_err();
        assert!(matches!(err, QuireError::ReadDir { .. }));
    }

    #[test]
    fn test_coalesce_paths() {
        let paths = vec![
            PathBuf::from("/a/b/c"),
            PathBuf::from("/a/b"),
            PathBuf::from("/x/y"),
            PathBuf::from("/a/b"),
            PathBuf::from("/a/bc"),
        ];
        assert_eq!(
            coalesce_paths(paths),
            vec![PathBuf::from("/a/b"), PathBuf::from("/a/bc"), PathBuf::from("/x/y")]
        );
    }

    #[test]
    fn test_coalesce_paths_small_inputs() {
        assert!(coalesce_paths(Vec::new()).is_empty());
        assert_eq!(coalesce_paths(vec![PathBuf::from("/a")]), vec![PathBuf::from("/a")]);
    }
}

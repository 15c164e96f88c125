//! Path-keyed document storage.
//!
//! Documents live in a `BTreeMap` keyed by absolute path. `PathBuf` orders
//! component by component, so every strict descendant of a directory sorts
//! into one contiguous run directly after the directory itself. Subtree
//! removal is therefore a range scan instead of a full pass over the map.

use crate::types::Document;
use std::collections::btree_map::{BTreeMap, Values};
use std::ops::Bound;
use std::path::{Path, PathBuf};

/// The in-memory document store plus its readiness flag.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: BTreeMap<PathBuf, Document>,
    ready: bool,
}

impl DocumentStore {
    /// Create an empty, unready store.
    pub fn new() -> Self {
        Self::default()
    }

    /// True after a successful full build, until invalidated.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub(crate) fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&Document> {
        self.docs.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.docs.contains_key(path)
    }

    /// Documents in path order.
    pub fn iter(&self) -> Values<'_, PathBuf, Document> {
        self.docs.values()
    }

    /// Insert or replace the document at `doc.path`.
    pub fn insert(&mut self, doc: Document) -> Option<Document> {
        self.docs.insert(doc.path.clone(), doc)
    }

    /// Remove a single document, leaving descendants in place.
    pub fn remove(&mut self, path: &Path) -> Option<Document> {
        self.docs.remove(path)
    }

    /// Remove every document strictly below `path`. Returns how many went.
    pub fn remove_descendants(&mut self, path: &Path) -> usize {
        let doomed: Vec<PathBuf> = self
            .docs
            .range::<Path, _>((Bound::Excluded(path), Bound::Unbounded))
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(path))
            .cloned()
            .collect();

        for key in &doomed {
            self.docs.remove(key);
        }
        doomed.len()
    }

    /// Remove `path` and everything below it. Returns how many went.
    pub fn remove_subtree(&mut self, path: &Path) -> usize {
        let own = usize::from(self.docs.remove(path).is_some());
        own + self.remove_descendants(path)
    }

    /// Swap in the contents of a freshly built store.
    pub(crate) fn replace_with(&mut self, other: DocumentStore) {
        *self = other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, is_dir: bool) -> Document {
        let path = PathBuf::from(path);
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        Document::new(path, name, 0, is_dir)
    }

    fn make_store() -> DocumentStore {
        let mut store = DocumentStore::new();
        for (path, is_dir) in [
            ("/root/parent", true),
            ("/root/parent/child.md", false),
            ("/root/parent/sub", true),
            ("/root/parent/sub/grandchild.md", false),
            ("/root/parent-sibling.md", false),
            ("/root/parentless", true),
            ("/root/unrelated.md", false),
        ] {
            store.insert(doc(path, is_dir));
        }
        store
    }

    #[test]
    fn test_insert_replaces_same_path() {
        let mut store = DocumentStore::new();
        assert!(store.insert(doc("/root/a.md", false)).is_none());
        assert!(store.insert(doc("/root/a.md", false)).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_descendants_is_strict() {
        let mut store = make_store();
        let removed = store.remove_descendants(Path::new("/root/parent"));

        assert_eq!(removed, 3);
        assert!(store.contains(Path::new("/root/parent")));
        assert!(store.contains(Path::new("/root/parent-sibling.md")));
        assert!(store.contains(Path::new("/root/parentless")));
        assert!(!store.contains(Path::new("/root/parent/sub/grandchild.md")));
    }

    #[test]
    fn test_remove_subtree() {
        let mut store = make_store();
        let removed = store.remove_subtree(Path::new("/root/parent"));

        assert_eq!(removed, 4);
        let left: Vec<_> = store.iter().map(|d| d.path.clone()).collect();
        assert_eq!(
            left,
            vec![
                PathBuf::from("/root/parent-sibling.md"),
                PathBuf::from("/root/parentless"),
                PathBuf::from("/root/unrelated.md"),
            ]
        );
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = make_store();
        assert_eq!(store.remove_subtree(Path::new("/root/nope")), 0);
        assert_eq!(store.len(), 7);
    }
}

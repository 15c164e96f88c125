//! Full and subtree directory walks.
//!
//! The walk is iterative (walkdir keeps its own stack of open directories),
//! descends into every directory, and prunes skip-listed names at every
//! level. Entries within a directory are visited directories-first, then by
//! case-insensitive name.

use crate::error::{QuireError, Result};
use crate::extract::extract;
use crate::index::IndexOptions;
use crate::store::DocumentStore;
use crate::types::Document;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use walkdir::{DirEntry, WalkDir};

/// Walk the whole root into a fresh store.
///
/// Any directory that cannot be listed aborts the build; nothing partial is
/// returned. On success the store is marked ready.
#[instrument(skip(root, options), fields(root = %root.display()))]
pub fn build(root: &Path, options: &IndexOptions) -> Result<DocumentStore> {
    let mut store = DocumentStore::new();
    let count = walk_into(&mut store, root, 0, options)?;
    store.set_ready(true);

    info!(documents = count, "Index build complete");
    Ok(store)
}

/// Index every entry below `dir` into `store`, with `dir`'s children at
/// `depth`.
///
/// Documents are inserted as they are visited, so on error everything seen
/// before the failing directory stays in the store.
pub(crate) fn walk_into(
    store: &mut DocumentStore,
    dir: &Path,
    depth: usize,
    options: &IndexOptions,
) -> Result<usize> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by(compare_entries)
        .into_iter()
        .filter_entry(|entry| !options.skip.should_skip(&entry.file_name().to_string_lossy()));

    let mut count = 0;
    for entry in walker {
        let entry = entry.map_err(|err| read_dir_error(err, dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().is_dir();
        let entry_depth = depth + entry.depth() - 1;
        let meta = entry.metadata().ok();

        store.insert(index_entry(
            entry.into_path(),
            name,
            entry_depth,
            is_dir,
            meta.as_ref(),
            options,
        ));
        count += 1;
    }

    Ok(count)
}

/// Build the document for one filesystem entry.
pub(crate) fn index_entry(
    path: PathBuf,
    name: String,
    depth: usize,
    is_dir: bool,
    meta: Option<&Metadata>,
    options: &IndexOptions,
) -> Document {
    let mut doc = Document::new(path, name, depth, is_dir);

    if let Some(modified) = meta.and_then(|m| m.modified().ok()) {
        doc = doc.with_modified(DateTime::<Utc>::from(modified));
    }
    if is_dir {
        return doc;
    }
    if let Some(meta) = meta {
        doc = doc.with_size(meta.len());
    }

    let extracted = extract(&doc.path, &options.extract);
    doc.with_content(&extracted.body, extracted.metadata)
}

/// Directories first, then case-insensitive name.
fn compare_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    b_dir.cmp(&a_dir).then_with(|| {
        a.file_name()
            .to_string_lossy()
            .to_lowercase()
            .cmp(&b.file_name().to_string_lossy().to_lowercase())
    })
}

fn read_dir_error(err: walkdir::Error, fallback: &Path) -> QuireError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| fallback.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop detected"));
    QuireError::ReadDir { path, source }
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
    fn test_build_indexes_whole_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "Alpha.md", "project zeus\n");
        write(root, "Docs/Guide.md", "---\ntitle: Guide\n---\nno match\n");
        write(root, "Docs/Deep/notes.txt", "project zeus\n");

        let store = build(root, &IndexOptions::default()).unwrap();
        assert!(store.is_ready());
        assert_eq!(store.len(), 5);

        let docs = store.get(&root.join("Docs")).unwrap();
        assert!(docs.is_dir);
        assert_eq!(docs.depth, 0);

        let guide = store.get(&root.join("Docs/Guide.md")).unwrap();
        assert_eq!(guide.depth, 1);
        assert_eq!(guide.metadata.title, "Guide");
        assert_eq!(guide.content_lower, "no match\n");

        let txt = store.get(&root.join("Docs/Deep/notes.txt")).unwrap();
        assert_eq!(txt.depth, 2);
        assert!(txt.content_lower.is_empty());
        assert_eq!(txt.size, Some(13));
    }

    #[test]
    fn test_build_skips_managed_dir_at_any_level() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, ".quire/usage.json", "{}");
        write(root, "Sub/.QUIRE/draft.md", "hidden");
        write(root, "Sub/visible.md", "shown");

        let store = build(root, &IndexOptions::default()).unwrap();
        let names: Vec<_> = store.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Sub", "visible.md"]);
    }

    #[test]
    fn test_build_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let err = build(&missing, &IndexOptions::default()).unwrap_err();
        match err {
            QuireError::ReadDir { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_build_unreadable_subdir_fails_with_path() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "ok.md", "fine");
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind root.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let err = build(root, &IndexOptions::default()).unwrap_err();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        match err {
            QuireError::ReadDir { path, .. } => assert_eq!(path, locked),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.md", "one");
        write(root, "b/c.md", "two");

        let first = build(root, &IndexOptions::default()).unwrap();
        let second = build(root, &IndexOptions::default()).unwrap();
        let first: Vec<_> = first.iter().map(|d| (d.path.clone(), d.content_lower.clone())).collect();
        let second: Vec<_> = second.iter().map(|d| (d.path.clone(), d.content_lower.clone())).collect();
        assert_eq!(first, second);
    }
}

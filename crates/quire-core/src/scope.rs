//! Root scoping helpers.
//!
//! Every path the index touches is checked against the notes root and the
//! skip list before anything is read. All checks are lexical: no symlinks are
//! resolved, so callers should hand in absolute paths built from the root.

use std::path::{Component, Path, PathBuf};

/// Default name of the managed bookkeeping directory inside the root.
pub const MANAGED_DIR_NAME: &str = ".quire";

/// Entry names that are never indexed, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipList {
    names: Vec<String>,
}

impl SkipList {
    /// Skip list containing the managed directory plus `extra` names.
    pub fn new<I, S>(managed_dir: &str, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = vec![managed_dir.to_lowercase()];
        for name in extra {
            let name = name.as_ref().trim().to_lowercase();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        SkipList { names }
    }

    /// Check a single entry name (not a full path).
    pub fn should_skip(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.names.iter().any(|n| *n == name)
    }

    /// Check every component of `path` below `root`.
    pub fn skips_path(&self, root: &Path, path: &Path) -> bool {
        match path.strip_prefix(root) {
            Ok(rel) => rel
                .components()
                .any(|c| self.should_skip(&c.as_os_str().to_string_lossy())),
            Err(_) => false,
        }
    }

    /// The managed directory name this list was built around.
    pub fn managed_dir(&self) -> &str {
        &self.names[0]
    }
}

impl Default for SkipList {
    fn default() -> Self {
        SkipList::new(MANAGED_DIR_NAME, std::iter::empty::<&str>())
    }
}

/// Reports whether `path` is `root` or lies beneath it.
pub fn is_within_root(root: &Path, path: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}

/// Levels below the root, counting the root's direct children as 0.
///
/// The root itself and paths outside the root are also reported as 0.
pub fn depth_from_root(root: &Path, path: &Path) -> usize {
    let path = normalize(path);
    let root = normalize(root);
    match path.strip_prefix(&root) {
        Ok(rel) => rel.components().count().saturating_sub(1),
        Err(_) => 0,
    }
}

/// Lexically clean a path: drop `.` components and fold `..` into its parent.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Final path component as a string, lossily decoded.
pub(crate) fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_from_root() {
        let root = Path::new("/notes");
        assert_eq!(depth_from_root(root, root), 0);
        assert_eq!(depth_from_root(root, Path::new("/notes/child")), 0);
        assert_eq!(depth_from_root(root, Path::new("/notes/a/b/c")), 2);
        assert_eq!(depth_from_root(root, Path::new("/elsewhere/x")), 0);
    }

    #[test]
    fn test_is_within_root() {
        let root = Path::new("/notes");
        assert!(is_within_root(root, root));
        assert!(is_within_root(root, Path::new("/notes/child")));
        assert!(!is_within_root(root, Path::new("/")));
        assert!(!is_within_root(root, Path::new("/sibling")));
        assert!(!is_within_root(root, Path::new("/notes-other/x")));
        assert!(!is_within_root(root, Path::new("/notes/../escape")));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/")), PathBuf::from("/a/b"));
    }

    #[test]
    fn test_skip_list() {
        let skip = SkipList::new(".quire", ["node_modules", " ", ".QUIRE"]);
        assert!(skip.should_skip(".quire"));
        assert!(skip.should_skip(".Quire"));
        assert!(skip.should_skip("Node_Modules"));
        assert!(!skip.should_skip("notes"));
        assert_eq!(skip.managed_dir(), ".quire");
    }

    #[test]
    fn test_skips_path_checks_ancestors() {
        let skip = SkipList::default();
        let root = Path::new("/notes");
        assert!(skip.skips_path(root, Path::new("/notes/.quire")));
        assert!(skip.skips_path(root, Path::new("/notes/.quire/usage.json")));
        assert!(skip.skips_path(root, Path::new("/notes/a/.Quire/b.md")));
        assert!(!skip.skips_path(root, Path::new("/notes/a/b.md")));
    }
}

//! In-memory note index.
//!
//! The `Index` owns the document store for one notes root and exposes every
//! operation the hosting application needs:
//!
//! - Lazy full builds (`ensure_built`) and staleness marking (`invalidate`)
//! - Incremental maintenance after creates, saves, deletes, renames, moves
//! - Text/tag search, wiki-link resolution, autocomplete targets
//!
//! ## Ownership
//!
//! The index is a plain owned value. Mutating operations take `&mut self`,
//! so there is no locking and no background thread: a caller that needs the
//! index from several places passes it by reference. Incremental operations
//! are ignored while the index is not ready; the next read rebuilds instead.

use crate::error::{QuireError, Result};
use crate::extract::ExtractOptions;
use crate::scope::{self, SkipList};
use crate::search::{compare_results, parse_query, SearchQuery};
use crate::store::DocumentStore;
use crate::types::{file_stem, Document, DocumentSummary, IndexStats, NoteTarget};
use crate::walker;
use crate::watch::{coalesce_paths, SnapshotDiff};
use crate::wiki::{parse_wiki_links, WikiLink};
use chrono::Utc;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Default store size above which search filters in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10_000;

/// Tunables for building and querying an index.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Content extraction limits
    pub extract: ExtractOptions,

    /// Names skipped at every level of the tree
    pub skip: SkipList,

    /// Use rayon for large stores
    pub parallel_search: bool,

    /// Store size above which the parallel path is taken
    pub parallel_threshold: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            extract: ExtractOptions::default(),
            skip: SkipList::default(),
            parallel_search: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// The note index for a single root directory.
///
/// ## Example
///
/// ```no_run
/// use quire_core::Index;
///
/// let mut index = Index::new("/home/me/notes")?;
/// index.ensure_built()?;
/// for hit in index.search("meeting tag:work") {
///     println!("{}", hit.path.display());
/// }
/// # Ok::<(), quire_core::QuireError>(())
/// ```
#[derive(Debug)]
pub struct Index {
    root: PathBuf,
    options: IndexOptions,
    store: DocumentStore,
    generation: u64,
    last_built: Option<chrono::DateTime<Utc>>,
}

impl Index {
    /// Create an unbuilt index with default options.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(root, IndexOptions::default())
    }

    /// Create an unbuilt index rooted at an existing directory.
    pub fn with_options(root: impl AsRef<Path>, options: IndexOptions) -> Result<Self> {
        let root = absolute_root(root.as_ref())?;
        let meta = fs::metadata(&root).map_err(|_| QuireError::RootNotFound { path: root.clone() })?;
        if !meta.is_dir() {
            return Err(QuireError::RootNotDirectory { path: root });
        }

        Ok(Index {
            root,
            options,
            store: DocumentStore::new(),
            generation: 0,
            last_built: None,
        })
    }

    /// The indexed root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// True once built, until the next `invalidate`.
    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get the current generation (modification counter).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Look up a single indexed document.
    pub fn get(&self, path: &Path) -> Option<&Document> {
        self.store.get(&scope::normalize(path))
    }

    /// Build the index if it is not ready. Idempotent.
    pub fn ensure_built(&mut self) -> Result<()> {
        if self.store.is_ready() {
            return Ok(());
        }
        self.build()
    }

    /// Rebuild from scratch, replacing the current store on success.
    ///
    /// On failure the index is left unready so the next `ensure_built`
    /// retries.
    pub fn build(&mut self) -> Result<()> {
        match walker::build(&self.root, &self.options) {
            Ok(store) => {
                self.store.replace_with(store);
                self.last_built = Some(Utc::now());
                self.bump();
                Ok(())
            }
            Err(err) => {
                self.store.set_ready(false);
                Err(err)
            }
        }
    }

    /// Mark the index stale without dropping its contents.
    pub fn invalidate(&mut self) {
        self.store.set_ready(false);
    }

    /// Re-index one path after it was created, saved, or moved in.
    ///
    /// A path that no longer exists is removed. For directories, every
    /// previously indexed descendant is dropped and the subtree is walked
    /// again. Walk errors are logged and leave whatever was indexed before
    /// the failure in place.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn upsert_path(&mut self, path: &Path) {
        if !self.store.is_ready() {
            return;
        }
        let path = scope::normalize(path);
        if !scope::is_within_root(&self.root, &path) {
            return;
        }
        if path == self.root {
            // The root has no document of its own; refresh what is below it.
            let root = self.root.clone();
            self.reindex_children(&root, 0);
            return;
        }
        if self.options.skip.skips_path(&self.root, &path) {
            return;
        }
        let name = scope::entry_name(&path);

        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(_) => {
                debug!("path vanished, removing");
                self.remove_path(&path);
                return;
            }
        };

        let depth = scope::depth_from_root(&self.root, &path);
        let is_dir = meta.is_dir();
        let doc = walker::index_entry(path.clone(), name, depth, is_dir, Some(&meta), &self.options);
        self.store.insert(doc);
        self.bump();

        if !is_dir {
            debug!("file reindexed");
            return;
        }

        self.reindex_children(&path, depth + 1);
    }

    /// Drop everything indexed below `dir` and walk it again, with its
    /// children at `depth`.
    fn reindex_children(&mut self, dir: &Path, depth: usize) {
        let dropped = self.store.remove_descendants(dir);
        match walker::walk_into(&mut self.store, dir, depth, &self.options) {
            Ok(count) => debug!(dropped, indexed = count, "subtree reindexed"),
            Err(err) => warn!(error = %err, "update search descendants"),
        }
        self.bump();
    }

    /// Drop a path and everything below it.
    pub fn remove_path(&mut self, path: &Path) {
        if !self.store.is_ready() {
            return;
        }
        let path = scope::normalize(path);
        let removed = self.store.remove_subtree(&path);
        if removed > 0 {
            debug!(path = %path.display(), removed, "removed from index");
            self.bump();
        }
    }

    /// Move bookkeeping: clear the old subtree, then index the new location.
    pub fn rename_path(&mut self, old: &Path, new: &Path) {
        if old != new {
            self.remove_path(old);
        }
        self.upsert_path(new);
    }

    /// Apply a filesystem snapshot diff: removals first, then changes.
    pub fn apply_diff(&mut self, diff: &SnapshotDiff) {
        for path in &diff.removed {
            self.remove_path(path);
        }
        for path in coalesce_paths(diff.changed.clone()) {
            self.upsert_path(&path);
        }
    }

    /// Search with a raw query string.
    ///
    /// Returns nothing for an empty query. Results are ordered
    /// directories-first, then by case-insensitive path.
    pub fn search(&self, raw: &str) -> Vec<DocumentSummary> {
        let query = parse_query(raw);
        if query.is_empty() {
            return Vec::new();
        }

        let mut results = if self.options.parallel_search
            && self.store.len() > self.options.parallel_threshold
        {
            self.search_parallel(&query)
        } else {
            self.search_sequential(&query)
        };
        results.sort_by(compare_results);
        results
    }

    /// Search, keeping only the first `limit` ordered results.
    pub fn search_limited(&self, raw: &str, limit: usize) -> Vec<DocumentSummary> {
        let mut results = self.search(raw);
        results.truncate(limit);
        results
    }

    fn search_sequential(&self, query: &SearchQuery) -> Vec<DocumentSummary> {
        self.store
            .iter()
            .filter(|doc| query.matches(doc))
            .map(Document::summary)
            .collect()
    }

    fn search_parallel(&self, query: &SearchQuery) -> Vec<DocumentSummary> {
        let docs: Vec<&Document> = self.store.iter().collect();
        docs.par_iter()
            .filter(|doc| query.matches(doc))
            .map(|doc| doc.summary())
            .collect()
    }

    /// All indexed notes as autocomplete candidates, by case-insensitive path.
    pub fn note_targets(&self) -> Vec<NoteTarget> {
        let mut out: Vec<NoteTarget> = self
            .store
            .iter()
            .filter(|doc| !doc.is_dir && self.options.extract.is_note(&doc.path))
            .map(|doc| NoteTarget::new(doc.path.clone(), doc.metadata.title.clone(), doc.stem()))
            .collect();
        out.sort_by_cached_key(|t| t.path.to_string_lossy().to_lowercase());
        out
    }

    /// Resolve a wiki-link label to a note path.
    ///
    /// Titles are tried before filename stems. Both comparisons are exact
    /// after trimming and case folding. When several notes share a label the
    /// one with the smallest path wins.
    pub fn resolve_wiki_target(&self, label: &str) -> Option<PathBuf> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }

        let files = || self.store.iter().filter(|doc| !doc.is_dir);
        files()
            .find(|doc| doc.metadata.title.trim().to_lowercase() == label)
            .or_else(|| files().find(|doc| file_stem(&doc.name).trim().to_lowercase() == label))
            .map(|doc| doc.path.clone())
    }

    /// Extract every `[[label]]` from note content and resolve each one.
    pub fn resolve_links(&self, content: &str) -> Vec<WikiLink> {
        parse_wiki_links(content)
            .into_iter()
            .map(|label| {
                let target = self.resolve_wiki_target(&label);
                WikiLink { label, target }
            })
            .collect()
    }

    /// Counts over the current store.
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            last_built: self.last_built,
            generation: self.generation,
            ..Default::default()
        };
        for doc in self.store.iter() {
            if doc.is_dir {
                stats.total_dirs += 1;
                continue;
            }
            stats.total_files += 1;
            stats.total_size += doc.size.unwrap_or(0);
            if self.options.extract.is_note(&doc.path) {
                stats.total_notes += 1;
            }
        }
        stats
    }

    fn bump(&mut self) {
        self.generation += 1;
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf> {
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    Ok(scope::normalize(&root))
}

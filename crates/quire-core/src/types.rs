//! Core data types for Quire.
//!
//! This module defines the records held by the document store and the
//! lightweight views handed back to callers:
//!
//! - **Document**: one indexed filesystem entry with case-folded projections
//! - **DocumentSummary**: the serializable row returned by `search`
//! - **NoteTarget**: an autocomplete candidate for wiki links
//! - **TagSet**: ordered, deduplicated, lowercase tag collection

use crate::frontmatter::NoteMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ordered set of lowercase tags.
///
/// Insertion order is kept for display; membership is exact on the
/// normalized (trimmed, lowercased) form. Notes carry a handful of tags, so a
/// linear scan beats hashing here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Create an empty tag set
    pub fn new() -> Self {
        TagSet(Vec::new())
    }

    /// Insert a tag after normalizing it. Returns false for empty or
    /// duplicate tags.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || self.0.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        self.0.iter().any(|t| *t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact badge label: at most `max_tags` tags joined by commas, with a
    /// trailing `,+` when some were cut.
    pub fn compact_label(&self, max_tags: usize) -> String {
        if self.0.is_empty() || max_tags == 0 {
            return String::new();
        }
        if self.0.len() <= max_tags {
            return self.0.join(",");
        }
        format!("{},+", self.0[..max_tags].join(","))
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag.as_ref());
        }
        set
    }
}

/// A record representing a single file or directory in the index.
///
/// ## Design Notes
///
/// - All `*_lower` fields are pre-folded so matching is a plain `contains`
/// - Directories never carry content or metadata
/// - `depth` counts levels below the root; the root's children are depth 0
#[derive(Debug, Clone)]
pub struct Document {
    /// Absolute path, the store key
    pub path: PathBuf,

    /// Base name (e.g., "Project Plan.md")
    pub name: String,

    /// Distance from the root
    pub depth: usize,

    /// True if this is a directory, false for files
    pub is_dir: bool,

    pub name_lower: String,
    pub content_lower: String,
    pub title_lower: String,
    pub category_lower: String,

    /// Parsed metadata block (files only)
    pub metadata: NoteMetadata,

    /// File size in bytes (None for directories or if unavailable)
    pub size: Option<u64>,

    /// Last modification time
    pub modified: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a name-only document.
    ///
    /// The `name_lower` field is automatically computed from `name`.
    pub fn new(path: PathBuf, name: String, depth: usize, is_dir: bool) -> Self {
        let name_lower = name.to_lowercase();
        Document {
            path,
            name,
            depth,
            is_dir,
            name_lower,
            content_lower: String::new(),
            title_lower: String::new(),
            category_lower: String::new(),
            metadata: NoteMetadata::default(),
            size: None,
            modified: None,
        }
    }

    /// Attach extracted body text and metadata. Ignored for directories.
    pub fn with_content(mut self, body: &str, metadata: NoteMetadata) -> Self {
        if self.is_dir {
            return self;
        }
        self.content_lower = body.to_lowercase();
        self.title_lower = metadata.title.to_lowercase();
        self.category_lower = metadata.category.to_lowercase();
        self.metadata = metadata;
        self
    }

    /// Set the file size
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the modification time
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Frontmatter tags (empty for directories and untagged notes)
    pub fn tags(&self) -> &TagSet {
        &self.metadata.tags
    }

    /// File name without its final extension ("a.b.md" -> "a.b").
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }

    /// Build the caller-facing summary row.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            path: self.path.clone(),
            name: self.name.clone(),
            depth: self.depth,
            is_dir: self.is_dir,
            tags: self.metadata.tags.clone(),
            title: self.metadata.title.clone(),
            size: self.size,
            modified: self.modified,
        }
    }
}

/// Strip the last `.ext` from a file name.
pub(crate) fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// A search result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub path: PathBuf,
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "TagSet::is_empty")]
    pub tags: TagSet,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

/// A wiki-link autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTarget {
    /// Absolute path of the note
    pub path: PathBuf,

    /// Frontmatter title (may be empty)
    pub title: String,

    /// File name without extension
    pub name: String,
}

impl NoteTarget {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>, name: impl Into<String>) -> Self {
        NoteTarget {
            path: path.into(),
            title: title.into(),
            name: name.into(),
        }
    }

    /// Text inserted for an accepted completion: the title, else the name.
    pub fn label(&self) -> Option<&str> {
        let title = self.title.trim();
        if !title.is_empty() {
            return Some(title);
        }
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Statistics about the index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Total number of files in the index
    pub total_files: u64,

    /// Total number of directories in the index
    pub total_dirs: u64,

    /// Files carrying the note extension
    pub total_notes: u64,

    /// Total size of all indexed files in bytes
    pub total_size: u64,

    /// When the last full build finished
    pub last_built: Option<DateTime<Utc>>,

    /// Mutation counter, bumped on every build and incremental change
    pub generation: u64,
}

impl IndexStats {
    /// Total number of entries (files + directories)
    pub fn total_entries(&self) -> u64 {
        self.total_files + self.total_dirs
    }
}

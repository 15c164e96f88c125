//! Document content extraction.
//!
//! Only notes (files with the note extension) contribute body text and
//! metadata. Everything else is indexed by name alone. Extraction never
//! fails: one unreadable file must not stop the rest of the tree from being
//! indexed, so every failure path yields an empty result.

use crate::frontmatter::{parse_frontmatter_and_body, NoteMetadata};
use std::fs;
use std::path::Path;
use tracing::trace;

/// Default ceiling for content indexing (1 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Default extension of indexable notes.
pub const DEFAULT_NOTE_EXTENSION: &str = "md";

/// Limits applied while extracting note content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Files larger than this are indexed by name only
    pub max_file_bytes: u64,

    /// Extension (without dot) of files whose content is indexed
    pub note_extension: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            note_extension: DEFAULT_NOTE_EXTENSION.to_string(),
        }
    }
}

impl ExtractOptions {
    /// Check whether a path carries the note extension (case-insensitive).
    ///
    /// The extension is everything after the last dot of the file name, so a
    /// file named just `.md` is a note.
    pub fn is_note(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        name.to_string_lossy()
            .rsplit_once('.')
            .map(|(_, ext)| ext.eq_ignore_ascii_case(&self.note_extension))
            .unwrap_or(false)
    }
}

/// Body text and metadata extracted from one note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub body: String,
    pub metadata: NoteMetadata,
}

/// Read a note's body and metadata block.
///
/// Returns an empty result for non-notes, directories, files over the size
/// ceiling, and anything that cannot be stat'ed or read.
pub fn extract(path: &Path, options: &ExtractOptions) -> Extracted {
    if !options.is_note(path) {
        return Extracted::default();
    }

    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            trace!(path = %path.display(), error = %err, "stat failed, skipping content");
            return Extracted::default();
        }
    };
    if meta.is_dir() {
        return Extracted::default();
    }
    if meta.len() > options.max_file_bytes {
        trace!(
            path = %path.display(),
            size = meta.len(),
            limit = options.max_file_bytes,
            "file over size ceiling, indexing name only"
        );
        return Extracted::default();
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            trace!(path = %path.display(), error = %err, "read failed, indexing name only");
            return Extracted::default();
        }
    };
    let content = String::from_utf8_lossy(&bytes);
    let (metadata, body) = parse_frontmatter_and_body(&content);

    Extracted {
        body: body.to_string(),
        metadata,
    }
}

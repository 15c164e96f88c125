//! Metadata block parsing for markdown notes.
//!
//! A note may start with a `---` delimited header:
//!
//! ```markdown
//! ---
//! title: "Project Plan"
//! date: 2025-02-07
//! category: work
//! tags: [go, cli, notes]
//! ---
//!
//! # Body starts here
//! ```
//!
//! This is deliberately not a YAML parser. Only flat `key: value` lines are
//! understood, values are kept as raw strings, and unknown keys are ignored.
//! `tags` may be an inline `[a, b]` list, a bare `a, b` list, or a block of
//! `- item` bullets on the following lines.

use crate::types::TagSet;
use serde::{Deserialize, Serialize};

const DELIMITER: &str = "---";

/// Structured metadata from a note's leading header block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteMetadata {
    /// Display title
    pub title: String,

    /// Date, stored exactly as written
    pub date: String,

    /// Organizational label
    pub category: String,

    /// Lowercase, deduplicated tags
    pub tags: TagSet,
}

/// Splits note content into its metadata block and remaining body.
///
/// When there is no well-formed block (no opening line, or no closing
/// delimiter), the metadata is empty and the body is the original content.
pub fn parse_frontmatter_and_body(content: &str) -> (NoteMetadata, &str) {
    let trimmed = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(after_open) = trimmed
        .strip_prefix("---\n")
        .or_else(|| trimmed.strip_prefix("---\r\n"))
    else {
        return (NoteMetadata::default(), content);
    };

    // Walk lines keeping byte offsets so the body can be sliced, not rebuilt.
    let mut offset = 0;
    let mut closing = None;
    for line in after_open.split_inclusive('\n') {
        if line.trim() == DELIMITER {
            closing = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((block_end, body_start)) = closing else {
        return (NoteMetadata::default(), content);
    };

    let meta = parse_simple_frontmatter(&after_open[..block_end]);
    (meta, &after_open[body_start..])
}

/// Parses the flat `key: value` subset used in note headers.
pub fn parse_simple_frontmatter(text: &str) -> NoteMetadata {
    let mut meta = NoteMetadata::default();
    let mut lines = text.lines().peekable();

    while let Some(raw) = lines.next() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim().to_lowercase().as_str() {
            "title" => meta.title = trim_quoted(value).to_string(),
            "date" => meta.date = trim_quoted(value).to_string(),
            "category" => meta.category = trim_quoted(value).to_string(),
            "tags" => {
                if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
                    meta.tags = inner.split(',').collect();
                } else if !value.is_empty() {
                    meta.tags = value.split(',').collect();
                } else {
                    let mut bullets = Vec::new();
                    while let Some(next) = lines.next_if(|l| l.trim().starts_with('-')) {
                        let item = next.trim();
                        bullets.push(item.strip_prefix('-').unwrap_or(item).trim());
                    }
                    meta.tags = bullets.into_iter().collect();
                }
            }
            _ => {}
        }
    }

    meta
}

/// Strip whitespace and any surrounding single or double quotes.
fn trim_quoted(value: &str) -> &str {
    value.trim().trim_matches(|c| c == '"' || c == '\'')
}

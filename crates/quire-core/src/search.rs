//! Query parsing and matching for Quire.
//!
//! A query is a whitespace-separated list of tokens:
//!
//! - `tag:<name>` - the document's tags must include `<name>` exactly
//! - anything else - a text term that must appear (case-insensitive
//!   substring) in the name, title, category, or note body
//!
//! All terms are ANDed together. There is no quoting, escaping, or operator
//! syntax beyond this.
//!
//! ## Example
//!
//! ```
//! use quire_core::search::parse_query;
//! let query = parse_query("meeting notes tag:work");
//! assert_eq!(query.text_terms(), &["meeting", "notes"]);
//! assert_eq!(query.tag_terms(), &["work"]);
//! ```

use crate::types::{Document, DocumentSummary};
use std::cmp::Ordering;

const TAG_PREFIX: &str = "tag:";

/// A parsed query, built fresh for each search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    text_terms: Vec<String>,
    tag_terms: Vec<String>,
}

impl SearchQuery {
    /// Lowercase text terms
    pub fn text_terms(&self) -> &[String] {
        &self.text_terms
    }

    /// Lowercase tag names, without the `tag:` prefix
    pub fn tag_terms(&self) -> &[String] {
        &self.tag_terms
    }

    /// True when the query has nothing to match on. Empty queries match
    /// nothing rather than everything.
    pub fn is_empty(&self) -> bool {
        self.text_terms.is_empty() && self.tag_terms.is_empty()
    }

    /// Check if a document satisfies both the tag and the text predicate.
    pub fn matches(&self, doc: &Document) -> bool {
        if self.is_empty() {
            return false;
        }
        matches_tags(doc, &self.tag_terms) && matches_text(doc, &self.text_terms)
    }
}

/// Parse a raw query string.
pub fn parse_query(input: &str) -> SearchQuery {
    let lowered = input.trim().to_lowercase();
    let mut query = SearchQuery::default();

    for token in lowered.split_whitespace() {
        if let Some(tag) = token.strip_prefix(TAG_PREFIX) {
            let tag = tag.trim();
            if !tag.is_empty() {
                query.tag_terms.push(tag.to_string());
            }
            continue;
        }
        query.text_terms.push(token.to_string());
    }

    query
}

/// Every term must occur in the name, title, category, or (files only) body.
fn matches_text(doc: &Document, terms: &[String]) -> bool {
    terms.iter().all(|term| {
        term.is_empty()
            || doc.name_lower.contains(term.as_str())
            || doc.title_lower.contains(term.as_str())
            || doc.category_lower.contains(term.as_str())
            || (!doc.is_dir && doc.content_lower.contains(term.as_str()))
    })
}

/// Every tag term must be an exact member of the document's tags.
///
/// Directories and untagged files never satisfy a non-empty tag filter.
fn matches_tags(doc: &Document, tags: &[String]) -> bool {
    if tags.is_empty() {
        return true;
    }
    if doc.is_dir || doc.tags().is_empty() {
        return false;
    }
    tags.iter().all(|tag| doc.tags().contains(tag))
}

/// Result order: directories first, then case-insensitive full path.
pub fn compare_results(a: &DocumentSummary, b: &DocumentSummary) -> Ordering {
    b.is_dir.cmp(&a.is_dir).then_with(|| {
        a.path
            .to_string_lossy()
            .to_lowercase()
            .cmp(&b.path.to_string_lossy().to_lowercase())
    })
}

//! `[[wiki link]]` scanning.
//!
//! Labels are the text between double brackets. Nested brackets are not
//! supported, and links inside ``` fenced blocks are ignored so code samples
//! do not produce false references.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::OnceLock;

const FENCE: &str = "```";

fn wiki_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("wiki link pattern is valid"))
}

/// One link found in a note, with its resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WikiLink {
    /// Trimmed text between the brackets
    pub label: String,

    /// Resolved note path, if any note answers to the label
    pub target: Option<PathBuf>,
}

impl WikiLink {
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// Extract unique link labels in order of first appearance.
///
/// Deduplication is case-insensitive; the first spelling seen is kept.
pub fn parse_wiki_links(content: &str) -> Vec<String> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut in_fence = false;

    for line in content.lines() {
        if line.trim().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        for caps in wiki_link_pattern().captures_iter(line) {
            let label = caps[1].trim();
            if label.is_empty() || !seen.insert(label.to_lowercase()) {
                continue;
            }
            out.push(label.to_string());
        }
    }

    out
}

/// Find the partial label being typed at `cursor` (a char offset).
///
/// Scans backward on the cursor's line for an unclosed `[[`. Returns `None`
/// if a `]]` or a newline comes first, if there is no `[[`, or if the text
/// typed so far contains a bracket.
pub fn current_wiki_prefix(text: &str, cursor: usize) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    let mut start = None;
    for i in (1..cursor).rev() {
        match (chars[i - 1], chars[i]) {
            ('[', '[') => {
                start = Some(i + 1);
                break;
            }
            (']', ']') => return None,
            (_, '\n') => break,
            _ => {}
        }
    }

    let start = start.filter(|&s| s <= cursor)?;
    let prefix: String = chars[start..cursor].iter().collect();
    if prefix.contains(['[', ']']) {
        return None;
    }
    Some(prefix.trim().to_string())
}

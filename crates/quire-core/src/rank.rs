//! Autocomplete ranking for wiki-link targets.
//!
//! A candidate scores on how the typed prefix meets its title and name, then
//! gets a bounded boost for how often it has been opened:
//!
//! | Condition             | Points |
//! |-----------------------|--------|
//! | title starts with     | 300    |
//! | name starts with      | 220    |
//! | title contains        | 120    |
//! | name contains         | 80     |
//! | opens (capped)        | 0..100 |
//!
//! With a non-empty prefix, candidates that earn no match points are
//! dropped. With an empty prefix every candidate is kept and the order is
//! decided by usage alone.

use crate::types::NoteTarget;
use crate::usage::UsageCounts;
use std::cmp::Ordering;

const TITLE_PREFIX_SCORE: u32 = 300;
const NAME_PREFIX_SCORE: u32 = 220;
const TITLE_CONTAINS_SCORE: u32 = 120;
const NAME_CONTAINS_SCORE: u32 = 80;
const MAX_USAGE_BOOST: u32 = 100;

struct Candidate<'a> {
    target: &'a NoteTarget,
    score: u32,
    opens: u32,
    title: String,
    name: String,
    path: String,
}

impl Candidate<'_> {
    fn cmp_rank(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.opens.cmp(&self.opens))
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.path.cmp(&other.path))
    }
}

/// Match points for one title/name pair against a lowercase prefix.
fn match_score(title: &str, name: &str, prefix: &str) -> u32 {
    let mut score = 0;
    if title.starts_with(prefix) {
        score += TITLE_PREFIX_SCORE;
    }
    if name.starts_with(prefix) {
        score += NAME_PREFIX_SCORE;
    }
    if title.contains(prefix) {
        score += TITLE_CONTAINS_SCORE;
    }
    if name.contains(prefix) {
        score += NAME_CONTAINS_SCORE;
    }
    score
}

/// Order autocomplete candidates for a typed prefix.
///
/// Ties are broken by opens, then title, name and path (all compared
/// lowercase), so the output is fully deterministic.
pub fn rank_targets(targets: &[NoteTarget], prefix: &str, usage: &UsageCounts) -> Vec<NoteTarget> {
    let prefix = prefix.trim().to_lowercase();

    let mut candidates: Vec<Candidate<'_>> = targets
        .iter()
        .filter_map(|target| {
            let title = target.title.trim().to_lowercase();
            let name = target.name.trim().to_lowercase();

            let mut score = 0;
            if !prefix.is_empty() {
                score = match_score(&title, &name, &prefix);
                if score == 0 {
                    return None;
                }
            }

            let opens = usage.get(&target.path);
            score += opens.min(MAX_USAGE_BOOST);
            Some(Candidate {
                target,
                score,
                opens,
                title,
                name,
                path: target.path.to_string_lossy().to_lowercase(),
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.cmp_rank(b));
    candidates.into_iter().map(|c| c.target.clone()).collect()
}

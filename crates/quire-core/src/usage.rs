//! Note open counters.
//!
//! Counts are kept in memory by absolute path and persisted per notes root
//! at `<root>/<managed dir>/usage.json` with root-relative keys, so the file
//! stays valid when the notes directory moves.

use crate::error::Result;
use crate::extract::ExtractOptions;
use crate::scope;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

const USAGE_FILE: &str = "usage.json";
const USAGE_TEMP_FILE: &str = "usage.json.tmp";

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedUsage {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    open_counts: BTreeMap<String, u32>,
}

/// Per-note open counts, keyed by absolute path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageCounts {
    counts: HashMap<PathBuf, u32>,
}

impl UsageCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one open. Only notes are counted. Returns the new count.
    pub fn record_open(&mut self, path: &Path, options: &ExtractOptions) -> Option<u32> {
        if !options.is_note(path) {
            return None;
        }
        let count = self.counts.entry(scope::normalize(path)).or_insert(0);
        *count = count.saturating_add(1);
        Some(*count)
    }

    /// Opens recorded for `path`, 0 if never opened.
    pub fn get(&self, path: &Path) -> u32 {
        self.counts.get(path).copied().unwrap_or(0)
    }

    /// Drop counts for `path` and everything below it.
    pub fn forget(&mut self, path: &Path) -> usize {
        let before = self.counts.len();
        self.counts.retain(|key, _| !key.starts_with(path));
        before - self.counts.len()
    }

    /// Move counts after a rename, including any below a renamed directory.
    pub fn rename(&mut self, old: &Path, new: &Path) {
        let moved: Vec<(PathBuf, u32)> = self
            .counts
            .iter()
            .filter(|(key, _)| key.starts_with(old))
            .map(|(key, count)| (key.clone(), *count))
            .collect();
        for (key, count) in moved {
            self.counts.remove(&key);
            if let Ok(rest) = key.strip_prefix(old) {
                let target = if rest.as_os_str().is_empty() {
                    new.to_path_buf()
                } else {
                    new.join(rest)
                };
                self.counts.insert(target, count);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Path of the usage file for a root.
    pub fn file_path(root: &Path, managed_dir: &str) -> PathBuf {
        root.join(managed_dir).join(USAGE_FILE)
    }

    /// Load counts for `root`. A missing file yields empty counts.
    ///
    /// Keys that would escape the root and non-positive counts are dropped.
    pub fn load(root: &Path, managed_dir: &str) -> Result<Self> {
        let path = Self::file_path(root, managed_dir);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No usage file, starting empty");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        let persisted: PersistedUsage = serde_json::from_str(&data)?;
        let mut usage = Self::default();
        for (rel, count) in persisted.open_counts {
            if count == 0 {
                continue;
            }
            if let Some(abs) = relative_to_abs(root, &rel) {
                usage.counts.insert(abs, count);
            }
        }

        debug!(path = %path.display(), entries = usage.len(), "Loaded usage counts");
        Ok(usage)
    }

    /// Load counts, falling back to empty on any error.
    pub fn load_or_default(root: &Path, managed_dir: &str) -> Self {
        match Self::load(root, managed_dir) {
            Ok(usage) => usage,
            Err(err) => {
                warn!(error = %err, "Could not load usage counts, starting empty");
                Self::default()
            }
        }
    }

    /// Write counts for `root`, creating the managed directory if needed.
    ///
    /// Writes to a temp file and renames it into place.
    pub fn save(&self, root: &Path, managed_dir: &str) -> Result<()> {
        let dir = root.join(managed_dir);
        fs::create_dir_all(&dir)?;

        let mut persisted = PersistedUsage::default();
        for (path, count) in &self.counts {
            if *count == 0 {
                continue;
            }
            if let Some(rel) = abs_to_relative(root, path) {
                persisted.open_counts.insert(rel, *count);
            }
        }

        let data = serde_json::to_string_pretty(&persisted)?;
        let temp = dir.join(USAGE_TEMP_FILE);
        fs::write(&temp, data)?;
        fs::rename(&temp, dir.join(USAGE_FILE))?;

        info!(root = %root.display(), entries = persisted.open_counts.len(), "Saved usage counts");
        Ok(())
    }
}

impl FromIterator<(PathBuf, u32)> for UsageCounts {
    fn from_iter<I: IntoIterator<Item = (PathBuf, u32)>>(iter: I) -> Self {
        UsageCounts {
            counts: iter.into_iter().collect(),
        }
    }
}

fn relative_to_abs(root: &Path, rel: &str) -> Option<PathBuf> {
    let rel = Path::new(rel);
    if rel.as_os_str().is_empty() || rel.is_absolute() {
        return None;
    }
    if rel.components().any(|c| matches!(c, Component::ParentDir)) {
        return None;
    }
    Some(scope::normalize(&root.join(rel)))
}

fn abs_to_relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    Some(rel.to_string_lossy().replace('\\', "/"))
}

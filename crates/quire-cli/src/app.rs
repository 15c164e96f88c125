//! Application state management.

use anyhow::Context;
use quire_core::{Config, Index, UsageCounts};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// State shared by every command: config, the index and usage counts for
/// one notes root.
pub struct App {
    /// Configuration
    pub config: Config,

    /// The note index (unbuilt until `build_index`)
    pub index: Index,

    /// Open counts for this root
    pub usage: UsageCounts,
}

impl App {
    /// Create a new application instance.
    ///
    /// The root comes from `--root`, then `general.notes_dir`, then the
    /// current directory.
    pub fn new(config: Config, root: Option<&Path>) -> anyhow::Result<Self> {
        let root = match config.notes_root(root) {
            Some(root) => root,
            None => std::env::current_dir().context("Could not determine current directory")?,
        };

        let index = Index::with_options(&root, config.index_options())?;
        let managed_dir = index.options().skip.managed_dir().to_string();
        let usage = UsageCounts::load_or_default(index.root(), &managed_dir);

        info!(
            root = %index.root().display(),
            opened = usage.len(),
            "Application initialized"
        );

        Ok(App {
            config,
            index,
            usage,
        })
    }

    /// Build the index if needed, returning how long it took.
    pub fn build_index(&mut self) -> anyhow::Result<Duration> {
        let start = Instant::now();
        self.index
            .ensure_built()
            .with_context(|| format!("Failed to index {}", self.index.root().display()))?;
        Ok(start.elapsed())
    }

    /// Name of the managed directory inside the root.
    pub fn managed_dir(&self) -> &str {
        self.index.options().skip.managed_dir()
    }

    /// Persist usage counts into the managed directory.
    pub fn save_usage(&self) -> anyhow::Result<()> {
        self.usage.save(self.index.root(), self.managed_dir())?;
        Ok(())
    }

    /// Turn a user-supplied note path into the absolute form the index uses.
    ///
    /// Relative paths are taken from the current directory, like a shell
    /// would, not from the notes root.
    pub fn note_path(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(quire_core::scope::normalize(&path))
    }

    /// Display a path relative to the root when it lies inside it.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(self.index.root())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

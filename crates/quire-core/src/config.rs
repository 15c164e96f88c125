//! Configuration management for Quire.
//!
//! Configuration is stored as TOML in the platform config directory. Every
//! section falls back to defaults, so a partial file (or none at all) is
//! always valid.

use crate::error::{QuireError, Result};
use crate::extract::{ExtractOptions, DEFAULT_MAX_FILE_BYTES, DEFAULT_NOTE_EXTENSION};
use crate::index::{IndexOptions, DEFAULT_PARALLEL_THRESHOLD};
use crate::scope::{SkipList, MANAGED_DIR_NAME};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Main configuration structure for Quire.
///
/// ## Example Configuration File (quire.toml)
///
/// ```toml
/// [general]
/// notes_dir = "/home/me/notes"
/// max_results = 200
///
/// [index]
/// max_file_bytes = 1048576
/// skip_names = [".git", "node_modules"]
///
/// [search]
/// parallel_search = true
///
/// [watch]
/// poll_interval_ms = 2000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// What gets indexed and how
    pub index: IndexConfig,

    /// Search tuning
    pub search: SearchConfig,

    /// Change polling
    pub watch: WatchConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Notes root used when none is given on the command line
    pub notes_dir: Option<PathBuf>,

    /// Maximum number of search results to print
    pub max_results: usize,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            notes_dir: None,
            max_results: 1000,
            log_level: "info".to_string(),
        }
    }
}

/// Indexing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Notes larger than this are indexed by name only
    pub max_file_bytes: u64,

    /// Bookkeeping directory inside the notes root, never indexed
    pub managed_dir: String,

    /// Extra entry names skipped at every level
    pub skip_names: Vec<String>,

    /// Extension of files whose content is indexed
    pub note_extension: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            managed_dir: MANAGED_DIR_NAME.to_string(),
            skip_names: Vec::new(),
            note_extension: DEFAULT_NOTE_EXTENSION.to_string(),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Use parallel search for large indices
    pub parallel_search: bool,

    /// Threshold for switching to parallel search
    pub parallel_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            parallel_search: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Watch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Delay between filesystem snapshots
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            poll_interval_ms: 2000,
        }
    }
}

impl WatchConfig {
    /// Poll interval, never shorter than 100ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| QuireError::config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self)
            .map_err(|e| QuireError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "quire")
            .ok_or_else(|| QuireError::config("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("quire.toml"))
    }

    /// Index options derived from the `[index]` and `[search]` sections.
    pub fn index_options(&self) -> IndexOptions {
        let managed_dir = match self.index.managed_dir.trim() {
            "" => MANAGED_DIR_NAME,
            name => name,
        };
        let note_extension = self.index.note_extension.trim().trim_start_matches('.');

        IndexOptions {
            extract: ExtractOptions {
                max_file_bytes: self.index.max_file_bytes,
                note_extension: if note_extension.is_empty() {
                    DEFAULT_NOTE_EXTENSION.to_string()
                } else {
                    note_extension.to_string()
                },
            },
            skip: SkipList::new(managed_dir, &self.index.skip_names),
            parallel_search: self.search.parallel_search,
            parallel_threshold: self.search.parallel_threshold,
        }
    }

    /// Pick the notes root: an explicit path wins over `general.notes_dir`.
    pub fn notes_root(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.general.notes_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.max_results, 1000);
        assert_eq!(config.index.max_file_bytes, 1024 * 1024);
        assert_eq!(config.index.managed_dir, ".quire");
        assert_eq!(config.watch.poll_interval(), Duration::from_millis(2000));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("test.toml");

        let mut config = Config::default();
        config.general.max_results = 50;
        config.general.notes_dir = Some(PathBuf::from("/tmp/notes"));
        config.index.skip_names = vec![".git".to_string()];

        config.save_to(&config_path).unwrap();
        let loaded = Config::load_from(&config_path).unwrap();

        assert_eq!(loaded.general.max_results, 50);
        assert_eq!(loaded.general.notes_dir, Some(PathBuf::from("/tmp/notes")));
        assert_eq!(loaded.index.skip_names, vec![".git".to_string()]);
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.general.max_results, 1000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(&config_path, "[search]\nparallel_threshold = 5\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.search.parallel_threshold, 5);
        assert!(config.search.parallel_search);
        assert_eq!(config.index.note_extension, "md");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[general\nmax_results = ").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(matches!(err, QuireError::Config { .. }));
    }

    #[test]
    fn test_index_options() {
        let mut config = Config::default();
        config.index.skip_names = vec!["node_modules".to_string()];
        config.index.note_extension = ".markdown".to_string();
        config.index.max_file_bytes = 10;
        config.search.parallel_search = false;

        let options = config.index_options();
        assert!(options.skip.should_skip(".quire"));
        assert!(options.skip.should_skip("Node_Modules"));
        assert_eq!(options.extract.note_extension, "markdown");
        assert_eq!(options.extract.max_file_bytes, 10);
        assert!(!options.parallel_search);
    }

    #[test]
    fn test_notes_root_precedence() {
        let mut config = Config::default();
        assert_eq!(config.notes_root(None), None);

        config.general.notes_dir = Some(PathBuf::from("/from/config"));
        assert_eq!(config.notes_root(None), Some(PathBuf::from("/from/config")));
        assert_eq!(
            config.notes_root(Some(Path::new("/explicit"))),
            Some(PathBuf::from("/explicit"))
        );
    }
}

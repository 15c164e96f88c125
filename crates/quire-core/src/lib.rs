//! # Quire Core Library
//!
//! Incremental full-text, tag and wiki-link index over a directory of notes.
//!
//! ## Architecture
//!
//! - **Types** (`types`): Documents, result rows, autocomplete targets
//! - **Frontmatter** (`frontmatter`): Metadata block parsing
//! - **Extract** (`extract`): Bounded note content extraction
//! - **Store** (`store`): Path-ordered document storage
//! - **Walker** (`walker`): Full and subtree directory walks
//! - **Index** (`index`): Build, incremental maintenance, queries
//! - **Search** (`search`): Query parsing and matching logic
//! - **Wiki** (`wiki`): `[[link]]` scanning and cursor prefix detection
//! - **Rank** (`rank`): Autocomplete ordering
//! - **Usage** (`usage`): Persisted open counts
//! - **Watch** (`watch`): Snapshot polling for external changes
//! - **Config** (`config`): Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use quire_core::{rank_targets, Index, UsageCounts};
//!
//! let mut index = Index::new("/home/me/notes")?;
//! index.ensure_built()?;
//!
//! for hit in index.search("standup tag:work").iter().take(20) {
//!     println!("{}", hit.path.display());
//! }
//!
//! let ranked = rank_targets(&index.note_targets(), "proj", &UsageCounts::new());
//! # Ok::<(), quire_core::QuireError>(())
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod frontmatter;
pub mod index;
pub mod rank;
pub mod scope;
pub mod search;
pub mod store;
pub mod types;
pub mod usage;
pub mod walker;
pub mod watch;
pub mod wiki;

// Re-export commonly used types
pub use config::Config;
pub use error::{QuireError, Result};
pub use extract::ExtractOptions;
pub use frontmatter::{parse_frontmatter_and_body, NoteMetadata};
pub use index::{Index, IndexOptions};
pub use rank::rank_targets;
pub use scope::SkipList;
pub use search::{parse_query, SearchQuery};
pub use types::{Document, DocumentSummary, IndexStats, NoteTarget, TagSet};
pub use usage::UsageCounts;
pub use watch::{Snapshot, SnapshotDiff};
pub use wiki::{current_wiki_prefix, parse_wiki_links, WikiLink};

//! Rank command - order autocomplete candidates for a prefix.

use crate::app::App;
use crate::OutputFormat;
use anyhow::Context;
use quire_core::{current_wiki_prefix, rank_targets, Config};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the prefix comes from.
pub enum PrefixSource {
    /// Given on the command line
    Typed(String),

    /// Read from the open `[[` at a char offset in a file
    Cursor { file: PathBuf, cursor: usize },
}

/// One ranked candidate in JSON output.
#[derive(Serialize)]
struct RankedRow<'a> {
    label: Option<&'a str>,
    path: &'a Path,
    title: &'a str,
    name: &'a str,
    opens: u32,
}

/// Run the rank command.
pub fn run(
    config: Config,
    root: Option<&Path>,
    source: PrefixSource,
    limit: usize,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let mut app = App::new(config, root)?;

    let prefix = match source {
        PrefixSource::Typed(prefix) => prefix,
        PrefixSource::Cursor { file, cursor } => {
            let file = app.note_path(&file)?;
            let text = fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            match current_wiki_prefix(&text, cursor) {
                Some(prefix) => prefix,
                None => {
                    eprintln!("No open wiki link at cursor {}", cursor);
                    return Ok(());
                }
            }
        }
    };

    app.build_index()?;
    let mut ranked = rank_targets(&app.index.note_targets(), &prefix, &app.usage);
    ranked.truncate(limit);

    match output {
        OutputFormat::Text => {
            for target in &ranked {
                println!(
                    "{}\t{}\t{}",
                    target.label().unwrap_or_default(),
                    app.usage.get(target.path()),
                    app.display_path(target.path())
                );
            }
        }
        OutputFormat::Json => {
            let rows: Vec<RankedRow<'_>> = ranked
                .iter()
                .map(|t| RankedRow {
                    label: t.label(),
                    path: t.path(),
                    title: &t.title,
                    name: &t.name,
                    opens: app.usage.get(t.path()),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}

//! Links command - list the wiki links in one note and where they lead.

use crate::app::App;
use crate::OutputFormat;
use anyhow::Context;
use quire_core::Config;
use std::fs;
use std::path::Path;

/// Run the links command.
pub fn run(config: Config, root: Option<&Path>, note: &Path, output: OutputFormat) -> anyhow::Result<()> {
    let mut app = App::new(config, root)?;
    let note = app.note_path(note)?;
    let content = fs::read_to_string(&note).with_context(|| format!("Failed to read {}", note.display()))?;

    app.build_index()?;
    let links = app.index.resolve_links(&content);

    match output {
        OutputFormat::Text => {
            if links.is_empty() {
                eprintln!("No wiki links in {}", app.display_path(&note));
                return Ok(());
            }
            for link in &links {
                let target = match &link.target {
                    Some(path) => app.display_path(path),
                    None => "(unresolved)".to_string(),
                };
                println!("[[{}]] -> {}", link.label, target);
            }
            let unresolved = links.iter().filter(|link| !link.is_resolved()).count();
            eprintln!("{} links, {} unresolved", links.len(), unresolved);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&links)?);
        }
    }

    Ok(())
}

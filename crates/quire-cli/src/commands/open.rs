//! Open command - count a note open for autocomplete ranking.

use crate::app::App;
use quire_core::{scope, Config};
use std::path::Path;

/// Run the open command.
pub fn run(config: Config, root: Option<&Path>, note: &Path) -> anyhow::Result<()> {
    let mut app = App::new(config, root)?;
    let note = app.note_path(note)?;

    if !scope::is_within_root(app.index.root(), &note) {
        anyhow::bail!("{} is outside {}", note.display(), app.index.root().display());
    }
    if !note.is_file() {
        anyhow::bail!("Not a file: {}", note.display());
    }

    let extract = app.index.options().extract.clone();
    match app.usage.record_open(&note, &extract) {
        Some(count) => {
            app.save_usage()?;
            println!("{} opened {} time(s)", app.display_path(&note), count);
        }
        None => eprintln!("Not a note, nothing recorded: {}", app.display_path(&note)),
    }

    Ok(())
}

//! Resolve command - map a wiki-link label to a note.

use crate::app::App;
use quire_core::Config;
use std::path::Path;

/// Run the resolve command. Fails when no note answers to the label.
pub fn run(config: Config, root: Option<&Path>, label: &str) -> anyhow::Result<()> {
    let mut app = App::new(config, root)?;
    app.build_index()?;

    match app.index.resolve_wiki_target(label) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => anyhow::bail!("Unresolved wiki link: {}", label.trim()),
    }
}

//! Move command - rename a note or directory and carry its bookkeeping along.

use crate::app::App;
use anyhow::Context;
use quire_core::{scope, Config};
use std::fs;
use std::path::Path;
use tracing::info;

/// Run the move command.
pub fn run(config: Config, root: Option<&Path>, from: &Path, to: &Path) -> anyhow::Result<()> {
    let mut app = App::new(config, root)?;
    let from = app.note_path(from)?;
    let to = app.note_path(to)?;

    for path in [&from, &to] {
        if path == app.index.root() || !scope::is_within_root(app.index.root(), path) {
            anyhow::bail!("{} is not inside {}", path.display(), app.index.root().display());
        }
    }
    if !from.exists() {
        anyhow::bail!("Not found: {}", from.display());
    }
    if to.exists() {
        anyhow::bail!("Already exists: {}", to.display());
    }

    app.build_index()?;
    fs::rename(&from, &to)
        .with_context(|| format!("Failed to move {} to {}", from.display(), to.display()))?;

    app.index.rename_path(&from, &to);
    app.usage.rename(&from, &to);
    app.save_usage()?;

    info!(from = %from.display(), to = %to.display(), "Moved");
    println!("Moved {} -> {}", app.display_path(&from), app.display_path(&to));
    Ok(())
}

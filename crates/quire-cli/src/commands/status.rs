//! Status command - show index status and statistics.

use crate::app::App;
use chrono::Local;
use quire_core::{Config, UsageCounts};
use std::path::Path;

/// Run the status command.
pub fn run(config: Config, root: Option<&Path>) -> anyhow::Result<()> {
    let mut app = App::new(config, root)?;
    let elapsed = app.build_index()?;
    let stats = app.index.stats();

    println!("Quire Index Status");
    println!("==================");
    println!();
    println!("Root: {}", app.index.root().display());
    println!();

    if app.index.is_empty() {
        println!("No notes found under the root.");
        return Ok(());
    }

    println!("Summary:");
    println!("  Notes:             {}", stats.total_notes);
    println!("  Total files:       {}", stats.total_files);
    println!("  Total directories: {}", stats.total_dirs);
    println!("  Total entries:     {}", stats.total_entries());
    println!(
        "  Total size:        {} bytes ({:.2} MB)",
        stats.total_size,
        stats.total_size as f64 / (1024.0 * 1024.0)
    );
    println!("  Build time:        {:.3}s", elapsed.as_secs_f64());
    if let Some(built) = stats.last_built {
        let local = built.with_timezone(&Local);
        println!("  Built at:          {}", local.format("%Y-%m-%d %H:%M:%S"));
    }

    println!();
    println!("Usage:");
    println!("  Notes opened:      {}", app.usage.len());
    println!(
        "  Usage file:        {}",
        UsageCounts::file_path(app.index.root(), app.managed_dir()).display()
    );

    Ok(())
}

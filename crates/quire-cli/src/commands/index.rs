//! Index command - build the note index and report what it holds.

use crate::app::App;
use crate::OutputFormat;
use quire_core::Config;
use std::path::Path;

/// Run the index command.
pub fn run(config: Config, root: Option<&Path>, output: OutputFormat) -> anyhow::Result<()> {
    let mut app = App::new(config, root)?;

    let elapsed = app.build_index()?;
    let stats = app.index.stats();

    match output {
        OutputFormat::Text => {
            println!("Indexed {}", app.index.root().display());
            println!("  Notes:       {}", stats.total_notes);
            println!("  Files:       {}", stats.total_files);
            println!("  Directories: {}", stats.total_dirs);
            println!("  Time:        {:.2}s", elapsed.as_secs_f64());
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "root": app.index.root(),
                "stats": stats,
                "elapsed_ms": elapsed.as_secs_f64() * 1000.0,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

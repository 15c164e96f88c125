//! Targets command - list every note a wiki link could point to.

use crate::app::App;
use crate::OutputFormat;
use quire_core::Config;
use std::path::Path;

/// Run the targets command.
pub fn run(config: Config, root: Option<&Path>, output: OutputFormat) -> anyhow::Result<()> {
    let mut app = App::new(config, root)?;
    app.build_index()?;
    let targets = app.index.note_targets();

    match output {
        OutputFormat::Text => {
            for target in &targets {
                println!(
                    "{}\t{}",
                    target.label().unwrap_or_default(),
                    app.display_path(target.path())
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&targets)?);
        }
    }

    Ok(())
}

//! Config command - show or create the configuration file.

use quire_core::Config;
use std::path::{Path, PathBuf};

/// Run the config command.
///
/// `explicit` is the `--config` path, if one was given.
pub fn run(config: Config, explicit: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    if !init {
        let state = if path.exists() { "" } else { " (not created, using defaults)" };
        println!("{}{}", path.display(), state);
        return Ok(());
    }

    if path.exists() {
        anyhow::bail!("Config file already exists: {}", path.display());
    }
    match explicit {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    println!("Wrote {}", path.display());
    Ok(())
}

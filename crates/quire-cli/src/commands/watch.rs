//! Watch command - poll the notes root and keep the index current.

use crate::app::App;
use crossbeam_channel::tick;
use quire_core::{Config, Snapshot};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Run the watch command.
pub fn run(
    config: Config,
    root: Option<&Path>,
    interval_ms: Option<u64>,
    max_polls: Option<u64>,
) -> anyhow::Result<()> {
    let interval = match interval_ms {
        Some(ms) => Duration::from_millis(ms.max(1)),
        None => config.watch.poll_interval(),
    };
    let mut app = App::new(config, root)?;
    app.build_index()?;

    let skip = app.index.options().skip.clone();
    let mut last = Snapshot::scan(app.index.root(), &skip)?;

    debug!(tracked = last.len(), "Initial snapshot");
    println!(
        "Watching {} ({} entries, every {}ms)",
        app.index.root().display(),
        app.index.len(),
        interval.as_millis()
    );
    println!("Press Ctrl+C to stop.");

    let ticker = tick(interval);
    let mut polls = 0u64;

    // Process changes
    loop {
        if max_polls.is_some_and(|max| polls >= max) {
            break;
        }
        if ticker.recv().is_err() {
            break;
        }
        polls += 1;

        let current = match Snapshot::scan(app.index.root(), &skip) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Snapshot failed, index may be stale");
                app.index.invalidate();
                continue;
            }
        };

        let diff = current.diff(&last);
        last = current;

        // A failed scan leaves the index unready; rebuild instead of patching.
        if !app.index.is_ready() {
            match app.build_index() {
                Ok(_) => info!(entries = app.index.len(), "Index rebuilt"),
                Err(e) => {
                    warn!(error = %e, "Rebuild failed");
                    continue;
                }
            }
        } else if diff.is_empty() {
            debug!(poll = polls, "No changes");
            continue;
        } else {
            app.index.apply_diff(&diff);
        }

        for path in &diff.removed {
            app.usage.forget(path);
        }
        if !diff.removed.is_empty() {
            if let Err(e) = app.save_usage() {
                warn!(error = %e, "Could not save usage counts");
            }
        }

        info!(
            paths = diff.len(),
            entries = app.index.len(),
            generation = app.index.generation(),
            "Change detected"
        );
        println!(
            "Updated: {} changed, {} removed ({} entries)",
            diff.changed.len(),
            diff.removed.len(),
            app.index.len()
        );
    }

    println!("Monitoring stopped.");
    Ok(())
}

//! Search command - find notes by text and tags.

use crate::app::App;
use crate::OutputFormat;
use quire_core::Config;
use std::path::Path;
use std::time::Instant;

/// Run the search command.
pub fn run(
    config: Config,
    root: Option<&Path>,
    query: &str,
    limit: Option<usize>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let limit = limit.unwrap_or(config.general.max_results);
    let mut app = App::new(config, root)?;
    app.build_index()?;

    let start = Instant::now();
    let results = app.index.search_limited(query, limit);
    let elapsed = start.elapsed();

    match output {
        OutputFormat::Text => {
            for result in &results {
                let shown = app.display_path(&result.path);
                let mut line = if result.is_dir {
                    format!("{}/", shown)
                } else {
                    shown
                };
                if !result.tags.is_empty() {
                    line.push_str(&format!("  [{}]", result.tags.compact_label(3)));
                }
                println!("{}", line);
            }

            eprintln!();
            eprintln!(
                "Found {} results in {:.3}ms",
                results.len(),
                elapsed.as_secs_f64() * 1000.0
            );
        }
        OutputFormat::Json => {
            let json_results: Vec<serde_json::Value> = results
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "name": r.name,
                        "path": r.path,
                        "is_dir": r.is_dir,
                        "depth": r.depth,
                        "title": r.title,
                        "tags": r.tags,
                        "size": r.size,
                        "modified": r.modified.map(|t| t.to_rfc3339()),
                    })
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&json_results)?);
        }
    }

    Ok(())
}

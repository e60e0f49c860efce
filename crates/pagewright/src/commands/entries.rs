//! Entry table command.

use std::path::Path;

use anyhow::{Context, Result};
use pagewright_config::BuildMode;
use pagewright_entries::EntryManifest;
use pagewright_plan::PlanBuilder;

/// Run the entries command.
pub fn run(config_path: &Path, mode: Option<BuildMode>, json: bool) -> Result<()> {
    let config = super::load(config_path, mode)?;
    config.validate()?;

    let builder = PlanBuilder::new(config);
    let manifest = builder
        .resolver()
        .resolve()
        .context("Failed to resolve page entries")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    } else {
        print!("{}", render(&manifest));
    }

    tracing::info!("Resolved {} pages", manifest.len());
    Ok(())
}

/// Plain listing: page name, then its assets indented in entry order.
fn render(manifest: &EntryManifest) -> String {
    let mut out = String::new();

    for (name, entry) in manifest.iter() {
        out.push_str(&format!("{} ({})\n", name, entry.template.display()));
        for asset in &entry.assets {
            out.push_str(&format!("  {}\n", asset.display()));
        }
    }

    out
}

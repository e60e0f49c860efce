//! Build plan preview command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use pagewright_config::BuildMode;
use pagewright_plan::PlanBuilder;

/// Run the plan command.
pub fn run(config_path: &Path, mode: Option<BuildMode>, out: Option<PathBuf>) -> Result<()> {
    let config = super::load(config_path, mode)?;
    let result = PlanBuilder::new(config).run()?;

    match out {
        Some(path) => {
            PlanBuilder::write(&result.plan, &path)?;
            tracing::info!("Wrote plan for {} pages to {}", result.pages, path.display());
        }
        None => println!("{}", PlanBuilder::to_json(&result.plan)?),
    }

    Ok(())
}

//! Build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagewright_config::BuildMode;
use pagewright_plan::PlanBuilder;

/// Plan file written when `--out` is not given.
const DEFAULT_PLAN_FILE: &str = "build-plan.json";

/// Run the build command.
pub fn run(config_path: &Path, mode: Option<BuildMode>, out: Option<PathBuf>) -> Result<()> {
    let config = super::load(config_path, mode)?;
    tracing::info!("Planning {} build...", config.mode);

    let builder = PlanBuilder::new(config);
    let result = builder.run().context("Build planning failed")?;

    let plan_path = out.unwrap_or_else(|| PathBuf::from(DEFAULT_PLAN_FILE));
    PlanBuilder::write(&result.plan, &plan_path)?;

    tracing::info!(
        "Planned {} pages with {} entry files in {}ms",
        result.pages,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Plan: {}", plan_path.display());
    tracing::info!("Output: {}", builder.config().output.dir.display());

    Ok(())
}

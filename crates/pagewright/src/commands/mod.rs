//! Subcommand implementations.

pub mod build;
pub mod entries;
pub mod init;
pub mod plan;

use std::path::Path;

use anyhow::{Context, Result};
use pagewright_config::{load_config, BuildConfig, BuildMode};

/// Load the config file and apply a command-line mode override.
pub fn load(config_path: &Path, mode: Option<BuildMode>) -> Result<BuildConfig> {
    let config = load_config(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let config = match mode {
        Some(mode) => config.with_mode(mode),
        None => config,
    };

    tracing::debug!("Build mode: {}", config.mode);
    Ok(config)
}

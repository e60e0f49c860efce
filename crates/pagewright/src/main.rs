//! pagewright CLI - entry-point resolver and build planner for static sites.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use pagewright_config::{BuildMode, CONFIG_FILE};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "pagewright")]
#[command(about = "Entry-point resolver and build planner for multi-page static sites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to pagewright.toml config file
    #[arg(short, long, default_value = CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Build mode, overrides the config file
    #[arg(short, long, value_enum, global = true)]
    mode: Option<ModeArg>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Development,
    Production,
}

impl From<ModeArg> for BuildMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Development => BuildMode::Development,
            ModeArg::Production => BuildMode::Production,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a config file and a first page
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Resolve and print the page entry table
    Entries {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the bundler build plan
    Plan {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Resolve pages and write the build plan
    Build {
        /// Plan file (defaults to build-plan.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout is reserved for command output
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mode = cli.mode.map(BuildMode::from);

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&std::env::current_dir()?, yes)?;
        }
        Commands::Entries { json } => {
            commands::entries::run(&cli.config, mode, json)?;
        }
        Commands::Plan { out } => {
            commands::plan::run(&cli.config, mode, out)?;
        }
        Commands::Build { out } => {
            commands::build::run(&cli.config, mode, out)?;
        }
    }

    Ok(())
}

//! Build mode and project configuration for pagewright.
//!
//! Configuration is read once from `pagewright.toml` into a [`BuildConfig`]
//! and passed explicitly to every stage that needs it. Nothing here reads
//! the process environment.

pub mod config;
pub mod mode;
pub mod options;

pub use config::{load_config, BuildConfig, ConfigError, OutputConfig, PagesConfig, CONFIG_FILE};
pub use mode::{BuildMode, OutputNaming};
pub use options::{
    AssetsConfig, DevServerConfig, HtmlConfig, InjectPosition, PerformanceConfig, Polyfills,
    SplitChunksConfig, TranspileConfig,
};

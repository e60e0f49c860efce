//! Project configuration file (`pagewright.toml`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::mode::BuildMode;
use crate::options::{
    AssetsConfig, DevServerConfig, HtmlConfig, PerformanceConfig, SplitChunksConfig,
    TranspileConfig,
};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "pagewright.toml";

/// Everything a build needs, constructed once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub mode: BuildMode,

    #[serde(default)]
    pub pages: PagesConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub transpile: TranspileConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub html: HtmlConfig,

    #[serde(default)]
    pub split_chunks: SplitChunksConfig,

    /// Identifiers resolved to a module wherever scripts use them
    #[serde(default = "default_provide")]
    pub provide: BTreeMap<String, String>,

    #[serde(default)]
    pub dev_server: DevServerConfig,

    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            mode: BuildMode::default(),
            pages: PagesConfig::default(),
            output: OutputConfig::default(),
            transpile: TranspileConfig::default(),
            assets: AssetsConfig::default(),
            html: HtmlConfig::default(),
            split_chunks: SplitChunksConfig::default(),
            provide: default_provide(),
            dev_server: DevServerConfig::default(),
            performance: PerformanceConfig::default(),
        }
    }
}

/// Where pages live and what belongs to them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PagesConfig {
    /// Pages root; every immediate subfolder with a template is a page
    #[serde(default = "default_pages_dir")]
    pub dir: PathBuf,

    /// Stylesheet placed first in every page entry
    #[serde(default = "default_shared_style")]
    pub shared_style: PathBuf,

    #[serde(default = "default_template_ext")]
    pub template_ext: String,

    #[serde(default = "default_script_exts")]
    pub script_exts: Vec<String>,

    #[serde(default = "default_style_exts")]
    pub style_exts: Vec<String>,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dir: default_pages_dir(),
            shared_style: default_shared_style(),
            template_ext: default_template_ext(),
            script_exts: default_script_exts(),
            style_exts: default_style_exts(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Errors that can occur loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid pattern in {field}: {message}")]
    InvalidPattern { field: &'static str, message: String },
}

/// Load configuration from `path` if it exists.
///
/// A missing file yields the defaults. A file that exists but does not
/// parse is an error.
pub fn load_config(path: &Path) -> Result<BuildConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(BuildConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let config = BuildConfig::from_toml(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

impl BuildConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Override the build mode, e.g. from a command-line flag.
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check values the external toolchain would otherwise reject late.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_extension("pages.template_ext", &self.pages.template_ext)?;
        check_extensions("pages.script_exts", &self.pages.script_exts)?;
        check_extensions("pages.style_exts", &self.pages.style_exts)?;

        if self.assets.inline_limit == 0 {
            return Err(ConfigError::Invalid(
                "assets.inline_limit must be greater than zero".to_string(),
            ));
        }

        if let Some(pattern) = &self.html.exclude_assets {
            check_pattern("html.exclude_assets", pattern)?;
        }
        check_pattern("split_chunks.common_test", &self.split_chunks.common_test)?;
        check_pattern("split_chunks.vendor_test", &self.split_chunks.vendor_test)?;

        Ok(())
    }
}

fn check_extensions(field: &str, exts: &[String]) -> Result<(), ConfigError> {
    if exts.is_empty() {
        return Err(ConfigError::Invalid(format!("{} must not be empty", field)));
    }
    exts.iter().try_for_each(|ext| check_extension(field, ext))
}

fn check_extension(field: &str, ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() || ext.contains('.') {
        return Err(ConfigError::Invalid(format!(
            "{}: '{}' must be a bare extension such as \"js\"",
            field, ext
        )));
    }
    Ok(())
}

fn check_pattern(field: &'static str, pattern: &str) -> Result<(), ConfigError> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern {
            field,
            message: e.to_string(),
        })
}

fn default_pages_dir() -> PathBuf {
    PathBuf::from("src/pages")
}
fn default_shared_style() -> PathBuf {
    PathBuf::from("src/pages/common.scss")
}
fn default_template_ext() -> String {
    "html".to_string()
}
fn default_script_exts() -> Vec<String> {
    vec!["js".to_string()]
}
fn default_style_exts() -> Vec<String> {
    vec!["scss".to_string()]
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}
fn default_provide() -> BTreeMap<String, String> {
    BTreeMap::from([("$".to_string(), "jquery".to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{InjectPosition, Polyfills};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(config.mode, BuildMode::Production);
        assert_eq!(config.pages.dir, PathBuf::from("src/pages"));
        assert_eq!(config.pages.shared_style, PathBuf::from("src/pages/common.scss"));
        assert_eq!(config.assets.inline_limit, 8192);
        assert_eq!(config.transpile.polyfills, Polyfills::Usage);
        assert_eq!(config.provide.get("$").map(String::as_str), Some("jquery"));
        assert_eq!(config.html.meta.len(), 3);
    }

    #[test]
    fn partial_file_merges_with_defaults() {
        let config = BuildConfig::from_toml(
            r#"
mode = "development"

[pages]
dir = "site/pages"

[html]
inject = "body"

[performance]
max_asset_size = 2000
"#,
        )
        .unwrap();

        assert_eq!(config.mode, BuildMode::Development);
        assert_eq!(config.pages.dir, PathBuf::from("site/pages"));
        assert_eq!(config.pages.template_ext, "html");
        assert_eq!(config.html.inject, InjectPosition::Body);
        assert!(config.html.cache_bust);
        assert_eq!(config.performance.max_asset_size, 2000);
        assert_eq!(config.performance.max_entrypoint_size, 500_000);
    }

    #[test]
    fn errors_on_malformed_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "mode = [not toml").unwrap();

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn errors_on_unknown_mode() {
        let result = BuildConfig::from_toml(r#"mode = "staging""#);

        assert!(result.is_err());
    }

    #[test]
    fn mode_override_wins() {
        let config = BuildConfig::from_toml(r#"mode = "development""#)
            .unwrap()
            .with_mode(BuildMode::Production);

        assert_eq!(config.mode, BuildMode::Production);
    }

    #[test]
    fn defaults_validate() {
        BuildConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_dotted_extensions() {
        let mut config = BuildConfig::default();
        config.pages.script_exts = vec![".js".to_string()];

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_empty_extension_lists() {
        let mut config = BuildConfig::default();
        config.pages.style_exts.clear();

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_inline_limit() {
        let mut config = BuildConfig::default();
        config.assets.inline_limit = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_invalid_patterns() {
        let mut config = BuildConfig::default();
        config.html.exclude_assets = Some("(unclosed".to_string());

        match config.validate() {
            Err(ConfigError::InvalidPattern { field, .. }) => {
                assert_eq!(field, "html.exclude_assets")
            }
            other => panic!("expected pattern error, got {:?}", other),
        }
    }
}

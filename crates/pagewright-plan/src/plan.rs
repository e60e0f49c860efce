//! Serializable build plan.
//!
//! Field names are camelCase because the plan is read by JavaScript
//! tooling.

use std::collections::BTreeMap;
use std::path::PathBuf;

use pagewright_config::BuildMode;
use pagewright_entries::EntryManifest;
use serde::Serialize;

/// The complete declarative configuration handed to the bundler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    pub mode: BuildMode,

    /// Source map style; `None` disables source maps
    pub devtool: Option<String>,

    /// Page name to ordered source files
    pub entry: EntryManifest,

    pub output: Output,

    pub css_extract: CssExtract,

    /// One HTML document per page
    pub html_pages: Vec<HtmlPage>,

    /// Loader chains, matched in order
    pub rules: Vec<Rule>,

    pub split_chunks: SplitChunks,

    /// Free identifiers resolved to modules
    pub provide: BTreeMap<String, String>,

    pub transpile: TranspilePreset,

    pub dev_server: DevServer,

    pub performance: Performance,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub path: PathBuf,

    /// Script bundle file name template
    pub filename: String,

    /// Empty the output directory before emitting
    pub clean: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssExtract {
    pub filename: String,
    pub chunk_filename: String,
    pub hot_reload: bool,
}

/// HTML emitted for one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPage {
    pub name: String,
    pub template: PathBuf,

    /// Output file, relative to the output directory
    pub filename: String,

    /// Chunks whose assets are linked from the page
    pub chunks: Vec<String>,

    pub inject: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_assets: Option<String>,

    pub meta: Vec<BTreeMap<String, String>>,

    /// Append the build hash to asset URLs
    pub hash: bool,
}

/// A module rule: files matching `test` go through `use`, last loader first.
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub test: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<PathBuf>,

    #[serde(rename = "use")]
    pub uses: Vec<LoaderUse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoaderUse {
    pub loader: String,

    /// Options are opaque to pagewright and passed through as-is
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub options: serde_json::Value,
}

impl LoaderUse {
    pub fn new(loader: &str, options: serde_json::Value) -> Self {
        Self {
            loader: loader.to_string(),
            options,
        }
    }

    pub fn bare(loader: &str) -> Self {
        Self::new(loader, serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitChunks {
    pub cache_groups: BTreeMap<String, CacheGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheGroup {
    pub test: String,
    pub name: String,
    pub chunks: String,
    pub enforce: bool,
}

/// Transpiler presets and plugins.
#[derive(Debug, Clone, Serialize)]
pub struct TranspilePreset {
    pub presets: Vec<Preset>,
    pub plugins: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub name: String,
    pub options: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServer {
    pub open: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_page: Option<String>,

    pub content_base: PathBuf,
    pub watch_content_base: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub max_entrypoint_size: u64,
    pub max_asset_size: u64,
}

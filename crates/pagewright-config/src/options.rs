//! Option tables passed through to the external toolchain.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Polyfill injection strategy for the transpiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polyfills {
    /// Inject polyfills where a feature is used
    #[default]
    Usage,

    /// Replace a single entry import with the polyfills the targets need
    Entry,

    /// No polyfills
    Off,
}

impl Polyfills {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Entry => "entry",
            Self::Off => "off",
        }
    }
}

/// Module transform (transpiler preset) options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranspileConfig {
    /// Environment baseline, as a browserslist query
    #[serde(default = "default_targets")]
    pub targets: String,

    #[serde(default)]
    pub polyfills: Polyfills,

    /// core-js version used for injected polyfills
    #[serde(default = "default_corejs")]
    pub corejs: String,

    #[serde(default = "default_true")]
    pub dynamic_import: bool,

    /// Leave ES module syntax for the bundler
    #[serde(default = "default_true")]
    pub preserve_modules: bool,

    /// Directories whose scripts are transpiled
    #[serde(default = "default_transpile_include")]
    pub include: Vec<String>,

    /// Cache transpiler output between builds
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            polyfills: Polyfills::default(),
            corejs: default_corejs(),
            dynamic_import: true,
            preserve_modules: true,
            include: default_transpile_include(),
            cache: true,
        }
    }
}

/// Stylesheet and image pipeline options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetsConfig {
    /// Add vendor prefixes
    #[serde(default = "default_true")]
    pub autoprefix: bool,

    /// Prefix CSS grid properties for older browsers
    #[serde(default = "default_true")]
    pub autoprefix_grid: bool,

    /// Resolve `url()` references in stylesheets
    #[serde(default = "default_true")]
    pub css_url: bool,

    /// Images smaller than this many bytes are inlined
    #[serde(default = "default_inline_limit")]
    pub inline_limit: u64,

    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    #[serde(default = "default_image_output")]
    pub image_output: String,

    #[serde(default = "default_image_public_path")]
    pub image_public_path: String,

    /// Directory of HTML partials included by page templates
    #[serde(default = "default_partials_dir")]
    pub partials_dir: String,

    /// Element attributes whose values are resolved as asset references
    #[serde(default = "default_partial_attrs")]
    pub partial_attrs: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            autoprefix: true,
            autoprefix_grid: true,
            css_url: true,
            inline_limit: default_inline_limit(),
            image_dir: default_image_dir(),
            image_output: default_image_output(),
            image_public_path: default_image_public_path(),
            partials_dir: default_partials_dir(),
            partial_attrs: default_partial_attrs(),
        }
    }
}

/// Where generated script and style tags go in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectPosition {
    #[default]
    Head,
    Body,
}

impl InjectPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
        }
    }
}

/// Per-page HTML emission options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HtmlConfig {
    #[serde(default)]
    pub inject: InjectPosition,

    /// Pattern of emitted assets that are never linked from a page
    #[serde(default = "default_exclude_assets")]
    pub exclude_assets: Option<String>,

    /// Append the build hash to linked asset URLs
    #[serde(default = "default_true")]
    pub cache_bust: bool,

    /// `<meta>` tags, one attribute map per tag
    #[serde(default = "default_meta")]
    pub meta: Vec<BTreeMap<String, String>>,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            inject: InjectPosition::default(),
            exclude_assets: default_exclude_assets(),
            cache_bust: true,
            meta: default_meta(),
        }
    }
}

/// Shared chunk extraction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SplitChunksConfig {
    /// Modules matching this pattern go into the `common` chunk
    #[serde(default = "default_common_test")]
    pub common_test: String,

    /// Modules matching this pattern go into the `vendor` chunk
    #[serde(default = "default_vendor_test")]
    pub vendor_test: String,
}

impl Default for SplitChunksConfig {
    fn default() -> Self {
        Self {
            common_test: default_common_test(),
            vendor_test: default_vendor_test(),
        }
    }
}

/// Development server stanza. pagewright only forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DevServerConfig {
    #[serde(default = "default_true")]
    pub open: bool,

    /// Page opened in the browser on start
    #[serde(default = "default_open_page")]
    pub open_page: Option<String>,

    #[serde(default = "default_content_base")]
    pub content_base: String,

    #[serde(default = "default_true")]
    pub watch_content_base: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            open: true,
            open_page: default_open_page(),
            content_base: default_content_base(),
            watch_content_base: true,
        }
    }
}

/// Size budgets reported by the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_max_entrypoint_size")]
    pub max_entrypoint_size: u64,

    #[serde(default = "default_max_asset_size")]
    pub max_asset_size: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_entrypoint_size: default_max_entrypoint_size(),
            max_asset_size: default_max_asset_size(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_targets() -> String {
    "defaults".to_string()
}
fn default_corejs() -> String {
    "3.2".to_string()
}
fn default_transpile_include() -> Vec<String> {
    vec!["src".to_string()]
}
fn default_inline_limit() -> u64 {
    8192
}
fn default_image_dir() -> String {
    "src/assets".to_string()
}
fn default_image_output() -> String {
    "assets/img".to_string()
}
fn default_image_public_path() -> String {
    "../img".to_string()
}
fn default_partials_dir() -> String {
    "src/partial".to_string()
}
fn default_partial_attrs() -> Vec<String> {
    vec![":data-src".to_string()]
}
fn default_exclude_assets() -> Option<String> {
    Some(r"(0|common)\..*.js".to_string())
}
fn default_meta() -> Vec<BTreeMap<String, String>> {
    let tag = |pairs: &[(&str, &str)]| {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>()
    };

    vec![
        tag(&[("charset", "UTF-8")]),
        tag(&[("name", "viewport"), ("content", "width=device-width, initial-scale=1")]),
        tag(&[("http-equiv", "X-UA-Compatible"), ("content", "IE=edge")]),
    ]
}
fn default_common_test() -> String {
    r"common\.scss".to_string()
}
fn default_vendor_test() -> String {
    r"[\\/]node_modules[\\/]".to_string()
}
fn default_open_page() -> Option<String> {
    Some("home".to_string())
}
fn default_content_base() -> String {
    "src".to_string()
}
fn default_max_entrypoint_size() -> u64 {
    500_000
}
fn default_max_asset_size() -> u64 {
    1_000_000
}

//! Development and production build modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of output the bundler should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Stable file names, inline source maps, CSS hot reload
    Development,

    /// Content-hashed file names, no source maps
    #[default]
    Production,
}

impl BuildMode {
    /// Mode name as the bundler spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Output naming for this mode.
    pub fn output_naming(self) -> OutputNaming {
        match self {
            Self::Development => OutputNaming {
                script_filename: "assets/js/[name].js".to_string(),
                style_filename: "assets/css/[name].css".to_string(),
                style_chunk_filename: "assets/css/[name].css".to_string(),
                devtool: Some("inline-source-map".to_string()),
                css_hot_reload: true,
            },
            Self::Production => OutputNaming {
                script_filename: "assets/js/[id].[chunkhash].js".to_string(),
                style_filename: "assets/css/[id].[hash].css".to_string(),
                style_chunk_filename: "assets/css/[id].[hash].css".to_string(),
                devtool: None,
                css_hot_reload: false,
            },
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File naming templates and source map setting for a build mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputNaming {
    /// Script bundle file name template
    pub script_filename: String,

    /// Extracted stylesheet file name template
    pub style_filename: String,

    /// Extracted stylesheet file name template for split chunks
    pub style_chunk_filename: String,

    /// Source map style, `None` disables source maps
    pub devtool: Option<String>,

    /// Whether extracted CSS hot reloads
    pub css_hot_reload: bool,
}

//! Loader chains for scripts, stylesheets, images and HTML partials.

use std::path::PathBuf;

use pagewright_config::{BuildConfig, Polyfills};
use serde_json::json;

use crate::plan::{LoaderUse, Preset, Rule, TranspilePreset};

const SCRIPT_TEST: &str = r"\.(js|jsx)$";
const STYLE_TEST: &str = r"\.(sa|sc|c)ss$";
const IMAGE_TEST: &str = r"\.(png|jpe?g|gif)$";
const PARTIAL_TEST: &str = r"\.html$";

/// Preprocessor loaders that run before `css-loader`.
const STYLE_PREPROCESSORS: u32 = 2;

/// All module rules, in match order.
pub fn module_rules(config: &BuildConfig) -> Vec<Rule> {
    vec![
        script_rule(config),
        style_rule(config),
        image_rule(config),
        partial_rule(config),
    ]
}

/// Scripts under the configured roots go through the transpiler.
pub fn script_rule(config: &BuildConfig) -> Rule {
    let transpile = &config.transpile;
    let preset = transpile_preset(config);

    Rule {
        test: SCRIPT_TEST.to_string(),
        include: transpile.include.iter().map(PathBuf::from).collect(),
        uses: vec![LoaderUse::new(
            "babel-loader",
            json!({
                "babelrc": false,
                "cacheDirectory": transpile.cache,
                "presets": preset.presets,
                "plugins": preset.plugins,
            }),
        )],
    }
}

/// Stylesheets: sass, then vendor prefixes, then css, then extraction.
pub fn style_rule(config: &BuildConfig) -> Rule {
    let assets = &config.assets;

    let mut uses = vec![
        LoaderUse::new(
            "mini-css-extract-plugin/loader",
            json!({ "hmr": config.mode.output_naming().css_hot_reload }),
        ),
        LoaderUse::new(
            "css-loader",
            json!({ "url": assets.css_url, "importLoaders": STYLE_PREPROCESSORS }),
        ),
    ];

    let postcss_plugins = if assets.autoprefix {
        json!([{
            "name": "autoprefixer",
            "options": { "grid": assets.autoprefix_grid, "cascade": false },
        }])
    } else {
        json!([])
    };
    uses.push(LoaderUse::new(
        "postcss-loader",
        json!({ "plugins": postcss_plugins }),
    ));
    uses.push(LoaderUse::bare("sass-loader"));

    Rule {
        test: STYLE_TEST.to_string(),
        include: Vec::new(),
        uses,
    }
}

/// Images below the inline limit are embedded, the rest are emitted.
pub fn image_rule(config: &BuildConfig) -> Rule {
    let assets = &config.assets;

    Rule {
        test: IMAGE_TEST.to_string(),
        include: vec![PathBuf::from(&assets.image_dir)],
        uses: vec![LoaderUse::new(
            "url-loader",
            json!({
                "limit": assets.inline_limit,
                "name": "[name].[ext]",
                "publicPath": assets.image_public_path,
                "outputPath": assets.image_output,
            }),
        )],
    }
}

/// Partials resolve asset references in the configured attributes.
pub fn partial_rule(config: &BuildConfig) -> Rule {
    let assets = &config.assets;

    Rule {
        test: PARTIAL_TEST.to_string(),
        include: vec![PathBuf::from(&assets.partials_dir)],
        uses: vec![LoaderUse::new(
            "html-loader",
            json!({ "attrs": assets.partial_attrs }),
        )],
    }
}

/// Environment preset plus optional syntax plugins.
pub fn transpile_preset(config: &BuildConfig) -> TranspilePreset {
    let transpile = &config.transpile;

    // `false` leaves import/export statements for the bundler to resolve
    let modules = if transpile.preserve_modules {
        json!(false)
    } else {
        json!("auto")
    };

    let mut options = json!({
        "targets": transpile.targets,
        "modules": modules,
    });
    match transpile.polyfills {
        Polyfills::Off => {
            options["useBuiltIns"] = json!(false);
        }
        mode => {
            options["useBuiltIns"] = json!(mode.as_str());
            options["corejs"] = json!(transpile.corejs);
        }
    }

    let mut plugins = Vec::new();
    if transpile.dynamic_import {
        plugins.push("@babel/plugin-syntax-dynamic-import".to_string());
    }

    TranspilePreset {
        presets: vec![Preset {
            name: "@babel/preset-env".to_string(),
            options,
        }],
        plugins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewright_config::BuildMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn rules_in_match_order() {
        let rules = module_rules(&BuildConfig::default());

        let tests: Vec<&str> = rules.iter().map(|r| r.test.as_str()).collect();
        assert_eq!(tests, vec![SCRIPT_TEST, STYLE_TEST, IMAGE_TEST, PARTIAL_TEST]);
    }

    #[test]
    fn style_chain_runs_sass_first() {
        let rule = style_rule(&BuildConfig::default());

        let loaders: Vec<&str> = rule.uses.iter().map(|u| u.loader.as_str()).collect();
        assert_eq!(
            loaders,
            vec![
                "mini-css-extract-plugin/loader",
                "css-loader",
                "postcss-loader",
                "sass-loader",
            ]
        );
        assert_eq!(rule.uses[1].options["importLoaders"], json!(2));
        assert_eq!(
            rule.uses[2].options["plugins"][0]["options"]["grid"],
            json!(true)
        );
    }

    #[test]
    fn css_hot_reload_follows_mode() {
        let dev = BuildConfig::default().with_mode(BuildMode::Development);
        let prod = BuildConfig::default().with_mode(BuildMode::Production);

        assert_eq!(style_rule(&dev).uses[0].options["hmr"], json!(true));
        assert_eq!(style_rule(&prod).uses[0].options["hmr"], json!(false));
    }

    #[test]
    fn disabling_autoprefix_drops_postcss_plugins() {
        let mut config = BuildConfig::default();
        config.assets.autoprefix = false;

        let rule = style_rule(&config);
        assert_eq!(rule.uses[2].options["plugins"], json!([]));
    }

    #[test]
    fn image_rule_carries_inline_limit() {
        let mut config = BuildConfig::default();
        config.assets.inline_limit = 4096;

        let rule = image_rule(&config);
        assert_eq!(rule.uses[0].options["limit"], json!(4096));
        assert_eq!(rule.include, vec![PathBuf::from("src/assets")]);
    }

    #[test]
    fn preset_uses_usage_polyfills_and_dynamic_import() {
        let preset = transpile_preset(&BuildConfig::default());

        let options = &preset.presets[0].options;
        assert_eq!(options["targets"], json!("defaults"));
        assert_eq!(options["useBuiltIns"], json!("usage"));
        assert_eq!(options["corejs"], json!("3.2"));
        assert_eq!(options["modules"], json!(false));
        assert_eq!(preset.plugins, vec!["@babel/plugin-syntax-dynamic-import"]);
    }

    #[test]
    fn preset_without_polyfills() {
        let mut config = BuildConfig::default();
        config.transpile.polyfills = Polyfills::Off;
        config.transpile.dynamic_import = false;

        let preset = transpile_preset(&config);

        let options = &preset.presets[0].options;
        assert_eq!(options["useBuiltIns"], json!(false));
        assert!(options.get("corejs").is_none());
        assert!(preset.plugins.is_empty());
    }
}

//! Build plan assembly.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use pagewright_config::{BuildConfig, ConfigError};
use pagewright_entries::{EntryManifest, EntryResolver, ResolveError, ResolverOptions};

use crate::plan::{
    BuildPlan, CacheGroup, CssExtract, DevServer, HtmlPage, Output, Performance, SplitChunks,
};
use crate::rules::{module_rules, transpile_preset};

/// Chunk holding the shared stylesheet.
const COMMON_CHUNK: &str = "common";

/// Chunk holding third-party modules.
const VENDOR_CHUNK: &str = "vendor";

/// Result of a resolve-and-plan run.
#[derive(Debug)]
pub struct BuildResult {
    pub plan: BuildPlan,

    /// Number of pages planned
    pub pages: usize,

    /// Number of entry source files across all pages
    pub assets: usize,

    /// Time spent resolving and planning in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur while planning a build.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Failed to serialize build plan: {0}")]
    Serialize(String),

    #[error("Failed to write build plan: {0}")]
    Write(String),
}

/// Turns a [`BuildConfig`] and the resolved pages into a [`BuildPlan`].
pub struct PlanBuilder {
    config: BuildConfig,
}

impl PlanBuilder {
    /// Create a new plan builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Entry resolver configured from the `[pages]` section.
    pub fn resolver(&self) -> EntryResolver {
        let pages = &self.config.pages;

        EntryResolver::new(&pages.dir, &pages.shared_style).with_options(ResolverOptions {
            template_ext: pages.template_ext.clone(),
            script_exts: pages.script_exts.clone(),
            style_exts: pages.style_exts.clone(),
        })
    }

    /// Validate the configuration, resolve pages and build the plan.
    pub fn run(&self) -> Result<BuildResult, PlanError> {
        let start = Instant::now();

        self.config.validate()?;
        let manifest = self.resolver().resolve()?;
        let plan = self.build(&manifest)?;

        Ok(BuildResult {
            pages: manifest.len(),
            assets: manifest.asset_count(),
            duration_ms: start.elapsed().as_millis() as u64,
            plan,
        })
    }

    /// Build the plan for an already resolved manifest.
    pub fn build(&self, manifest: &EntryManifest) -> Result<BuildPlan, PlanError> {
        if manifest.is_empty() {
            return Err(ResolveError::NoPages(self.config.pages.dir.clone()).into());
        }

        let config = &self.config;
        let naming = config.mode.output_naming();

        if let Some(page) = &config.dev_server.open_page {
            if !manifest.contains(page) {
                tracing::warn!("dev_server.open_page '{}' is not a discovered page", page);
            }
        }

        Ok(BuildPlan {
            mode: config.mode,
            devtool: naming.devtool.clone(),
            entry: manifest.clone(),
            output: Output {
                path: config.output.dir.clone(),
                filename: naming.script_filename.clone(),
                clean: true,
            },
            css_extract: CssExtract {
                filename: naming.style_filename.clone(),
                chunk_filename: naming.style_chunk_filename.clone(),
                hot_reload: naming.css_hot_reload,
            },
            html_pages: self.html_pages(manifest),
            rules: module_rules(config),
            split_chunks: self.split_chunks(),
            provide: config.provide.clone(),
            transpile: transpile_preset(config),
            dev_server: DevServer {
                open: config.dev_server.open,
                open_page: config.dev_server.open_page.clone(),
                content_base: PathBuf::from(&config.dev_server.content_base),
                watch_content_base: config.dev_server.watch_content_base,
            },
            performance: Performance {
                max_entrypoint_size: config.performance.max_entrypoint_size,
                max_asset_size: config.performance.max_asset_size,
            },
        })
    }

    /// Serialize the plan as pretty JSON.
    pub fn to_json(plan: &BuildPlan) -> Result<String, PlanError> {
        serde_json::to_string_pretty(plan).map_err(|e| PlanError::Serialize(e.to_string()))
    }

    /// Write the plan to `path`, creating parent directories.
    pub fn write(plan: &BuildPlan, path: &Path) -> Result<(), PlanError> {
        let json = Self::to_json(plan)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PlanError::Write(e.to_string()))?;
        }

        fs::write(path, json)
            .map_err(|e| PlanError::Write(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Wrote build plan to {}", path.display());
        Ok(())
    }

    /// One HTML document per page, linking the shared chunks and its own.
    fn html_pages(&self, manifest: &EntryManifest) -> Vec<HtmlPage> {
        let html = &self.config.html;

        manifest
            .iter()
            .map(|(name, entry)| HtmlPage {
                name: name.to_string(),
                template: entry.template.clone(),
                filename: format!("{}/index.html", name),
                chunks: vec![
                    COMMON_CHUNK.to_string(),
                    VENDOR_CHUNK.to_string(),
                    name.to_string(),
                ],
                inject: html.inject.as_str().to_string(),
                exclude_assets: html.exclude_assets.clone(),
                meta: html.meta.clone(),
                hash: html.cache_bust,
            })
            .collect()
    }

    fn split_chunks(&self) -> SplitChunks {
        let split = &self.config.split_chunks;
        let group = |test: &str, name: &str| CacheGroup {
            test: test.to_string(),
            name: name.to_string(),
            chunks: "initial".to_string(),
            enforce: true,
        };

        SplitChunks {
            cache_groups: BTreeMap::from([
                (
                    COMMON_CHUNK.to_string(),
                    group(&split.common_test, COMMON_CHUNK),
                ),
                (
                    VENDOR_CHUNK.to_string(),
                    group(&split.vendor_test, VENDOR_CHUNK),
                ),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewright_config::BuildMode;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn site(root: &Path) -> BuildConfig {
        let pages = root.join("src/pages");
        touch(&pages.join("common.scss"));
        touch(&pages.join("home/home.html"));
        touch(&pages.join("home/main.js"));
        touch(&pages.join("home/home.scss"));
        touch(&pages.join("about/about.html"));
        touch(&pages.join("about/about.scss"));

        let mut config = BuildConfig::default();
        config.pages.dir = pages.clone();
        config.pages.shared_style = pages.join("common.scss");
        config.output.dir = root.join("dist");
        config
    }

    #[test]
    fn plans_one_html_page_per_entry() {
        let temp = tempdir().unwrap();
        let builder = PlanBuilder::new(site(temp.path()));

        let result = builder.run().unwrap();

        assert_eq!(result.pages, 2);
        assert_eq!(result.assets, 5);

        let pages: Vec<(&str, &str)> = result
            .plan
            .html_pages
            .iter()
            .map(|p| (p.name.as_str(), p.filename.as_str()))
            .collect();
        assert_eq!(
            pages,
            vec![("about", "about/index.html"), ("home", "home/index.html")]
        );

        let home = &result.plan.html_pages[1];
        assert_eq!(home.chunks, vec!["common", "vendor", "home"]);
        assert_eq!(home.inject, "head");
        assert!(home.template.ends_with("home/home.html"));
    }

    #[test]
    fn production_plan_hashes_names() {
        let temp = tempdir().unwrap();
        let config = site(temp.path()).with_mode(BuildMode::Production);

        let plan = PlanBuilder::new(config).run().unwrap().plan;

        assert_eq!(plan.mode, BuildMode::Production);
        assert!(plan.devtool.is_none());
        assert_eq!(plan.output.filename, "assets/js/[id].[chunkhash].js");
        assert_eq!(plan.css_extract.filename, "assets/css/[id].[hash].css");
    }

    #[test]
    fn development_plan_uses_stable_names() {
        let temp = tempdir().unwrap();
        let config = site(temp.path()).with_mode(BuildMode::Development);

        let plan = PlanBuilder::new(config).run().unwrap().plan;

        assert_eq!(plan.devtool.as_deref(), Some("inline-source-map"));
        assert_eq!(plan.output.filename, "assets/js/[name].js");
        assert!(plan.css_extract.hot_reload);
    }

    #[test]
    fn split_chunks_define_common_and_vendor() {
        let temp = tempdir().unwrap();
        let plan = PlanBuilder::new(site(temp.path())).run().unwrap().plan;

        let groups: Vec<&str> = plan.split_chunks.cache_groups.keys().map(String::as_str).collect();
        assert_eq!(groups, vec!["common", "vendor"]);
        assert!(plan.split_chunks.cache_groups.values().all(|g| g.enforce));
    }

    #[test]
    fn serializes_plan_as_camel_case_json() {
        let temp = tempdir().unwrap();
        let plan = PlanBuilder::new(site(temp.path())).run().unwrap().plan;

        let value: serde_json::Value =
            serde_json::from_str(&PlanBuilder::to_json(&plan).unwrap()).unwrap();

        assert_eq!(value["mode"], "production");
        assert_eq!(value["entry"]["about"].as_array().unwrap().len(), 2);
        assert_eq!(value["htmlPages"][0]["filename"], "about/index.html");
        assert_eq!(value["performance"]["maxEntrypointSize"], 500_000);
        assert_eq!(value["devServer"]["openPage"], "home");
        assert_eq!(value["rules"][0]["use"][0]["loader"], "babel-loader");
    }

    #[test]
    fn unknown_open_page_is_passed_through() {
        let temp = tempdir().unwrap();
        let mut config = site(temp.path());
        config.dev_server.open_page = Some("nope".to_string());

        let plan = PlanBuilder::new(config).run().unwrap().plan;

        assert_eq!(plan.dev_server.open_page.as_deref(), Some("nope"));
        assert_eq!(plan.html_pages.len(), 2);
    }

    #[test]
    fn writes_plan_file() {
        let temp = tempdir().unwrap();
        let plan = PlanBuilder::new(site(temp.path())).run().unwrap().plan;
        let path = temp.path().join("out/build-plan.json");

        PlanBuilder::write(&plan, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"htmlPages\""));
    }

    #[test]
    fn fails_before_planning_when_no_pages() {
        let temp = tempdir().unwrap();
        let pages = temp.path().join("src/pages");
        fs::create_dir_all(&pages).unwrap();

        let mut config = BuildConfig::default();
        config.pages.dir = pages;

        let result = PlanBuilder::new(config).run();

        assert!(matches!(
            result,
            Err(PlanError::Resolve(ResolveError::NoPages(_)))
        ));
    }

    #[test]
    fn refuses_empty_manifest() {
        let result = PlanBuilder::new(BuildConfig::default()).build(&EntryManifest::new());

        assert!(matches!(
            result,
            Err(PlanError::Resolve(ResolveError::NoPages(_)))
        ));
    }

    #[test]
    fn rejects_invalid_config_before_scanning() {
        let mut config = BuildConfig::default();
        config.pages.dir = PathBuf::from("does/not/exist");
        config.assets.inline_limit = 0;

        let result = PlanBuilder::new(config).run();

        assert!(matches!(result, Err(PlanError::Config(_))));
    }
}

//! Page discovery.
//!
//! A page is any immediate subfolder of the pages root that holds a
//! template file. Its entry is the shared stylesheet followed by the
//! folder's scripts and then its stylesheets, each group sorted by file
//! name so the manifest is the same on every platform.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

use crate::manifest::{EntryManifest, PageEntry};
use crate::page::PageName;

/// File extensions the resolver looks for, without leading dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Extension of the page template (one per page folder)
    pub template_ext: String,

    /// Script extensions included in a page entry
    pub script_exts: Vec<String>,

    /// Stylesheet extensions included in a page entry
    pub style_exts: Vec<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            template_ext: "html".to_string(),
            script_exts: vec!["js".to_string()],
            style_exts: vec!["scss".to_string()],
        }
    }
}

/// Errors that can occur while resolving entries.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Pages directory not found: {}", .0.display())]
    PagesDirNotFound(PathBuf),

    #[error("No page templates found under {}", .0.display())]
    NoPages(PathBuf),

    #[error("Page '{name}' is defined twice: {} and {}", first.display(), second.display())]
    PageCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Page folder name is not usable as a page name: {}", .0.display())]
    InvalidPageName(PathBuf),

    #[error("Failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

/// Builds an [`EntryManifest`] from a pages directory.
#[derive(Debug, Clone)]
pub struct EntryResolver {
    pages_dir: PathBuf,
    shared_style: PathBuf,
    options: ResolverOptions,
}

impl EntryResolver {
    /// Create a resolver for `pages_dir`, prefixing every entry with `shared_style`.
    pub fn new(pages_dir: impl Into<PathBuf>, shared_style: impl Into<PathBuf>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
            shared_style: shared_style.into(),
            options: ResolverOptions::default(),
        }
    }

    /// Use custom extensions.
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Scan the pages directory and build the manifest.
    ///
    /// Fails if the directory is missing, holds no templates, or two
    /// templates map to the same page name.
    pub fn resolve(&self) -> Result<EntryManifest, ResolveError> {
        if !self.pages_dir.is_dir() {
            return Err(ResolveError::PagesDirNotFound(self.pages_dir.clone()));
        }

        let templates = self.discover_templates()?;
        if templates.is_empty() {
            return Err(ResolveError::NoPages(self.pages_dir.clone()));
        }
        check_collisions(&templates)?;

        if !self.shared_style.exists() {
            tracing::warn!("Shared stylesheet not found: {}", self.shared_style.display());
        }

        // Each page folder is scanned independently; collect keeps input order.
        let entries: Vec<Result<(PageName, PageEntry), ResolveError>> = templates
            .into_par_iter()
            .map(|(name, template)| {
                let assets = self.page_assets(&template)?;
                Ok((name, PageEntry { template, assets }))
            })
            .collect();

        let mut manifest = EntryManifest::new();
        for entry in entries {
            let (name, page) = entry?;
            tracing::debug!("Page '{}' -> {} assets", name, page.assets.len());
            manifest.insert(name, page);
        }

        Ok(manifest)
    }

    /// Find template files sitting directly inside a page folder.
    fn discover_templates(&self) -> Result<Vec<(PageName, PathBuf)>, ResolveError> {
        let mut templates = Vec::new();

        for entry in WalkDir::new(&self.pages_dir)
            .min_depth(1)
            .max_depth(2)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let Some(entry) = skip_missing(entry, &self.pages_dir)? else {
                continue;
            };
            let path = entry.path();

            if !entry.file_type().is_file() || !has_extension(path, &self.options.template_ext) {
                continue;
            }

            if entry.depth() != 2 {
                tracing::debug!("Skipping template outside a page folder: {}", path.display());
                continue;
            }

            let folder = path
                .parent()
                .ok_or_else(|| ResolveError::InvalidPageName(path.to_path_buf()))?;
            let name = folder
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(PageName::new)
                .ok_or_else(|| ResolveError::InvalidPageName(folder.to_path_buf()))?;

            templates.push((name, path.to_path_buf()));
        }

        Ok(templates)
    }

    /// Shared stylesheet, then scripts, then stylesheets of one page folder.
    fn page_assets(&self, template: &Path) -> Result<Vec<PathBuf>, ResolveError> {
        let folder = template.parent().unwrap_or(&self.pages_dir);

        let mut assets = vec![self.shared_style.clone()];
        assets.extend(list_files(folder, &self.options.script_exts)?);
        assets.extend(list_files(folder, &self.options.style_exts)?);

        Ok(assets)
    }
}

/// Reject two templates that would produce the same output page.
///
/// Names equal up to ASCII case collide too, because `<name>/index.html`
/// lands in the same directory on case-insensitive filesystems.
fn check_collisions(templates: &[(PageName, PathBuf)]) -> Result<(), ResolveError> {
    let mut seen: HashMap<String, &Path> = HashMap::with_capacity(templates.len());

    for (name, template) in templates {
        if let Some(first) = seen.insert(name.fold_key(), template.as_path()) {
            return Err(ResolveError::PageCollision {
                name: name.to_string(),
                first: first.to_path_buf(),
                second: template.clone(),
            });
        }
    }

    Ok(())
}

/// Files directly inside `dir` with one of `extensions`, sorted by name.
fn list_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ResolveError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let Some(entry) = skip_missing(entry, dir)? else {
            continue;
        };
        let path = entry.path();

        if entry.file_type().is_file() && extensions.iter().any(|ext| has_extension(path, ext)) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

/// Dot-prefixed files and folders (caches, editor lock files) are never pages or assets.
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Pass entries through, dropping dangling symlinks and looping links below
/// `root`. Errors on `root` itself are fatal.
fn skip_missing(
    entry: Result<DirEntry, walkdir::Error>,
    root: &Path,
) -> Result<Option<DirEntry>, ResolveError> {
    match entry {
        Ok(entry) => Ok(Some(entry)),
        Err(err) => {
            let missing = err.loop_ancestor().is_some()
                || err.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound);

            if err.depth() > 0 && missing {
                tracing::debug!("Skipping unreadable entry: {}", err);
                Ok(None)
            } else {
                Err(walk_error(err, root))
            }
        }
    }
}

fn walk_error(err: walkdir::Error, root: &Path) -> ResolveError {
    ResolveError::Io {
        path: err.path().unwrap_or(root).to_path_buf(),
        message: err.to_string(),
    }
}

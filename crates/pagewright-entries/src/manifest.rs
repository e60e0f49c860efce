//! The per-page entry table handed to the bundler.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::page::PageName;

/// Sources compiled together for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Template file the page was discovered from
    pub template: PathBuf,

    /// Shared stylesheet, then scripts, then page stylesheets
    pub assets: Vec<PathBuf>,
}

/// Mapping from page name to its ordered asset list.
///
/// Keys iterate in lexicographic order. Serializes as a plain
/// `{ name: [asset, ...] }` map, which is the shape bundlers accept as
/// their entry option. Relative paths are written with a leading `./` so
/// bundlers treat them as files, not package names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryManifest {
    pages: BTreeMap<PageName, PageEntry>,
}

impl EntryManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a page. Collision checks happen in the resolver.
    pub(crate) fn insert(&mut self, name: PageName, entry: PageEntry) {
        self.pages.insert(name, entry);
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages were discovered.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Check if a page exists.
    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// Ordered assets for a page.
    pub fn assets(&self, name: &str) -> Option<&[PathBuf]> {
        self.pages.get(name).map(|entry| entry.assets.as_slice())
    }

    /// Template file a page was discovered from.
    pub fn template(&self, name: &str) -> Option<&Path> {
        self.pages.get(name).map(|entry| entry.template.as_path())
    }

    /// All page names in order.
    pub fn names(&self) -> impl Iterator<Item = &PageName> {
        self.pages.keys()
    }

    /// Iterate over pages in order.
    pub fn iter(&self) -> impl Iterator<Item = (&PageName, &PageEntry)> {
        self.pages.iter()
    }

    /// Total number of asset paths across all pages.
    pub fn asset_count(&self) -> usize {
        self.pages.values().map(|entry| entry.assets.len()).sum()
    }
}

impl Serialize for EntryManifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pages.len()))?;
        for (name, entry) in &self.pages {
            let requests: Vec<Cow<'_, Path>> =
                entry.assets.iter().map(|p| file_request(p)).collect();
            map.serialize_entry(name, &requests)?;
        }
        map.end()
    }
}

/// Prefix bare relative paths with `./`.
fn file_request(path: &Path) -> Cow<'_, Path> {
    match path.components().next() {
        Some(Component::Normal(_)) => Cow::Owned(Path::new(".").join(path)),
        _ => Cow::Borrowed(path),
    }
}

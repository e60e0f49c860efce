//! Page identifiers.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

/// Name of a site page, taken from its folder under the pages root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PageName(String);

impl PageName {
    /// Create a page name.
    ///
    /// Returns `None` for empty names and names containing path separators,
    /// since a page name becomes an output directory (`<name>/index.html`).
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return None;
        }
        Some(Self(name))
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used to detect names that only differ by ASCII case.
    pub(crate) fn fold_key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_folder_names() {
        let name = PageName::new("about-us").unwrap();
        assert_eq!(name.as_str(), "about-us");
        assert_eq!(name.to_string(), "about-us");
    }

    #[test]
    fn rejects_empty_and_path_like_names() {
        assert!(PageName::new("").is_none());
        assert!(PageName::new("a/b").is_none());
        assert!(PageName::new("a\\b").is_none());
        assert!(PageName::new("..").is_none());
    }

    #[test]
    fn folds_ascii_case() {
        let upper = PageName::new("Home").unwrap();
        let lower = PageName::new("home").unwrap();
        assert_ne!(upper, lower);
        assert_eq!(upper.fold_key(), lower.fold_key());
    }
}

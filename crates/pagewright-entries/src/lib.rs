//! Entry-point discovery for multi-page static sites.
//!
//! Scans a pages directory where every immediate subfolder holds one page
//! template plus its scripts and stylesheets, and produces the ordered
//! entry table an external bundler compiles per page.

pub mod manifest;
pub mod page;
pub mod resolver;

pub use manifest::{EntryManifest, PageEntry};
pub use page::PageName;
pub use resolver::{EntryResolver, ResolveError, ResolverOptions};

//! Project scaffolding command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pagewright_config::CONFIG_FILE;

/// Run the init command in `root`.
pub fn run(root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing pagewright in {}", root.display());

    let pages_dir = root.join("src/pages");

    // Check if pages already exist
    if pages_dir.exists() {
        if !yes {
            tracing::warn!("src/pages/ already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(&pages_dir).context("Failed to create pages directory")?;
    }

    write_file(&root.join(CONFIG_FILE), DEFAULT_CONFIG, yes)?;
    write_file(&pages_dir.join("common.scss"), DEFAULT_COMMON_STYLE, yes)?;

    // Create the first page
    let home_dir = pages_dir.join("home");
    fs::create_dir_all(&home_dir).context("Failed to create home page directory")?;
    write_file(&home_dir.join("home.html"), DEFAULT_HOME_TEMPLATE, yes)?;
    write_file(&home_dir.join("main.js"), DEFAULT_HOME_SCRIPT, yes)?;
    write_file(&home_dir.join("home.scss"), DEFAULT_HOME_STYLE, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'pagewright entries' to see the resolved pages.");

    Ok(())
}

/// Write `content` unless the file exists and overwriting was not requested.
fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Ok(());
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# pagewright configuration

# "development" or "production"; --mode overrides this
mode = "production"

[pages]
# Every immediate subfolder holding a template is a page
dir = "src/pages"

# Placed first in every page entry
shared_style = "src/pages/common.scss"

[output]
dir = "dist"

[transpile]
targets = "defaults"
polyfills = "usage"
dynamic_import = true

[assets]
# Images smaller than this many bytes are inlined
inline_limit = 8192
autoprefix_grid = true

[dev_server]
open_page = "home"
"#;

const DEFAULT_COMMON_STYLE: &str = r#"// Shared styles, included before every page's own stylesheets.

*,
*::before,
*::after {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  line-height: 1.6;
}
"#;

const DEFAULT_HOME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Home</title>
</head>
<body>
  <main class="home">
    <h1>Home</h1>
    <p>Edit src/pages/home to get started.</p>
  </main>
</body>
</html>
"#;

const DEFAULT_HOME_SCRIPT: &str = r#"document.addEventListener('DOMContentLoaded', () => {
  document.querySelector('.home')?.classList.add('is-ready');
});
"#;

const DEFAULT_HOME_STYLE: &str = r#".home {
  display: grid;
  place-items: center;
  min-height: 100vh;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pagewright_config::load_config;
    use pagewright_entries::EntryResolver;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_a_resolvable_site() {
        let temp = tempdir().unwrap();

        run(temp.path(), false).unwrap();

        let config = load_config(&temp.path().join(CONFIG_FILE)).unwrap();
        config.validate().unwrap();

        let pages = temp.path().join(&config.pages.dir);
        let manifest = EntryResolver::new(&pages, temp.path().join(&config.pages.shared_style))
            .resolve()
            .unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.assets("home").unwrap().len(), 3);
    }

    #[test]
    fn leaves_existing_pages_alone() {
        let temp = tempdir().unwrap();
        let pages = temp.path().join("src/pages");
        fs::create_dir_all(&pages).unwrap();

        run(temp.path(), false).unwrap();

        assert!(!temp.path().join(CONFIG_FILE).exists());
        assert!(!pages.join("home").exists());
    }

    #[test]
    fn overwrites_with_yes() {
        let temp = tempdir().unwrap();
        let pages = temp.path().join("src/pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("common.scss"), "// old").unwrap();

        run(temp.path(), true).unwrap();

        let common = fs::read_to_string(pages.join("common.scss")).unwrap();
        assert_eq!(common, DEFAULT_COMMON_STYLE);
        assert!(pages.join("home/home.html").exists());
    }
}

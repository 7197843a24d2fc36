use std::path::{Path, PathBuf};

use spdlog::{debug, info};

use crate::config::{read_config, Config, ConfigError};
use crate::content::collection::ContentConfig;
use crate::css::CssConfig;

pub const SITE_CONFIG_FILE: &str = "folio.toml";
pub const CSS_CONFIG_FILE: &str = "css.toml";
pub const CONTENT_CONFIG_FILE: &str = "content.toml";

/// The three configuration files of a site, found by name in its root.
///
/// `folio.toml` is required; a missing `css.toml` or `content.toml` means no
/// presets or no collections.
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub css: CssConfig,
    pub content: ContentConfig,
}

impl Project {
    pub fn open(root: &Path) -> Result<Project, ConfigError> {
        let config = read_config(&root.join(SITE_CONFIG_FILE))?;

        let css_path = root.join(CSS_CONFIG_FILE);
        let css = if css_path.exists() {
            CssConfig::read(&css_path)?
        } else {
            debug!("No {} in {}", CSS_CONFIG_FILE, root.display());
            CssConfig::default()
        };

        let content_path = root.join(CONTENT_CONFIG_FILE);
        let content = if content_path.exists() {
            ContentConfig::read(&content_path)?
        } else {
            debug!("No {} in {}", CONTENT_CONFIG_FILE, root.display());
            ContentConfig::default()
        };

        info!("Opened project {} with {} collection(s)", root.display(), content.collections().len());

        Ok(Project {
            root: root.to_path_buf(),
            config,
            css,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::site_builder::SiteBuilder;
    use crate::test_data::{BLOG_POST_YAML, CONTENT_CONFIG, CSS_CONFIG, SITE_CONFIG};

    use super::*;

    fn write(root: &Path, name: &str, content: &str) {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn site_in(dir: &Path) {
        write(dir, SITE_CONFIG_FILE, SITE_CONFIG);
        write(dir, CSS_CONFIG_FILE, CSS_CONFIG);
        write(dir, CONTENT_CONFIG_FILE, CONTENT_CONFIG);
        write(dir, "src/data/blog/2021/Hello World.mdx", BLOG_POST_YAML);
    }

    #[test]
    fn test_open_relative_root() {
        // Created under the working directory so it can be reached as `./<name>`
        let dir = TempDir::new_in(".").unwrap();
        site_in(dir.path());
        let root = Path::new(".").join(dir.path().file_name().unwrap());

        let project = Project::open(&root).unwrap();
        assert_eq!(project.root, root);
        assert_eq!(project.content.collections().len(), 2);

        let collections = SiteBuilder::new(&project).collect().unwrap();
        let ids: Vec<&str> = collections[0].entries().iter().map(|e| e.id.0.as_str()).collect();
        assert_eq!(ids, vec!["2021/hello-world"]);
        assert_eq!(collections[0].entries()[0].file, PathBuf::from("src/data/blog/2021/Hello World.mdx"));
    }

    #[test]
    fn test_missing_site_config() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), CSS_CONFIG_FILE, CSS_CONFIG);
        assert!(matches!(Project::open(dir.path()), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_css_config() {
        let dir = TempDir::new().unwrap();
        site_in(dir.path());
        write(dir.path(), CSS_CONFIG_FILE, "presets = [{ kind = \"web_fonts\", fonts = { sans = \"Asap:450\" } }]");
        assert!(matches!(Project::open(dir.path()), Err(ConfigError::InvalidFont { .. })));

        write(dir.path(), CSS_CONFIG_FILE, "presets = [{ kind = \"unknown\" }]");
        assert!(matches!(Project::open(dir.path()), Err(ConfigError::Parse { .. })));
    }
}

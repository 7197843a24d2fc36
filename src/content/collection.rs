use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{read_toml, ConfigError};
use crate::content::loader::is_valid_did;
use crate::content::schema::SchemaVersion;

/// Where the entries of a collection come from. Exactly one per collection.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LoaderConfig {
    Glob { pattern: String, base: PathBuf },
    Remote { repo: String },
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    BlogPost,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CollectionDef {
    pub name: String,
    pub loader: LoaderConfig,
    #[serde(default)]
    pub schema: Option<SchemaKind>,
    #[serde(default)]
    pub schema_version: SchemaVersion,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentFile {
    #[serde(default, rename = "collection")]
    collections: Vec<CollectionDef>,
}

/// The named collections of a site.
///
/// Consumers look collections up by name, so names are unique and renaming
/// one breaks every page that reads it.
#[derive(Debug, Clone, Default)]
pub struct ContentConfig {
    collections: Vec<CollectionDef>,
}

impl ContentConfig {
    pub fn new(collections: Vec<CollectionDef>) -> Result<ContentConfig, ConfigError> {
        lazy_static! {
            static ref NAME_REGEX: Regex = Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap();
        }

        let mut names = HashSet::new();
        for collection in &collections {
            if !NAME_REGEX.is_match(&collection.name) {
                return Err(ConfigError::InvalidCollectionName(collection.name.clone()));
            }
            if !names.insert(collection.name.as_str()) {
                return Err(ConfigError::DuplicateCollection(collection.name.clone()));
            }
            validate_loader(collection)?;
        }

        Ok(ContentConfig { collections })
    }

    pub fn read(path: &Path) -> Result<ContentConfig, ConfigError> {
        let file: ContentFile = read_toml(path)?;
        Self::new(file.collections)
    }

    pub fn collections(&self) -> &[CollectionDef] {
        &self.collections
    }

    pub fn get(&self, name: &str) -> Option<&CollectionDef> {
        self.collections.iter().find(|c| c.name == name)
    }
}

fn validate_loader(collection: &CollectionDef) -> Result<(), ConfigError> {
    match collection.loader {
        LoaderConfig::Glob { ref pattern, .. } => {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(ConfigError::InvalidPattern {
                    collection: collection.name.clone(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                });
            }
            if pattern.trim().is_empty() {
                return Err(ConfigError::InvalidPattern {
                    collection: collection.name.clone(),
                    pattern: pattern.clone(),
                    reason: "empty pattern".to_string(),
                });
            }
        }
        LoaderConfig::Remote { ref repo } => {
            if !is_valid_did(repo) {
                return Err(ConfigError::InvalidRepository {
                    collection: collection.name.clone(),
                    repo: repo.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::test_data::CONTENT_CONFIG;

    use super::*;

    fn parse(src: &str) -> Result<ContentConfig, ConfigError> {
        let file: ContentFile = toml::from_str(src).unwrap();
        ContentConfig::new(file.collections)
    }

    #[test]
    fn test_read_collections() {
        let content = parse(CONTENT_CONFIG).unwrap();
        assert_eq!(content.collections().len(), 2);

        let blog = content.get("blog").unwrap();
        assert_eq!(blog.loader, LoaderConfig::Glob {
            pattern: "**/*.mdx".to_string(),
            base: PathBuf::from("src/data/blog"),
        });
        assert_eq!(blog.schema, Some(SchemaKind::BlogPost));
        assert_eq!(blog.schema_version, SchemaVersion::V2);

        let documents = content.get("documents").unwrap();
        assert_eq!(documents.loader, LoaderConfig::Remote { repo: "did:plc:qttsv4e7pu2jl3ilanfgc3zn".to_string() });
        assert_eq!(documents.schema, None);
        assert!(content.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_names() {
        let src = r#"
[[collection]]
name = "blog"
loader = { kind = "glob", pattern = "*.md", base = "a" }

[[collection]]
name = "blog"
loader = { kind = "glob", pattern = "*.mdx", base = "b" }
"#;
        let err = parse(src).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCollection(ref name) if name == "blog"));
    }

    #[test]
    fn test_invalid_name() {
        let src = r#"
[[collection]]
name = "Blog Posts"
loader = { kind = "glob", pattern = "*.md", base = "a" }
"#;
        assert!(matches!(parse(src), Err(ConfigError::InvalidCollectionName(_))));
    }

    #[test]
    fn test_invalid_loader_parameters() {
        let src = r#"
[[collection]]
name = "documents"
loader = { kind = "remote", repo = "dane.computer" }
"#;
        assert!(matches!(parse(src), Err(ConfigError::InvalidRepository { .. })));

        let src = r#"
[[collection]]
name = "blog"
loader = { kind = "glob", pattern = "[*.md", base = "a" }
"#;
        assert!(matches!(parse(src), Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_legacy_schema_version() {
        let src = r#"
[[collection]]
name = "blog"
schema = "blog_post"
schema_version = 1
loader = { kind = "glob", pattern = "**/*.mdx", base = "./src/data/blog" }
"#;
        let content = parse(src).unwrap();
        assert_eq!(content.get("blog").unwrap().schema_version, SchemaVersion::V1);
    }

    #[test]
    fn test_empty_file() {
        let content = parse("").unwrap();
        assert!(content.collections().is_empty());
    }
}

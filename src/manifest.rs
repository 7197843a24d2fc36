use std::path::PathBuf;

use serde::Serialize;

use crate::config::{Adapter, Integration, Markdown, Site};
use crate::content::schema::BlogPost;
use crate::content::{EntryFormat, EntryId, FrontMatter};
use crate::css::{Preset, Transformer};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// Everything the web framework needs from this build, as `manifest.json`.
#[derive(Serialize, Debug)]
pub struct Manifest<'a> {
    pub site: &'a Site,
    pub markdown: &'a Markdown,
    pub integrations: &'a [Integration],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter: Option<&'a Adapter>,
    pub css: CssManifest<'a>,
    pub collections: &'a [CollectionManifest],
}

#[derive(Serialize, Debug)]
pub struct CssManifest<'a> {
    pub presets: &'a [Preset],
    pub transformers: &'a [Transformer],
    pub stylesheets: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "loader", rename_all = "lowercase")]
pub enum CollectionManifest {
    Glob {
        name: String,
        base: PathBuf,
        pattern: String,
        entries: Vec<EntryManifest>,
    },
    /// Fetched by the external loader at framework build time.
    Remote { name: String, repo: String },
}

impl CollectionManifest {
    pub fn name(&self) -> &str {
        match self {
            CollectionManifest::Glob { name, .. } => name,
            CollectionManifest::Remote { name, .. } => name,
        }
    }

    pub fn entries(&self) -> &[EntryManifest] {
        match self {
            CollectionManifest::Glob { entries, .. } => entries,
            CollectionManifest::Remote { .. } => &[],
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EntryManifest {
    pub id: EntryId,
    /// Relative to the project root.
    pub file: PathBuf,
    pub format: EntryFormat,
    pub data: EntryData,
    pub html: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum EntryData {
    BlogPost(BlogPost),
    /// Collections without a schema keep their front matter as is.
    Raw(FrontMatter),
}

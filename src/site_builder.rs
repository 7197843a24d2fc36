use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use spdlog::{info, warn};
use thiserror::Error;

use crate::config::ConfigError;
use crate::content::collection::{CollectionDef, SchemaKind};
use crate::content::loader::{GlobLoader, LoadError, Loader};
use crate::content::schema::{BlogPost, SchemaError};
use crate::content::{EntryId, RawEntry};
use crate::manifest::{CollectionManifest, CssManifest, EntryData, EntryManifest, Manifest, MANIFEST_FILE, SITEMAP_FILE};
use crate::project::Project;
use crate::render::body_renderer::{BodyRenderer, RenderError};
use crate::sitemap::{Sitemap, SitemapUrl};
use crate::util::path::relative_to;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("collection '{collection}': {source}")]
    Load {
        collection: String,
        #[source]
        source: LoadError,
    },
    #[error("collection '{collection}', entry '{entry}': {source}")]
    InvalidEntry {
        collection: String,
        entry: EntryId,
        #[source]
        source: SchemaError,
    },
    #[error("collection '{collection}', entry '{entry}': {source}")]
    Render {
        collection: String,
        entry: EntryId,
        #[source]
        source: RenderError,
    },
    #[error("error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error serializing manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("error writing sitemap: {0}")]
    Sitemap(#[from] quick_xml::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub collections: usize,
    pub entries: usize,
    pub files: Vec<PathBuf>,
}

pub struct SiteBuilder<'a> {
    project: &'a Project,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(project: &'a Project) -> Self {
        SiteBuilder { project }
    }

    /// Loads, validates and renders every collection.
    ///
    /// Stops at the first failing collection or entry.
    pub fn collect(&self) -> Result<Vec<CollectionManifest>, BuildError> {
        let renderer = BodyRenderer::new(&self.project.config, &self.project.css);

        let mut collections = vec![];
        for def in self.project.content.collections() {
            let collection = match Loader::for_config(&def.loader, &self.project.root) {
                Loader::Glob(loader) => self.collect_glob(def, &loader, &renderer)?,
                Loader::Remote(remote) => {
                    info!("Collection {} is loaded externally from {}", def.name, remote.repo);
                    CollectionManifest::Remote {
                        name: def.name.clone(),
                        repo: remote.repo,
                    }
                }
            };
            collections.push(collection);
        }

        Ok(collections)
    }

    fn collect_glob(&self, def: &CollectionDef, loader: &GlobLoader, renderer: &BodyRenderer) -> Result<CollectionManifest, BuildError> {
        let raw_entries = loader.load().map_err(|source| BuildError::Load {
            collection: def.name.clone(),
            source,
        })?;

        let mut entries = Vec::with_capacity(raw_entries.len());
        for raw in raw_entries {
            entries.push(self.build_entry(def, raw, renderer)?);
        }

        Ok(CollectionManifest::Glob {
            name: def.name.clone(),
            base: relative_to(&loader.base, &self.project.root).unwrap_or_else(|| loader.base.clone()),
            pattern: loader.pattern.clone(),
            entries,
        })
    }

    fn build_entry(&self, def: &CollectionDef, raw: RawEntry, renderer: &BodyRenderer) -> Result<EntryManifest, BuildError> {
        let data = match def.schema {
            Some(SchemaKind::BlogPost) => match BlogPost::validate(&raw.front_matter, def.schema_version) {
                Ok(post) => EntryData::BlogPost(post),
                Err(source) => {
                    return Err(BuildError::InvalidEntry {
                        collection: def.name.clone(),
                        entry: raw.id,
                        source,
                    });
                }
            },
            None => EntryData::Raw(raw.front_matter),
        };

        let html = match renderer.render(raw.format, &raw.body) {
            Ok(html) => html,
            Err(source) => {
                return Err(BuildError::Render {
                    collection: def.name.clone(),
                    entry: raw.id,
                    source,
                });
            }
        };

        let file = relative_to(&raw.file_path, &self.project.root).unwrap_or_else(|| raw.file_path.clone());

        Ok(EntryManifest {
            id: raw.id,
            file,
            format: raw.format,
            data,
            html,
        })
    }

    /// Writes `manifest.json` and, with the sitemap integration, `sitemap.xml`
    /// into `out_dir`. Nothing is written unless every collection passed.
    pub fn build(&self, out_dir: &Path) -> Result<BuildReport, BuildError> {
        let collections = self.collect()?;
        let config = &self.project.config;

        let manifest = Manifest {
            site: &config.site,
            markdown: &config.markdown,
            integrations: &config.integrations,
            adapter: config.adapter.as_ref(),
            css: CssManifest {
                presets: &self.project.css.presets,
                transformers: &self.project.css.transformers,
                stylesheets: self.project.css.stylesheets()?,
            },
            collections: &collections,
        };
        let manifest_json = serde_json::to_vec_pretty(&manifest)?;

        let sitemap_xml = if config.sitemap_enabled() {
            let sitemap = Sitemap { site_url: &config.site.url };
            Some(sitemap.render(&sitemap_urls(&collections))?)
        } else {
            None
        };

        fs::create_dir_all(out_dir).map_err(|source| BuildError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let mut files = vec![write_file(&out_dir.join(MANIFEST_FILE), &manifest_json)?];
        if let Some(xml) = sitemap_xml {
            files.push(write_file(&out_dir.join(SITEMAP_FILE), &xml)?);
        } else if !collections.is_empty() {
            warn!("Sitemap integration disabled, skipping {}", SITEMAP_FILE);
        }

        let entries: usize = collections.iter().map(|c| c.entries().len()).sum();
        info!("Built {} collection(s) with {} entries into {}", collections.len(), entries, out_dir.display());

        Ok(BuildReport {
            collections: collections.len(),
            entries,
            files,
        })
    }
}

fn sitemap_urls(collections: &[CollectionManifest]) -> Vec<SitemapUrl> {
    let mut urls = vec![SitemapUrl { path: String::new(), lastmod: None }];
    for collection in collections {
        for entry in collection.entries() {
            let lastmod = match entry.data {
                EntryData::BlogPost(ref post) => Some(post.published_at),
                EntryData::Raw(_) => None,
            };
            urls.push(SitemapUrl {
                path: format!("{}/{}", collection.name(), entry.id),
                lastmod,
            });
        }
    }
    urls
}

fn write_file(path: &Path, content: &[u8]) -> Result<PathBuf, BuildError> {
    fs::write(path, content).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::content::EntryFormat;

    use super::*;

    fn entry(id: &str, data: EntryData) -> EntryManifest {
        EntryManifest {
            id: EntryId(id.to_string()),
            file: PathBuf::from(format!("src/data/blog/{}.mdx", id)),
            format: EntryFormat::Mdx,
            data,
            html: String::new(),
        }
    }

    #[test]
    fn test_sitemap_urls() {
        let post = BlogPost {
            title: "Hello".to_string(),
            description: "World".to_string(),
            published_at: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            year: None,
            publication: None,
            author: None,
            rkey: None,
            cid: None,
        };
        let collections = vec![
            CollectionManifest::Glob {
                name: "blog".to_string(),
                base: PathBuf::from("src/data/blog"),
                pattern: "**/*.mdx".to_string(),
                entries: vec![
                    entry("hello", EntryData::BlogPost(post)),
                    entry("notes", EntryData::Raw(Default::default())),
                ],
            },
            CollectionManifest::Remote {
                name: "documents".to_string(),
                repo: "did:plc:qttsv4e7pu2jl3ilanfgc3zn".to_string(),
            },
        ];

        let urls = sitemap_urls(&collections);
        assert_eq!(urls, vec![
            SitemapUrl { path: "".to_string(), lastmod: None },
            SitemapUrl { path: "blog/hello".to_string(), lastmod: NaiveDate::from_ymd_opt(2021, 6, 1) },
            SitemapUrl { path: "blog/notes".to_string(), lastmod: None },
        ]);
    }
}

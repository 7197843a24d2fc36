use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use lazy_static::lazy_static;
use regex::Regex;
use spdlog::{debug, info};
use thiserror::Error;

use crate::content::collection::LoaderConfig;
use crate::content::front_matter::{parse_document, FrontMatterError};
use crate::content::{EntryFormat, EntryId, RawEntry};
use crate::util::path::{normalize, relative_to};
use crate::util::slug::slugify_path;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("base directory {} does not exist", .0.display())]
    MissingBase(PathBuf),
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("error matching files: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported content file {}, expected .md or .mdx", .0.display())]
    Unsupported(PathBuf),
    #[error("front matter error in {}: {source}", .path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
    #[error("{} is not below the collection base {}", .path.display(), .base.display())]
    OutsideBase { path: PathBuf, base: PathBuf },
    #[error("{} and {} both resolve to id '{id}'", .first.display(), .second.display())]
    DuplicateId {
        id: EntryId,
        first: PathBuf,
        second: PathBuf,
    },
}

pub fn is_valid_did(repo: &str) -> bool {
    lazy_static! {
        static ref DID_REGEX: Regex = Regex::new(r"^did:[a-z0-9]+:[A-Za-z0-9._:%-]*[A-Za-z0-9._%-]$").unwrap();
    }
    DID_REGEX.is_match(repo)
}

/// Loads the content files matching `pattern` below `base`.
pub struct GlobLoader {
    pub base: PathBuf,
    pub pattern: String,
}

impl GlobLoader {
    pub fn retrieve_files(&self) -> Result<Vec<PathBuf>, LoadError> {
        if !self.base.is_dir() {
            return Err(LoadError::MissingBase(self.base.clone()));
        }

        let base = glob::Pattern::escape(&self.base.to_string_lossy());
        let full_pattern = format!("{}/{}", base.trim_end_matches('/'), self.pattern);
        let paths = glob::glob(&full_pattern).map_err(|source| LoadError::Pattern {
            pattern: self.pattern.clone(),
            source,
        })?;

        let mut files = vec![];
        for path in paths {
            let path = path?;
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    pub fn load(&self) -> Result<Vec<RawEntry>, LoadError> {
        let mut entries: BTreeMap<EntryId, RawEntry> = BTreeMap::new();

        for file_path in self.retrieve_files()? {
            let entry = self.load_entry(file_path)?;
            if let Some(existing) = entries.get(&entry.id) {
                return Err(LoadError::DuplicateId {
                    id: entry.id.clone(),
                    first: existing.file_path.clone(),
                    second: entry.file_path,
                });
            }
            debug!("Loaded entry {} from {}", entry.id, entry.file_path.display());
            entries.insert(entry.id.clone(), entry);
        }

        info!("Loaded {} entries from {}", entries.len(), self.base.display());
        Ok(entries.into_values().collect())
    }

    fn load_entry(&self, file_path: PathBuf) -> Result<RawEntry, LoadError> {
        let Some(format) = EntryFormat::guess(&file_path) else {
            return Err(LoadError::Unsupported(file_path));
        };

        let raw = fs::read_to_string(&file_path).map_err(|source| LoadError::Io {
            path: file_path.clone(),
            source,
        })?;

        let (front_matter, body) = match parse_document(&raw) {
            Ok(document) => document,
            Err(source) => return Err(LoadError::FrontMatter { path: file_path, source }),
        };

        Ok(RawEntry {
            id: self.entry_id(&file_path)?,
            format,
            front_matter,
            body: body.to_string(),
            file_path,
        })
    }

    /// Slug of the path below the base, without its extension. The glob
    /// crate may drop a leading `./`, so both sides are normalized first.
    fn entry_id(&self, file_path: &Path) -> Result<EntryId, LoadError> {
        match relative_to(file_path, &self.base) {
            Some(relative) => Ok(EntryId(slugify_path(&relative.with_extension("")))),
            None => Err(LoadError::OutsideBase {
                path: file_path.to_path_buf(),
                base: self.base.clone(),
            }),
        }
    }
}

/// A collection fed by an external repository loader.
///
/// Fetching is done by the web framework; only the identifier is kept here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    pub repo: String,
}

pub enum Loader {
    Glob(GlobLoader),
    Remote(RemoteSource),
}

impl Loader {
    /// Binds a loader config to the project root.
    pub fn for_config(config: &LoaderConfig, root: &Path) -> Loader {
        match config {
            LoaderConfig::Glob { pattern, base } => {
                let base = normalize(&root.join(base));
                Loader::Glob(GlobLoader {
                    base: if base.as_os_str().is_empty() { PathBuf::from(".") } else { base },
                    pattern: pattern.clone(),
                })
            }
            LoaderConfig::Remote { repo } => Loader::Remote(RemoteSource { repo: repo.clone() }),
        }
    }
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spdlog::warn;
use thiserror::Error;
use url::Url;

use crate::render::code_block::CodeTransform;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error opening configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error parsing configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid site url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Output mode 'server' requires an [adapter] section")]
    MissingAdapter,
    #[error("Integration '{0}' is declared more than once")]
    DuplicateIntegration(&'static str),
    #[error("Preset '{0}' is declared more than once")]
    DuplicatePreset(&'static str),
    #[error("Invalid web font '{spec}': {reason}")]
    InvalidFont { spec: String, reason: String },
    #[error("Collection '{0}' is declared more than once")]
    DuplicateCollection(String),
    #[error("Invalid collection name '{0}', expected lowercase letters, digits, '-' or '_'")]
    InvalidCollectionName(String),
    #[error("Collection '{collection}' has an invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        collection: String,
        pattern: String,
        reason: String,
    },
    #[error("Collection '{collection}' has an invalid repository '{repo}', expected a DID like did:plc:<id>")]
    InvalidRepository { collection: String, repo: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Static,
    Server,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageService {
    #[default]
    Sharp,
    Passthrough,
    Compile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Site {
    pub url: String,
    #[serde(default)]
    pub output: OutputMode,
    #[serde(default)]
    pub image_service: ImageService,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Markdown {
    #[serde(default = "default_highlighter")]
    pub highlighter: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub code_transforms: Vec<CodeTransform>,
}

fn default_highlighter() -> String {
    "shiki".to_string()
}

fn default_theme() -> String {
    "github-dark".to_string()
}

impl Default for Markdown {
    fn default() -> Self {
        Markdown {
            highlighter: default_highlighter(),
            theme: default_theme(),
            code_transforms: vec![],
        }
    }
}

/// Build-time integrations handed over to the web framework.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Integration {
    Unocss {
        #[serde(default)]
        inject_reset: bool,
    },
    Sitemap,
    Mdx,
}

impl Integration {
    pub fn kind(&self) -> &'static str {
        match self {
            Integration::Unocss { .. } => "unocss",
            Integration::Sitemap => "sitemap",
            Integration::Mdx => "mdx",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdapterImageService {
    Compile,
    Passthrough,
    Cloudflare,
}

/// Deployment adapter options. Passed verbatim to the adapter.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Adapter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_service: Option<AdapterImageService>,
    #[serde(default)]
    pub platform_proxy: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub site: Site,
    #[serde(default)]
    pub markdown: Markdown,
    #[serde(default, rename = "integration")]
    pub integrations: Vec<Integration>,
    pub adapter: Option<Adapter>,
    pub log: Option<Log>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_site_url(&self.site.url)?;

        if self.markdown.highlighter.trim().is_empty() {
            return Err(ConfigError::Empty("markdown.highlighter"));
        }
        if self.markdown.theme.trim().is_empty() {
            return Err(ConfigError::Empty("markdown.theme"));
        }

        let mut seen = HashSet::new();
        for integration in &self.integrations {
            if !seen.insert(integration.kind()) {
                return Err(ConfigError::DuplicateIntegration(integration.kind()));
            }
        }

        match (self.site.output, &self.adapter) {
            (OutputMode::Server, None) => return Err(ConfigError::MissingAdapter),
            (OutputMode::Static, Some(adapter)) => {
                warn!("Adapter '{}' is configured but output mode is static", adapter.name);
            }
            _ => {}
        }

        if let Some(ref adapter) = self.adapter {
            if adapter.name.trim().is_empty() {
                return Err(ConfigError::Empty("adapter.name"));
            }
        }

        Ok(())
    }

    pub fn has_integration(&self, kind: &str) -> bool {
        self.integrations.iter().any(|i| i.kind() == kind)
    }

    pub fn mdx_enabled(&self) -> bool {
        self.has_integration("mdx")
    }

    pub fn sitemap_enabled(&self) -> bool {
        self.has_integration("sitemap")
    }
}

fn validate_site_url(site_url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: site_url.to_string(),
        reason,
    };

    let url = Url::parse(site_url).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {}", other))),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

pub(crate) fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    match exe_dir {
        Some(exe_dir) => {
            let str_path = path.to_string_lossy();
            PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
        }
        None => path,
    }
}

pub(crate) fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<T>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_config(cfg_path: &Path) -> Result<Config, ConfigError> {
    let mut cfg: Config = read_toml(cfg_path)?;

    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path);
    }

    cfg.validate()?;
    Ok(cfg)
}

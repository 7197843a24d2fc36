use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

pub mod collection;
pub mod front_matter;
pub mod loader;
pub mod schema;

/// Front-matter value, normalized across YAML and TOML.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    List(Vec<FieldValue>),
    Table(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "number",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Date(_) => "date",
            FieldValue::List(_) => "list",
            FieldValue::Table(_) => "table",
        }
    }
}

pub type FrontMatter = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryFormat {
    Markdown,
    Mdx,
}

impl EntryFormat {
    pub fn guess(file_name: &Path) -> Option<EntryFormat> {
        match file_name.extension()?.to_str()? {
            "md" | "markdown" => Some(EntryFormat::Markdown),
            "mdx" => Some(EntryFormat::Mdx),
            _ => None,
        }
    }
}

/// A content file as found by a loader, before schema validation.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub id: EntryId,
    pub file_path: PathBuf,
    pub format: EntryFormat,
    pub front_matter: FrontMatter,
    pub body: String,
}

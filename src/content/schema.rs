use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spdlog::debug;
use thiserror::Error;

use crate::content::{FieldValue, FrontMatter};
use crate::util::date::parse_date;

const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const PUBLISHED_AT: &str = "published_at";
const YEAR: &str = "year";
const PUBLICATION: &str = "publication";
const AUTHOR: &str = "author";
const RKEY: &str = "rkey";
const CID: &str = "cid";

const V1_FIELDS: [&str; 4] = [TITLE, DESCRIPTION, YEAR, PUBLISHED_AT];
const V2_FIELDS: [&str; 8] = [TITLE, DESCRIPTION, PUBLISHED_AT, YEAR, PUBLICATION, AUTHOR, RKEY, CID];

/// Shape of the blog-post front matter a collection expects.
///
/// `V1` is the early shape with a mandatory `year`; it only knows the four
/// original fields and drops the rest. `V2` is the current shape. Both
/// produce the same [`BlogPost`].
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum SchemaVersion {
    V1,
    #[default]
    V2,
}

impl TryFrom<u8> for SchemaVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SchemaVersion::V1),
            2 => Ok(SchemaVersion::V2),
            other => Err(format!("unknown schema version {}, expected 1 or 2", other)),
        }
    }
}

impl From<SchemaVersion> for u8 {
    fn from(value: SchemaVersion) -> Self {
        match value {
            SchemaVersion::V1 => 1,
            SchemaVersion::V2 => 2,
        }
    }
}

/// A date as found in front matter: already a date, or text to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    Parsed(NaiveDate),
    Text(String),
}

impl RawDate {
    pub fn from_field(value: &FieldValue) -> Option<RawDate> {
        match value {
            FieldValue::Date(date) => Some(RawDate::Parsed(*date)),
            FieldValue::Text(text) => Some(RawDate::Text(text.clone())),
            _ => None,
        }
    }

    pub fn resolve(&self) -> Result<NaiveDate, String> {
        match self {
            RawDate::Parsed(date) => Ok(*date),
            RawDate::Text(text) => parse_date(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    Empty,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    InvalidDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::Missing => write!(f, "{}: required", self.field),
            IssueKind::Empty => write!(f, "{}: must not be empty", self.field),
            IssueKind::WrongType { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.field, expected, found)
            }
            IssueKind::InvalidDate(ref reason) => write!(f, "{}: invalid date ({})", self.field, reason),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_issues(.issues))]
pub struct SchemaError {
    pub issues: Vec<FieldIssue>,
}

impl SchemaError {
    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|issue| issue.field).collect()
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues.iter().map(|issue| issue.to_string()).collect::<Vec<_>>().join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPost {
    pub title: String,
    pub description: String,
    pub published_at: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
}

impl BlogPost {
    /// Validates and normalizes front matter.
    ///
    /// Every issue of the record is reported, not just the first one.
    pub fn validate(front_matter: &FrontMatter, version: SchemaVersion) -> Result<BlogPost, SchemaError> {
        let mut checker = Checker {
            front_matter,
            issues: vec![],
        };

        let known: &[&str] = match version {
            SchemaVersion::V1 => &V1_FIELDS,
            SchemaVersion::V2 => &V2_FIELDS,
        };
        for key in front_matter.keys() {
            if !known.contains(&key.as_str()) {
                debug!("Ignoring front matter field {}", key);
            }
        }

        let title = checker.required_text(TITLE);
        let description = checker.required_text(DESCRIPTION);
        let published_at = checker.date(PUBLISHED_AT);
        let year = checker.year(version == SchemaVersion::V1);

        let (publication, author, rkey, cid) = match version {
            SchemaVersion::V1 => (None, None, None, None),
            SchemaVersion::V2 => (
                checker.optional_text(PUBLICATION),
                checker.optional_text(AUTHOR),
                checker.optional_text(RKEY),
                checker.optional_text(CID),
            ),
        };

        match (title, description, published_at) {
            (Some(title), Some(description), Some(published_at)) if checker.issues.is_empty() => Ok(BlogPost {
                title,
                description,
                published_at,
                year,
                publication,
                author,
                rkey,
                cid,
            }),
            _ => Err(SchemaError { issues: checker.issues }),
        }
    }
}

struct Checker<'a> {
    front_matter: &'a FrontMatter,
    issues: Vec<FieldIssue>,
}

impl Checker<'_> {
    fn issue(&mut self, field: &'static str, kind: IssueKind) {
        self.issues.push(FieldIssue { field, kind });
    }

    fn wrong_type(&mut self, field: &'static str, expected: &'static str, value: &FieldValue) {
        self.issue(field, IssueKind::WrongType {
            expected,
            found: value.type_name(),
        });
    }

    fn optional_text(&mut self, field: &'static str) -> Option<String> {
        match self.front_matter.get(field)? {
            FieldValue::Text(text) => Some(text.clone()),
            other => {
                self.wrong_type(field, "text", other);
                None
            }
        }
    }

    fn required_text(&mut self, field: &'static str) -> Option<String> {
        if !self.front_matter.contains_key(field) {
            self.issue(field, IssueKind::Missing);
            return None;
        }

        let text = self.optional_text(field)?;
        if text.trim().is_empty() {
            self.issue(field, IssueKind::Empty);
            return None;
        }
        Some(text)
    }

    fn date(&mut self, field: &'static str) -> Option<NaiveDate> {
        let Some(value) = self.front_matter.get(field) else {
            self.issue(field, IssueKind::Missing);
            return None;
        };

        let Some(raw) = RawDate::from_field(value) else {
            self.wrong_type(field, "date", value);
            return None;
        };

        match raw.resolve() {
            Ok(date) => Some(date),
            Err(reason) => {
                self.issue(field, IssueKind::InvalidDate(reason));
                None
            }
        }
    }

    fn year(&mut self, required: bool) -> Option<i32> {
        let Some(value) = self.front_matter.get(YEAR) else {
            if required {
                self.issue(YEAR, IssueKind::Missing);
            }
            return None;
        };

        let year = match value {
            FieldValue::Integer(i) => i32::try_from(*i).ok(),
            FieldValue::Float(f) if f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64 => Some(*f as i32),
            _ => None,
        };
        if year.is_none() {
            self.wrong_type(YEAR, "integer", value);
        }
        year
    }
}

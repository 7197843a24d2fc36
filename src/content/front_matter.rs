use std::collections::BTreeMap;

use thiserror::Error;

use crate::content::{FieldValue, FrontMatter};
use crate::util::toml_date::TomlDate;

const YAML_DELIMITER: &str = "---";
const TOML_DELIMITER: &str = "+++";

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front matter opened with '{0}' is never closed")]
    Unclosed(&'static str),
    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid TOML front matter: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("front matter must be a mapping, found {0}")]
    NotAMapping(&'static str),
    #[error("front matter keys must be text, found {0:?}")]
    InvalidKey(serde_yaml::Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Yaml,
    Toml,
}

impl Delimiter {
    fn from_line(line: &str) -> Option<Delimiter> {
        match line.trim_end() {
            YAML_DELIMITER => Some(Delimiter::Yaml),
            TOML_DELIMITER => Some(Delimiter::Toml),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Yaml => YAML_DELIMITER,
            Delimiter::Toml => TOML_DELIMITER,
        }
    }
}

/// Splits `raw` into its front matter block and the body.
///
/// `---` opens YAML, `+++` opens TOML. The closing delimiter must be the same
/// as the opening one.
fn split(raw: &str) -> Result<Option<(Delimiter, &str, &str)>, FrontMatterError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = raw.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok(None);
    };
    let Some(delimiter) = Delimiter::from_line(first) else {
        return Ok(None);
    };

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if Delimiter::from_line(line) == Some(delimiter) {
            let block = &raw[start..offset];
            let body = &raw[offset + line.len()..];
            return Ok(Some((delimiter, block, body)));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unclosed(delimiter.as_str()))
}

/// Parses a content document into its front matter and body.
///
/// A document without front matter has an empty map and is all body.
pub fn parse_document(raw: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    match split(raw)? {
        None => Ok((FrontMatter::new(), raw)),
        Some((Delimiter::Yaml, block, body)) => Ok((parse_yaml(block)?, body)),
        Some((Delimiter::Toml, block, body)) => Ok((parse_toml(block)?, body)),
    }
}

fn parse_yaml(block: &str) -> Result<FrontMatter, FrontMatterError> {
    if block.trim().is_empty() {
        return Ok(FrontMatter::new());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(block)?;
    match value {
        serde_yaml::Value::Null => Ok(FrontMatter::new()),
        serde_yaml::Value::Mapping(mapping) => yaml_mapping(mapping),
        other => Err(FrontMatterError::NotAMapping(yaml_type_name(&other))),
    }
}

fn yaml_mapping(mapping: serde_yaml::Mapping) -> Result<BTreeMap<String, FieldValue>, FrontMatterError> {
    let mut table = BTreeMap::new();
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(key) => key,
            other => return Err(FrontMatterError::InvalidKey(other)),
        };
        // `key:` with no value is the same as leaving the key out
        if let Some(value) = yaml_value(value)? {
            table.insert(key, value);
        }
    }
    Ok(table)
}

fn yaml_value(value: serde_yaml::Value) -> Result<Option<FieldValue>, FrontMatterError> {
    use serde_yaml::Value;

    let value = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => FieldValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => FieldValue::Text(s),
        Value::Sequence(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                if let Some(item) = yaml_value(item)? {
                    list.push(item);
                }
            }
            FieldValue::List(list)
        }
        Value::Mapping(mapping) => FieldValue::Table(yaml_mapping(mapping)?),
        Value::Tagged(tagged) => return yaml_value(tagged.value),
    };
    Ok(Some(value))
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    use serde_yaml::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn parse_toml(block: &str) -> Result<FrontMatter, FrontMatterError> {
    let table: toml::Table = toml::from_str(block)?;
    Ok(toml_table(table))
}

fn toml_table(table: toml::Table) -> BTreeMap<String, FieldValue> {
    table.into_iter().map(|(k, v)| (k, toml_value(v))).collect()
}

fn toml_value(value: toml::Value) -> FieldValue {
    use toml::Value;

    match value {
        Value::String(s) => FieldValue::Text(s),
        Value::Integer(i) => FieldValue::Integer(i),
        Value::Float(f) => FieldValue::Float(f),
        Value::Boolean(b) => FieldValue::Bool(b),
        Value::Datetime(dt) => match TomlDate::try_from(&dt) {
            Ok(TomlDate(date)) => FieldValue::Date(date),
            Err(_) => FieldValue::Text(dt.to_string()),
        },
        Value::Array(items) => FieldValue::List(items.into_iter().map(toml_value).collect()),
        Value::Table(table) => FieldValue::Table(toml_table(table)),
    }
}

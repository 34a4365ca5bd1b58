//! Configuration and table layout loading.

use crate::table::{TableHeader, TableRow};
use crate::urls::ExtractOptions;
use notemark_types::Justify;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Table layout has no columns")]
    EmptyLayout,

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Row {0} is not a JSON object")]
    InvalidRow(usize),
}

/// Settings read from `notemark.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extract: ExtractOptions,

    /// Base URL used by `prepend-base` when none is given on the command line
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Like [`Config::from_file`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::from_file(path)
    }
}

/// Declarative column description for [`TableLayout`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,

    /// Display text; defaults to `name`
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub justify: Justify,

    #[serde(default)]
    pub disable_escape: bool,
}

/// Table columns as written in a YAML layout file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    pub columns: Vec<ColumnSpec>,
}

impl TableLayout {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let layout: TableLayout = serde_yaml::from_str(contents)?;
        layout.validate()?;
        Ok(layout)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.columns.is_empty() {
            return Err(ConfigError::EmptyLayout);
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(())
    }

    pub fn headers(&self) -> Vec<TableHeader> {
        self.columns
            .iter()
            .map(|column| {
                let label = column.label.as_deref().unwrap_or(&column.name);
                let header = TableHeader::new(column.name.as_str(), label).justify(column.justify);
                if column.disable_escape {
                    header.disable_escape()
                } else {
                    header
                }
            })
            .collect()
    }
}

/// Read table rows from a JSON array of objects
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<TableRow>, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_rows(&contents)
}

/// Parse a JSON array of objects into rows. Strings are taken verbatim,
/// other scalars are stringified, `null` leaves the cell unset and nested
/// values are kept as compact JSON.
pub fn parse_rows(json: &str) -> Result<Vec<TableRow>, ConfigError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let serde_json::Value::Object(map) = value else {
                return Err(ConfigError::InvalidRow(index));
            };
            let mut row = TableRow::new();
            for (key, value) in map {
                match value {
                    serde_json::Value::Null => {}
                    serde_json::Value::String(s) => row.set(key, s),
                    other => row.set(key, other.to_string()),
                }
            }
            Ok(row)
        })
        .collect()
}

//! Static catalog inputs
//!
//! Raw library records and the category→domain table, parsed from YAML.
//! Both ship bundled with the crate and can be replaced by files named in
//! the configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, StacksiftError};

pub(crate) const BUNDLED_LIBRARIES: &str = include_str!("../../data/libraries.yaml");
pub(crate) const BUNDLED_DOMAINS: &str = include_str!("../../data/domains.yaml");

/// A library record as supplied by the data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub name: String,
    pub category: String,
    /// Free text; may embed `[MARKER]` tags
    pub description: String,
    pub link: String,

    /// Explicit tags, merged with markers found in the description
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RawEntry {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: description.into(),
            link: link.into(),
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalogFile {
    entries: Vec<RawEntry>,
}

/// Parse a libraries YAML document
pub fn parse_raw_entries(content: &str) -> Result<Vec<RawEntry>> {
    let file: RawCatalogFile = serde_yaml_ng::from_str(content)
        .map_err(|e| StacksiftError::yaml("library catalog", e))?;
    Ok(file.entries)
}

/// The bundled library records
pub fn bundled_raw_entries() -> Result<Vec<RawEntry>> {
    parse_raw_entries(BUNDLED_LIBRARIES)
}

/// Category → domain lookup with a mandatory fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMap {
    /// Domain for categories with no entry
    pub default: String,

    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

impl DomainMap {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            categories: BTreeMap::new(),
        }
    }

    pub fn with(mut self, category: impl Into<String>, domain: impl Into<String>) -> Self {
        self.categories.insert(category.into(), domain.into());
        self
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).map_err(|e| StacksiftError::yaml("domain map", e))
    }

    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_DOMAINS)
    }

    /// Domain for a category (exact match), or the default
    pub fn domain_for(&self, category: &str) -> &str {
        self.categories
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}

impl Default for DomainMap {
    fn default() -> Self {
        Self::new("Utilities")
    }
}

/// Read a data file, or fall back to bundled content when no path is set
pub(crate) fn read_or_bundled(path: Option<&Path>, bundled: &'static str) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| StacksiftError::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(bundled.to_string()),
    }
}

//! Curated collections
//!
//! A collection is a named list of library names maintained outside the
//! catalog. Names are joined against catalog entries case-insensitively;
//! names with no matching entry are skipped.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::raw::read_or_bundled;
use super::CatalogEntry;
use crate::error::{Result, StacksiftError};

pub(crate) const BUNDLED_COLLECTIONS: &str = include_str!("../../data/collections.yaml");

/// A curated, named list of library names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Icon hint for front ends
    #[serde(default)]
    pub icon: Option<String>,

    /// Color hint for front ends
    #[serde(default)]
    pub color: Option<String>,

    /// Library names, matched case-insensitively
    pub libraries: Vec<String>,
}

impl Collection {
    pub fn new(name: impl Into<String>, libraries: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            icon: None,
            color: None,
            libraries: libraries.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Whether the collection lists this entry's name
    pub fn includes(&self, entry: &CatalogEntry) -> bool {
        self.libraries
            .iter()
            .any(|name| name.to_lowercase() == entry.name.to_lowercase())
    }

    /// Library names that have no catalog entry
    pub fn unresolved<'a>(&'a self, entries: &[CatalogEntry]) -> Vec<&'a str> {
        self.libraries
            .iter()
            .filter(|name| {
                !entries
                    .iter()
                    .any(|e| e.name.to_lowercase() == name.to_lowercase())
            })
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionSet {
    pub collections: Vec<Collection>,
}

impl CollectionSet {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).map_err(|e| StacksiftError::yaml("collections", e))
    }

    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_COLLECTIONS)
    }

    /// Load from a file, or the bundled set when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_yaml(&read_or_bundled(path, BUNDLED_COLLECTIONS)?)
    }

    /// Look up a collection by name, exact match first then ignoring case
    pub fn get(&self, name: &str) -> Result<&Collection> {
        self.collections
            .iter()
            .find(|c| c.name == name)
            .or_else(|| {
                self.collections
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| StacksiftError::UnknownCollection(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

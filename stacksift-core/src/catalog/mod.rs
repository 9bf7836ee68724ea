//! stacksift catalog - normalized library entries
//!
//! # Overview
//!
//! ```text
//! libraries.yaml  ──┐
//!                   ├──► Normalizer ──► Catalog (built once, read-only)
//! domains.yaml    ──┘                      │
//!                                          ├──► FacetIndex (rebuilt on demand)
//! collections.yaml ──► CollectionSet ──────┘
//! ```
//!
//! The catalog is built once at startup and never mutated afterwards.

mod collections;
mod facets;
mod normalizer;
mod raw;

pub use collections::{Collection, CollectionSet};
pub use facets::FacetIndex;
pub use normalizer::{
    import_symbol, install_identifier, popularity_tier, CatalogEntry, JitterSource, Normalizer,
    Tag, JITTER_SPAN, KNOWN_TAGS, MAX_POPULARITY,
};
pub use raw::{bundled_raw_entries, parse_raw_entries, DomainMap, RawEntry};

pub(crate) use raw::read_or_bundled;

use std::path::Path;

use crate::error::{Result, StacksiftError};

/// The normalized, ordered library catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Normalize raw records against a domain map
    pub fn from_raw(raw: Vec<RawEntry>, domains: &DomainMap, jitter: JitterSource) -> Self {
        Self {
            entries: Normalizer::new(domains, jitter).normalize(raw),
        }
    }

    /// Build the catalog from the bundled data files
    pub fn bundled(jitter: JitterSource) -> Result<Self> {
        Self::load(None, None, jitter)
    }

    /// Build the catalog from data files, using bundled data for any path not given
    pub fn load(
        libraries: Option<&Path>,
        domains: Option<&Path>,
        jitter: JitterSource,
    ) -> Result<Self> {
        let raw = parse_raw_entries(&raw::read_or_bundled(libraries, raw::BUNDLED_LIBRARIES)?)?;
        let domains = DomainMap::from_yaml(&raw::read_or_bundled(domains, raw::BUNDLED_DOMAINS)?)?;
        Ok(Self::from_raw(raw, &domains, jitter))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by positional id
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entry by id, or by name ignoring case
    pub fn find(&self, id_or_name: &str) -> Result<&CatalogEntry> {
        self.get(id_or_name)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.name.to_lowercase() == id_or_name.to_lowercase())
            })
            .ok_or_else(|| StacksiftError::UnknownEntry(id_or_name.to_string()))
    }

    /// Facet counts over the full catalog
    pub fn facets(&self) -> FacetIndex {
        FacetIndex::build(&self.entries)
    }
}

#[cfg(test)]
mod tests;

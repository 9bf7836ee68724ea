//! Category facet index
//!
//! Built fresh from an entry collection whenever a caller needs it; the
//! index is a snapshot and is never patched in place.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use super::CatalogEntry;

/// Distinct categories with their entry counts, ordered by category name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetIndex {
    counts: BTreeMap<String, usize>,
}

impl FacetIndex {
    /// Count categories across the given entries
    ///
    /// Pass the full catalog to let users discover categories outside
    /// their current result set.
    #[instrument(name = "stacksift.facets.build", skip_all, fields(category_count = tracing::field::Empty))]
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a CatalogEntry>) -> Self {
        let mut counts = BTreeMap::new();
        for entry in entries {
            *counts.entry(entry.category.clone()).or_insert(0) += 1;
        }
        tracing::Span::current().record("category_count", counts.len());
        debug!(categories = counts.len(), "Facet index built");
        Self { counts }
    }

    /// Categories in lexicographic order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// `(category, count)` pairs in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(c, n)| (c.as_str(), *n))
    }

    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.counts.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Categories whose name contains `term`, case-insensitively
    pub fn matching(&self, term: &str) -> Vec<(&str, usize)> {
        let term = term.to_lowercase();
        self.iter()
            .filter(|(category, _)| category.to_lowercase().contains(&term))
            .collect()
    }
}

//! Search evaluation
//!
//! `evaluate` runs in two steps:
//!
//! 1. Base selection, exactly one branch depending on the active
//!    [`Selection`]: tag filter, collection lookup, fuzzy text search, or
//!    the whole catalog.
//! 2. Facet refinement: when categories are selected, keep only entries in
//!    one of them, preserving the base selection's order.
//!
//! ## Observability
//!
//! Evaluation runs inside a `stacksift.search.evaluate` span recording the
//! selection mode and the result count.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument};

use super::fuzzy::{FuzzyScorer, SearchOptions};
use super::query::{QueryState, Selection};
use crate::catalog::{Catalog, CatalogEntry, Collection, Tag};

/// Which base selection branch produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    All,
    Text,
    Collection,
    Tag,
}

impl SelectionMode {
    fn of(state: &QueryState) -> Self {
        match state.selection() {
            Selection::Text(text) if !text.trim().is_empty() => Self::Text,
            Selection::All | Selection::Text(_) => Self::All,
            Selection::Collection(_) => Self::Collection,
            Selection::Tag(_) => Self::Tag,
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Text => "text",
            Self::Collection => "collection",
            Self::Tag => "tag",
        };
        f.write_str(name)
    }
}

/// Ordered entries produced by one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults<'a> {
    mode: SelectionMode,
    entries: Vec<&'a CatalogEntry>,
}

impl<'a> SearchResults<'a> {
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn entries(&self) -> &[&'a CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CatalogEntry> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The empty-state signal for front ends
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn into_entries(self) -> Vec<&'a CatalogEntry> {
        self.entries
    }
}

/// Evaluates query states against a catalog
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    options: SearchOptions,
}

impl SearchEngine {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Evaluate a query state; deterministic for a fixed catalog and state
    #[instrument(
        name = "stacksift.search.evaluate",
        skip_all,
        fields(mode = tracing::field::Empty, result_count = tracing::field::Empty)
    )]
    pub fn evaluate<'a>(&self, catalog: &'a Catalog, state: &QueryState) -> SearchResults<'a> {
        let mode = SelectionMode::of(state);
        tracing::Span::current().record("mode", tracing::field::display(mode));

        let mut entries = match state.selection() {
            Selection::Tag(tag) => Self::by_tag(catalog, tag),
            Selection::Collection(collection) => Self::by_collection(catalog, collection),
            Selection::Text(text) if !text.trim().is_empty() => self.fuzzy(catalog, text),
            Selection::All | Selection::Text(_) => catalog.iter().collect(),
        };
        debug!(%mode, base_count = entries.len(), "Base selection complete");

        let categories = state.categories();
        if !categories.is_empty() {
            entries.retain(|entry| categories.contains(&entry.category));
            debug!(
                facets = categories.len(),
                count = entries.len(),
                "Facet refinement applied"
            );
        }

        tracing::Span::current().record("result_count", entries.len());
        info!(%mode, count = entries.len(), "Search evaluated");

        SearchResults { mode, entries }
    }

    /// Entries carrying a tag, in catalog order
    pub fn by_tag<'a>(catalog: &'a Catalog, tag: &Tag) -> Vec<&'a CatalogEntry> {
        catalog.iter().filter(|e| e.has_tag(tag)).collect()
    }

    /// Entries a collection names, in catalog order
    pub fn by_collection<'a>(catalog: &'a Catalog, collection: &Collection) -> Vec<&'a CatalogEntry> {
        let unresolved = collection.unresolved(catalog.entries());
        if !unresolved.is_empty() {
            debug!(collection = %collection.name, ?unresolved, "Skipping names with no catalog entry");
        }
        catalog.iter().filter(|e| collection.includes(e)).collect()
    }

    /// Fuzzy matches, best first; ties keep catalog order
    pub fn fuzzy<'a>(&self, catalog: &'a Catalog, query: &str) -> Vec<&'a CatalogEntry> {
        let Some(mut scorer) = FuzzyScorer::new(query, &self.options) else {
            debug!(query, "Query below minimum match length");
            return Vec::new();
        };

        let mut scored: Vec<(f64, usize, &CatalogEntry)> = catalog
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                scorer
                    .score(entry)
                    .map(|relevance| (relevance, position, entry))
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, _, entry)| entry).collect()
    }
}

//! Requirements export
//!
//! Produces a flat text artifact: one package identifier per selected
//! entry, sorted, newline-separated.

use tracing::{info, instrument};

use crate::catalog::{Catalog, Tag};
use crate::search::{QueryState, SearchEngine};

/// Which entries an export covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    /// The entire catalog
    All,
    /// Entries carrying a tag
    Tagged(Tag),
    /// Whatever the query state currently shows
    Visible(QueryState),
}

impl ExportScope {
    /// Suggested file name for the artifact
    pub fn file_name(&self) -> String {
        match self {
            Self::Tagged(tag) => format!("{tag}-requirements.txt"),
            Self::All | Self::Visible(_) => "requirements.txt".to_string(),
        }
    }
}

/// Render the requirements artifact for a scope
#[instrument(name = "stacksift.export", skip_all, fields(scope = ?scope))]
pub fn requirements(catalog: &Catalog, engine: &SearchEngine, scope: &ExportScope) -> String {
    let mut packages: Vec<String> = match scope {
        ExportScope::All => catalog.iter().map(|e| e.package_id()).collect(),
        ExportScope::Tagged(tag) => SearchEngine::by_tag(catalog, tag)
            .into_iter()
            .map(|e| e.package_id())
            .collect(),
        ExportScope::Visible(state) => engine
            .evaluate(catalog, state)
            .iter()
            .map(|e| e.package_id())
            .collect(),
    };
    packages.sort();

    info!(count = packages.len(), "Generated requirements");
    packages.join("\n")
}

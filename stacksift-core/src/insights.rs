//! Aggregates over result sets
//!
//! Inputs for the domain distribution chart, the popularity chart and the
//! side-by-side comparison tool.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::Result;

/// Number of entries per domain
pub fn domain_distribution<'a>(
    entries: impl IntoIterator<Item = &'a CatalogEntry>,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.domain.clone()).or_insert(0) += 1;
    }
    counts
}

/// The `n` most popular entries; equal scores keep their input order
pub fn top_by_popularity<'a>(
    entries: impl IntoIterator<Item = &'a CatalogEntry>,
    n: usize,
) -> Vec<&'a CatalogEntry> {
    let mut ranked: Vec<_> = entries.into_iter().collect();
    ranked.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    ranked.truncate(n);
    ranked
}

/// One attribute compared across two entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub metric: &'static str,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison<'a> {
    pub left: &'a CatalogEntry,
    pub right: &'a CatalogEntry,
}

impl<'a> Comparison<'a> {
    pub fn rows(&self) -> Vec<ComparisonRow> {
        vec![
            ComparisonRow {
                metric: "DOMAIN",
                left: self.left.domain.clone(),
                right: self.right.domain.clone(),
            },
            ComparisonRow {
                metric: "CATEGORY",
                left: self.left.category.clone(),
                right: self.right.category.clone(),
            },
            ComparisonRow {
                metric: "IMPACT",
                left: self.left.popularity.to_string(),
                right: self.right.popularity.to_string(),
            },
        ]
    }
}

/// Look up two entries by id or name and pair them for comparison
pub fn compare<'a>(catalog: &'a Catalog, left: &str, right: &str) -> Result<Comparison<'a>> {
    Ok(Comparison {
        left: catalog.find(left)?,
        right: catalog.find(right)?,
    })
}

//! Catalog browsing commands
//!
//! Search, detail, facet, collection, comparison, chart and export views
//! over the normalized catalog.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::Path;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use stacksift_core::catalog::{CatalogEntry, CollectionSet, Tag};
use stacksift_core::export::{self, ExportScope};
use stacksift_core::insights;
use stacksift_core::search::{QueryAction, QueryState};

use crate::App;

/// Query flags shared by search, stats and export
#[derive(Args, Debug, Default, Clone)]
pub struct QueryArgs {
    /// Fuzzy search text (matches name, description, domain, category)
    #[clap(conflicts_with_all = ["collection", "tag"])]
    pub query: Option<String>,

    /// Restrict to a category (repeatable)
    #[clap(long = "category", short = 'c')]
    pub categories: Vec<String>,

    /// Show a curated collection
    #[clap(long, conflicts_with = "tag")]
    pub collection: Option<String>,

    /// Show libraries carrying a tag (e.g. journalism)
    #[clap(long)]
    pub tag: Option<String>,
}

impl QueryArgs {
    /// Replay the flags through the reducer
    pub fn to_state(&self, collections: &CollectionSet) -> Result<QueryState> {
        let mut actions = Vec::new();

        if let Some(name) = &self.collection {
            let collection = collections
                .get(name)
                .with_context(|| format!("Collection '{name}' not found"))?;
            actions.push(QueryAction::SelectCollection(collection.clone()));
        } else if let Some(tag) = &self.tag {
            actions.push(QueryAction::SelectTag(Tag::new(tag)));
        } else if let Some(query) = &self.query {
            actions.push(QueryAction::SetSearch(query.clone()));
        }

        actions.extend(
            self.categories
                .iter()
                .map(|category| QueryAction::ToggleCategory(category.clone())),
        );

        Ok(QueryState::new().apply_all(actions))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportScopeArg {
    All,
    Tagged,
    Visible,
}

impl ExportScopeArg {
    /// Reject query flags the scope would otherwise ignore
    fn check_flags(self, query: &QueryArgs) -> Result<()> {
        let mut ignored = Vec::new();
        if self != Self::Visible {
            if query.query.is_some() {
                ignored.push("QUERY");
            }
            if !query.categories.is_empty() {
                ignored.push("--category");
            }
            if query.collection.is_some() {
                ignored.push("--collection");
            }
        }
        if self == Self::All && query.tag.is_some() {
            ignored.push("--tag");
        }

        if !ignored.is_empty() {
            anyhow::bail!(
                "{} cannot be used with --scope {}; use --scope visible to filter the export",
                ignored.join(", "),
                self.name()
            );
        }
        Ok(())
    }

    fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Tagged => "tagged",
            Self::Visible => "visible",
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn rounded_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

/// Table row for search results
#[derive(Tabled)]
struct SearchResultRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Impact")]
    popularity: u8,
    #[tabled(rename = "Description")]
    description: String,
}

fn entry_json(entry: &CatalogEntry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id,
        "name": entry.name,
        "category": entry.category,
        "domain": entry.domain,
        "popularity": entry.popularity,
        "tags": entry.tags,
        "description": entry.description,
        "link": entry.link,
    })
}

/// Print a result list, or the empty-state message
pub(crate) fn print_results(entries: &[&CatalogEntry], json_output: bool) -> Result<()> {
    if json_output {
        let json_results: Vec<serde_json::Value> =
            entries.iter().map(|entry| entry_json(entry)).collect();
        println!("{}", serde_json::to_string_pretty(&json_results)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No libraries found.");
        return Ok(());
    }

    let noun = if entries.len() == 1 { "library" } else { "libraries" };
    println!("Found {} {noun}:\n", entries.len());

    let table_rows: Vec<SearchResultRow> = entries
        .iter()
        .map(|entry| SearchResultRow {
            id: entry.id.clone(),
            name: entry.name.clone(),
            domain: entry.domain.clone(),
            category: entry.category.clone(),
            popularity: entry.popularity,
            description: truncate(&entry.description, 50),
        })
        .collect();

    println!("{}", rounded_table(&table_rows));
    Ok(())
}

pub fn execute_search(
    app: &App,
    query: &QueryArgs,
    limit: Option<usize>,
    json_output: bool,
) -> Result<()> {
    let state = query.to_state(&app.collections)?;
    let results = app.engine.evaluate(&app.catalog, &state);

    let mut entries = results.into_entries();
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    print_results(&entries, json_output)
}

pub fn execute_show(app: &App, name: &str, json_output: bool) -> Result<()> {
    let entry = app
        .catalog
        .find(name)
        .with_context(|| format!("Library '{name}' not found in catalog"))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(entry)?);
        return Ok(());
    }

    println!("Library:    {}", entry.name);
    println!("Id:         {}", entry.id);
    println!("Domain:     {}", entry.domain);
    println!("Category:   {}", entry.category);
    println!("Impact:     {}", entry.popularity);
    if !entry.tags.is_empty() {
        let tags: Vec<&str> = entry.tags.iter().map(Tag::as_str).collect();
        println!("Tags:       {}", tags.join(", "));
    }
    if !entry.link.is_empty() {
        println!("Link:       {}", entry.link);
    }

    println!();
    println!("Description:");
    println!("  {}", entry.description);

    println!();
    println!("Installation:");
    println!("  {}", entry.install_command);

    println!();
    println!("Usage:");
    for line in entry.code_snippet.lines() {
        println!("  {line}");
    }

    Ok(())
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Libraries")]
    count: usize,
}

pub fn execute_categories(app: &App, filter: Option<&str>, json_output: bool) -> Result<()> {
    let facets = app.catalog.facets();
    let rows: Vec<(&str, usize)> = match filter {
        Some(term) => facets.matching(term),
        None => facets.iter().collect(),
    };

    if json_output {
        let map: serde_json::Map<String, serde_json::Value> = rows
            .iter()
            .map(|(category, count)| (category.to_string(), serde_json::json!(count)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    let table_rows: Vec<CategoryRow> = rows
        .into_iter()
        .map(|(category, count)| CategoryRow {
            category: category.to_string(),
            count,
        })
        .collect();
    println!("{}", rounded_table(&table_rows));
    Ok(())
}

#[derive(Tabled)]
struct CollectionRow {
    #[tabled(rename = "Collection")]
    name: String,
    #[tabled(rename = "Libraries")]
    libraries: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn execute_collections(app: &App, json_output: bool) -> Result<()> {
    let summaries: Vec<(&str, usize, usize, &str)> = app
        .collections
        .iter()
        .map(|collection| {
            let resolved = app.catalog.iter().filter(|e| collection.includes(e)).count();
            (
                collection.name.as_str(),
                resolved,
                collection.libraries.len(),
                collection.description.as_str(),
            )
        })
        .collect();

    if json_output {
        let json_results: Vec<serde_json::Value> = summaries
            .iter()
            .map(|(name, resolved, declared, description)| {
                serde_json::json!({
                    "name": name,
                    "description": description,
                    "resolved": resolved,
                    "declared": declared,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_results)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No collections defined.");
        return Ok(());
    }

    let table_rows: Vec<CollectionRow> = summaries
        .into_iter()
        .map(|(name, resolved, declared, description)| CollectionRow {
            name: name.to_string(),
            libraries: format!("{resolved}/{declared}"),
            description: truncate(description, 60),
        })
        .collect();
    println!("{}", rounded_table(&table_rows));
    Ok(())
}

#[derive(Tabled)]
struct ComparisonTableRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Left")]
    left: String,
    #[tabled(rename = "Right")]
    right: String,
}

pub fn execute_compare(app: &App, left: &str, right: &str) -> Result<()> {
    let comparison = insights::compare(&app.catalog, left, right)
        .context("Both libraries must exist to compare them")?;

    let mut table_rows = vec![ComparisonTableRow {
        metric: "NAME",
        left: comparison.left.name.clone(),
        right: comparison.right.name.clone(),
    }];
    table_rows.extend(comparison.rows().into_iter().map(|row| ComparisonTableRow {
        metric: row.metric,
        left: row.left,
        right: row.right,
    }));

    println!("{}", rounded_table(&table_rows));
    Ok(())
}

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Libraries")]
    count: usize,
}

#[derive(Tabled)]
struct PopularityRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Impact")]
    popularity: u8,
}

pub fn execute_stats(app: &App, query: &QueryArgs, top: usize, json_output: bool) -> Result<()> {
    let state = query.to_state(&app.collections)?;
    let results = app.engine.evaluate(&app.catalog, &state);

    let distribution = insights::domain_distribution(results.iter());
    let ranked = insights::top_by_popularity(results.iter(), top);

    if json_output {
        let output = serde_json::json!({
            "result_count": results.len(),
            "domains": distribution,
            "top": ranked
                .iter()
                .map(|e| serde_json::json!({ "name": e.name, "popularity": e.popularity }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No libraries found.");
        return Ok(());
    }

    println!("Domain distribution ({} libraries):\n", results.len());
    let domain_rows: Vec<DomainRow> = distribution
        .into_iter()
        .map(|(domain, count)| DomainRow { domain, count })
        .collect();
    println!("{}", rounded_table(&domain_rows));

    println!("\nMost popular:\n");
    let popularity_rows: Vec<PopularityRow> = ranked
        .iter()
        .enumerate()
        .map(|(i, entry)| PopularityRow {
            rank: i + 1,
            name: entry.name.clone(),
            popularity: entry.popularity,
        })
        .collect();
    println!("{}", rounded_table(&popularity_rows));
    Ok(())
}

pub fn execute_export(
    app: &App,
    scope: ExportScopeArg,
    query: &QueryArgs,
    output: Option<&Path>,
) -> Result<()> {
    scope.check_flags(query)?;

    let scope = match scope {
        ExportScopeArg::All => ExportScope::All,
        ExportScopeArg::Tagged => ExportScope::Tagged(
            query
                .tag
                .as_deref()
                .map(Tag::new)
                .unwrap_or_else(Tag::journalism),
        ),
        ExportScopeArg::Visible => ExportScope::Visible(query.to_state(&app.collections)?),
    };

    let text = export::requirements(&app.catalog, &app.engine, &scope);

    match output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(scope.file_name())
            } else {
                path.to_path_buf()
            };
            std::fs::write(&path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let count = if text.is_empty() { 0 } else { text.lines().count() };
            println!("Wrote {count} package(s) to {}", path.display());
        }
        None => println!("{text}"),
    }

    Ok(())
}

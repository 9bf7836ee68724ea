//! End-to-end properties of query evaluation over the bundled catalog

mod common;

use common::{bundled_catalog, bundled_collections, init_test_logging, names};
use pretty_assertions::assert_eq;
use stacksift_core::catalog::{
    import_symbol, install_identifier, Catalog, DomainMap, JitterSource, RawEntry, Tag,
};
use stacksift_core::search::{QueryAction, QueryState, SearchEngine, SelectionMode, Session};

fn search(text: &str) -> QueryState {
    QueryState::new().reduce(QueryAction::SetSearch(text.to_string()))
}

#[test]
fn test_evaluate_is_idempotent() {
    init_test_logging();
    let catalog = bundled_catalog();
    let engine = SearchEngine::default();
    let state = search("pandas");

    let first = engine.evaluate(&catalog, &state);
    let second = engine.evaluate(&catalog, &state);

    assert_eq!(first.names(), second.names());
    assert_eq!(first.mode(), SelectionMode::Text);
    assert_eq!(first.names().first(), Some(&"Pandas"));
}

#[test]
fn test_selection_modes_are_mutually_exclusive() {
    let catalog = bundled_catalog();
    let collections = bundled_collections();
    let engine = SearchEngine::default();
    let toolkit = collections.get("DATA JOURNALISM TOOLKIT").unwrap().clone();

    let state = search("scraping")
        .reduce(QueryAction::SelectCollection(toolkit))
        .reduce(QueryAction::SelectTag(Tag::journalism()));

    assert_eq!(state.search(), "");
    assert!(state.collection().is_none());
    let results = engine.evaluate(&catalog, &state);
    assert_eq!(results.mode(), SelectionMode::Tag);
    assert_eq!(results.len(), 9);
}

#[test]
fn test_facets_refine_fuzzy_results_in_order() {
    let catalog = bundled_catalog();
    let engine = SearchEngine::default();

    let base = engine.evaluate(&catalog, &search("async"));
    let refined = engine.evaluate(
        &catalog,
        &search("async").reduce(QueryAction::ToggleCategory("Web Frameworks".into())),
    );

    let expected: Vec<&str> = base
        .iter()
        .filter(|e| e.category == "Web Frameworks")
        .map(|e| e.name.as_str())
        .collect();
    assert!(!expected.is_empty());
    assert_eq!(refined.names(), expected);
}

#[test]
fn test_derived_fields_for_multiword_name() {
    assert_eq!(
        install_identifier("Hugging Face Transformers"),
        "hugging-face-transformers"
    );
    assert_eq!(import_symbol("Hugging Face Transformers"), "hugging");

    let catalog = bundled_catalog();
    let entry = catalog.find("Hugging Face Transformers").unwrap();
    assert_eq!(entry.install_command, "pip install hugging-face-transformers");
    assert!(entry.code_snippet.starts_with("import hugging\n"));
}

#[test]
fn test_unmapped_category_takes_default_domain() {
    let catalog = Catalog::from_raw(
        vec![RawEntry::new("Typer", "Command Line", "Build CLIs.", "")],
        &DomainMap::bundled().unwrap(),
        JitterSource::Disabled,
    );
    assert_eq!(catalog.entries()[0].domain, "Utilities");
}

#[test]
fn test_empty_result_is_distinct_from_not_run() {
    let catalog = bundled_catalog();
    let mut session = Session::new(&catalog, SearchEngine::default());
    assert_eq!(session.result_count(), None);

    let results = session.dispatch(QueryAction::SetSearch("zzz_no_such_token".into()));
    assert!(results.is_empty());
    assert_eq!(session.result_count(), Some(0));
}

#[test]
fn test_collection_names_match_ignoring_case() {
    let catalog = bundled_catalog();
    let engine = SearchEngine::default();
    let collection = bundled_collections()
        .get("beginner-friendly starters")
        .unwrap()
        .clone();

    let results = engine.evaluate(
        &catalog,
        &QueryState::new().reduce(QueryAction::SelectCollection(collection)),
    );
    assert!(names(results.iter()).contains(&"Pandas"));
    assert!(names(results.iter()).contains(&"Requests"));
}

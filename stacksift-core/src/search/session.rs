//! The event-handling layer
//!
//! A [`Session`] owns the single current [`QueryState`], threads every
//! action through the reducer, re-evaluates the search and hands the
//! result to listeners registered by the front end.

use tracing::debug;

use super::engine::{SearchEngine, SearchResults};
use super::query::{QueryAction, QueryState};
use crate::catalog::Catalog;

type Listener<'a> = Box<dyn FnMut(&QueryState, &SearchResults<'a>) + 'a>;

pub struct Session<'a> {
    catalog: &'a Catalog,
    engine: SearchEngine,
    state: QueryState,
    last: Option<SearchResults<'a>>,
    listeners: Vec<Listener<'a>>,
}

impl<'a> Session<'a> {
    pub fn new(catalog: &'a Catalog, engine: SearchEngine) -> Self {
        Self {
            catalog,
            engine,
            state: QueryState::default(),
            last: None,
            listeners: Vec::new(),
        }
    }

    /// Register a callback run after every evaluation
    pub fn subscribe(&mut self, listener: impl FnMut(&QueryState, &SearchResults<'a>) + 'a) {
        self.listeners.push(Box::new(listener));
    }

    /// Evaluate the current state without changing it
    pub fn refresh(&mut self) -> &SearchResults<'a> {
        let results = self.engine.evaluate(self.catalog, &self.state);
        for listener in &mut self.listeners {
            listener(&self.state, &results);
        }
        self.last.insert(results)
    }

    /// Apply an action and re-evaluate
    pub fn dispatch(&mut self, action: QueryAction) -> &SearchResults<'a> {
        debug!(?action, "Dispatching query action");
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
        self.refresh()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    pub fn last_results(&self) -> Option<&SearchResults<'a>> {
        self.last.as_ref()
    }

    /// Result count of the last evaluation; `None` until one has run
    pub fn result_count(&self) -> Option<usize> {
        self.last.as_ref().map(SearchResults::len)
    }
}

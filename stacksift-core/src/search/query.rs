//! Query state and its reducer
//!
//! The state is an immutable value; every user interaction is a
//! [`QueryAction`] folded in with [`QueryState::reduce`]. Exactly one base
//! selection mode (text, collection or tag) is active at a time, which the
//! [`Selection`] enum enforces by construction. Category facets layer on
//! top of whichever mode is active.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::catalog::{Collection, Tag};

/// The authoritative base selection mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Selection {
    /// Nothing selected: the whole catalog
    #[default]
    All,
    /// Free-text fuzzy search; blank text behaves like `All`
    Text(String),
    /// Entries named by a curated collection
    Collection(Collection),
    /// Entries carrying a tag
    Tag(Tag),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAction {
    SetSearch(String),
    ToggleCategory(String),
    ClearCategories,
    SelectCollection(Collection),
    SelectTag(Tag),
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryState {
    selection: Selection,
    categories: BTreeSet<String>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action, producing the next state
    pub fn reduce(self, action: QueryAction) -> Self {
        let Self {
            selection,
            mut categories,
        } = self;

        match action {
            QueryAction::SetSearch(text) => Self {
                selection: Selection::Text(text),
                categories,
            },
            QueryAction::ToggleCategory(category) => {
                if !categories.remove(&category) {
                    categories.insert(category);
                }
                Self {
                    selection,
                    categories,
                }
            }
            QueryAction::ClearCategories => Self {
                selection,
                categories: BTreeSet::new(),
            },
            QueryAction::SelectCollection(collection) => Self {
                selection: Selection::Collection(collection),
                categories: BTreeSet::new(),
            },
            QueryAction::SelectTag(tag) => Self {
                selection: Selection::Tag(tag),
                categories: BTreeSet::new(),
            },
            QueryAction::Reset => Self::default(),
        }
    }

    /// Fold several actions, left to right
    pub fn apply_all(self, actions: impl IntoIterator<Item = QueryAction>) -> Self {
        actions.into_iter().fold(self, Self::reduce)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// The free-text search, empty unless text mode is active
    pub fn search(&self) -> &str {
        match &self.selection {
            Selection::Text(text) => text,
            _ => "",
        }
    }

    pub fn collection(&self) -> Option<&Collection> {
        match &self.selection {
            Selection::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn tag_filter(&self) -> Option<&Tag> {
        match &self.selection {
            Selection::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

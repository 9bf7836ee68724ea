//! Catalog search - query state, fuzzy scoring and evaluation

mod engine;
mod fuzzy;
mod query;
mod session;

pub use engine::{SearchEngine, SearchResults, SelectionMode};
pub use fuzzy::{FieldWeights, FuzzyScorer, SearchOptions};
pub use query::{QueryAction, QueryState, Selection};
pub use session::Session;

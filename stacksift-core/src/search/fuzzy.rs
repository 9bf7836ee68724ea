//! Weighted multi-field fuzzy scoring
//!
//! Each whitespace-separated query word becomes a nucleo fuzzy atom. A
//! word's similarity to a field is its score against the field divided by
//! the score it earns against itself, so `1.0` is a clean word-boundary
//! match and scattered subsequences fall towards `0.0`.
//!
//! Query words are alternatives. An entry is kept when any word reaches
//! `1 - threshold` on some field, and its relevance is the sum, over the
//! words that do, of their weight-averaged similarity across all fields.
//! Adding words to a query never drops a match.

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;

/// Relative importance of each searchable field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub name: f64,
    pub description: f64,
    pub domain: f64,
    pub category: f64,
}

impl FieldWeights {
    pub fn total(&self) -> f64 {
        self.name + self.description + self.domain + self.category
    }

    fn all(&self) -> [f64; 4] {
        [self.name, self.description, self.domain, self.category]
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 0.4,
            description: 0.3,
            domain: 0.2,
            category: 0.1,
        }
    }
}

/// Tuning for the fuzzy branch of the search engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// `0.0` demands perfect matches, `1.0` accepts anything that matches at all
    pub threshold: f64,

    /// Queries and query words shorter than this never match
    pub min_match_chars: usize,

    pub weights: FieldWeights,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            min_match_chars: 2,
            weights: FieldWeights::default(),
        }
    }
}

/// Scores catalog entries against one query
pub struct FuzzyScorer {
    atoms: Vec<(Atom, u16)>,
    matcher: Matcher,
    buf: Vec<char>,
    min_similarity: f64,
    weights: FieldWeights,
}

impl FuzzyScorer {
    /// Prepare a scorer, or `None` when the query is too short to match
    pub fn new(query: &str, options: &SearchOptions) -> Option<Self> {
        let query = query.trim();
        if query.chars().count() < options.min_match_chars {
            return None;
        }

        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();

        let atoms: Vec<(Atom, u16)> = query
            .split_whitespace()
            .filter(|word| word.chars().count() >= options.min_match_chars)
            .filter_map(|word| {
                let atom = Atom::new(
                    word,
                    CaseMatching::Ignore,
                    Normalization::Smart,
                    AtomKind::Fuzzy,
                    false,
                );
                let lower = word.to_lowercase();
                let ideal = atom.score(Utf32Str::new(&lower, &mut buf), &mut matcher)?;
                (ideal > 0).then_some((atom, ideal))
            })
            .collect();

        if atoms.is_empty() {
            return None;
        }

        Some(Self {
            atoms,
            matcher,
            buf,
            min_similarity: 1.0 - options.threshold,
            weights: options.weights,
        })
    }

    /// Similarity of one query word to one field, in `0.0..=1.0`
    fn word_similarity(&mut self, word: usize, haystack: &str) -> f64 {
        let (atom, ideal) = &self.atoms[word];
        let haystack = Utf32Str::new(haystack, &mut self.buf);
        atom.score(haystack, &mut self.matcher)
            .map_or(0.0, |score| (f64::from(score) / f64::from(*ideal)).min(1.0))
    }

    /// Similarity of the best-matching query word to one field
    pub fn similarity(&mut self, haystack: &str) -> f64 {
        (0..self.atoms.len())
            .map(|word| self.word_similarity(word, haystack))
            .fold(0.0, f64::max)
    }

    /// Relevance of an entry, or `None` when no query word clears the threshold
    ///
    /// Words are alternatives: each one that matches some field well enough
    /// adds its weighted similarity, so entries hit by more words rank higher.
    pub fn score(&mut self, entry: &CatalogEntry) -> Option<f64> {
        let fields = [
            entry.name.as_str(),
            entry.description.as_str(),
            entry.domain.as_str(),
            entry.category.as_str(),
        ];
        let weights = self.weights.all();
        let total_weight = self.weights.total();

        let mut relevance = None;
        for word in 0..self.atoms.len() {
            let similarities = fields.map(|field| self.word_similarity(word, field));
            let best = similarities.iter().copied().fold(0.0, f64::max);
            if best <= 0.0 || best < self.min_similarity {
                continue;
            }

            let contribution = if total_weight > 0.0 {
                similarities
                    .iter()
                    .zip(weights.iter())
                    .map(|(s, w)| s * w)
                    .sum::<f64>()
                    / total_weight
            } else {
                best
            };
            *relevance.get_or_insert(0.0) += contribution;
        }
        relevance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, DomainMap, JitterSource, RawEntry};

    #[test]
    fn test_short_queries_are_rejected() {
        let options = SearchOptions::default();
        assert!(FuzzyScorer::new("", &options).is_none());
        assert!(FuzzyScorer::new("  a ", &options).is_none());
        assert!(FuzzyScorer::new("a b", &options).is_none());
        assert!(FuzzyScorer::new("ab", &options).is_some());
    }

    #[test]
    fn test_exact_word_is_full_similarity() {
        let mut scorer = FuzzyScorer::new("pandas", &SearchOptions::default()).unwrap();
        assert!((scorer.similarity("Pandas") - 1.0).abs() < f64::EPSILON);
        assert!(scorer.similarity("Pandas") > scorer.similarity("Geopandas"));
        assert_eq!(scorer.similarity("Flask"), 0.0);
    }

    fn entry(name: &str, category: &str, description: &str) -> CatalogEntry {
        Catalog::from_raw(
            vec![RawEntry::new(name, category, description, "")],
            &DomainMap::default(),
            JitterSource::Disabled,
        )
        .entries()[0]
        .clone()
    }

    #[test]
    fn test_similarity_takes_best_word() {
        let mut scorer = FuzzyScorer::new("zzzz web", &SearchOptions::default()).unwrap();
        assert!((scorer.similarity("web framework") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_extra_words_never_drop_matches() {
        let options = SearchOptions::default();
        let flask = entry("Flask", "Web Frameworks", "A micro web framework.");

        let single = FuzzyScorer::new("web", &options).unwrap().score(&flask);
        let noisy = FuzzyScorer::new("web zzzz qqqq", &options)
            .unwrap()
            .score(&flask);
        assert!(single.is_some());
        assert_eq!(single, noisy);
    }

    #[test]
    fn test_words_matching_different_fields_combine() {
        let options = SearchOptions::default();
        let pandas = entry("Pandas", "Data Analysis", "Data structures for csv files.");

        let one = FuzzyScorer::new("csv", &options)
            .unwrap()
            .score(&pandas)
            .unwrap();
        let both = FuzzyScorer::new("analysis csv", &options)
            .unwrap()
            .score(&pandas)
            .unwrap();
        assert!(both > one);
    }

    #[test]
    fn test_no_matching_word_is_rejected() {
        let options = SearchOptions::default();
        let flask = entry("Flask", "Web Frameworks", "A micro web framework.");
        assert_eq!(
            FuzzyScorer::new("zzzz qqqq", &options).unwrap().score(&flask),
            None
        );
    }

    #[test]
    fn test_default_options() {
        let options = SearchOptions::default();
        assert_eq!(options.threshold, 0.4);
        assert_eq!(options.min_match_chars, 2);
        assert!((options.weights.total() - 1.0).abs() < 1e-9);
    }
}

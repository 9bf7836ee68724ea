//! Catalog normalization
//!
//! Turns raw library records into enriched [`CatalogEntry`] values: a
//! positional id, the mapped domain, a popularity score, structured tags
//! and the derived install command and import snippet.
//!
//! ## Observability
//!
//! `normalize` runs inside a `stacksift.normalize` span that records the
//! number of entries produced.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, instrument};

use super::raw::{DomainMap, RawEntry};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]").unwrap());
static TAG_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([A-Z][A-Z0-9_]*)\]\s*").unwrap());

/// Exclusive upper bound of the popularity jitter
pub const JITTER_SPAN: u8 = 10;

/// Tags recognised as inline description markers
pub const KNOWN_TAGS: &[&str] = &["journalism"];

/// Highest possible popularity score
pub const MAX_POPULARITY: u8 = 100;

/// A structured label attached to catalog entries
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Tags are case-insensitive and stored lowercase
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    /// Libraries useful for data journalism
    pub fn journalism() -> Self {
        Self::new("journalism")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the tag is one of [`KNOWN_TAGS`]
    pub fn is_known(&self) -> bool {
        KNOWN_TAGS.contains(&self.0.as_str())
    }

    /// The inline marker form used in raw descriptions, e.g. `[JOURNALISM]`
    pub fn marker(&self) -> String {
        format!("[{}]", self.0.to_uppercase())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Positional id, `lib_<index>`
    pub id: String,
    pub name: String,
    pub category: String,
    /// Description with tag markers removed
    pub description: String,
    pub link: String,
    pub domain: String,
    /// Score in `0..=100`
    pub popularity: u8,
    pub tags: BTreeSet<Tag>,
    pub install_command: String,
    pub code_snippet: String,
}

impl CatalogEntry {
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Package identifier used by the requirements export
    ///
    /// Like the install identifier, but dots become hyphens too.
    pub fn package_id(&self) -> String {
        install_identifier(&self.name).replace('.', "-")
    }
}

/// Where the popularity jitter comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JitterSource {
    /// A fresh random draw per load; scores differ between loads
    #[default]
    Entropy,
    /// A pure function of the seed and the entry name
    Seeded(u64),
    /// No jitter; popularity equals its base tier
    Disabled,
}

enum JitterRng {
    Entropy(StdRng),
    Seeded(u64),
    Disabled,
}

impl JitterRng {
    fn new(source: JitterSource) -> Self {
        match source {
            JitterSource::Entropy => Self::Entropy(StdRng::from_entropy()),
            JitterSource::Seeded(seed) => Self::Seeded(seed),
            JitterSource::Disabled => Self::Disabled,
        }
    }

    fn next(&mut self, name: &str) -> u8 {
        match self {
            Self::Entropy(rng) => rng.gen_range(0..JITTER_SPAN),
            Self::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(*seed ^ identity_seed(name));
                rng.gen_range(0..JITTER_SPAN)
            }
            Self::Disabled => 0,
        }
    }
}

fn identity_seed(name: &str) -> u64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Base popularity tier from marker phrases in a description
///
/// Checked in priority order; the first hit wins.
pub fn popularity_tier(description: &str) -> u8 {
    let text = description.to_lowercase();
    if text.contains("very widely used") || text.contains("extremely popular") {
        95
    } else if text.contains("widely used") {
        85
    } else if text.contains("niche") {
        45
    } else {
        60
    }
}

/// Lowercased name with whitespace runs hyphenated and parentheses dropped
pub fn install_identifier(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lower, "-");
    PARENS.replace_all(&hyphenated, "").into_owned()
}

/// First whitespace- or dot-delimited token of the lowercased name
pub fn import_symbol(name: &str) -> String {
    let lower = name.to_lowercase();
    let token = lower
        .split(|c: char| c.is_whitespace() || c == '.')
        .find(|t| !PARENS.replace_all(t, "").is_empty())
        .unwrap_or("");
    PARENS.replace_all(token, "").into_owned()
}

/// Split known `[MARKER]` tags out of a description
///
/// Bracketed words that are not known tags stay in the text.
fn extract_tags(description: &str) -> (String, BTreeSet<Tag>) {
    let mut tags = BTreeSet::new();
    let cleaned = TAG_MARKER.replace_all(description, |caps: &Captures<'_>| {
        let tag = Tag::new(&caps[1]);
        if tag.is_known() {
            tags.insert(tag);
            String::new()
        } else {
            caps[0].to_string()
        }
    });
    (cleaned.trim().to_string(), tags)
}

/// Converts raw records into catalog entries
pub struct Normalizer<'a> {
    domains: &'a DomainMap,
    jitter: JitterSource,
}

impl<'a> Normalizer<'a> {
    pub fn new(domains: &'a DomainMap, jitter: JitterSource) -> Self {
        Self { domains, jitter }
    }

    /// Normalize raw records, preserving input order
    #[instrument(name = "stacksift.normalize", skip_all, fields(entry_count = raw.len()))]
    pub fn normalize(&self, raw: Vec<RawEntry>) -> Vec<CatalogEntry> {
        let mut rng = JitterRng::new(self.jitter);

        let entries: Vec<CatalogEntry> = raw
            .into_iter()
            .enumerate()
            .map(|(index, raw)| self.normalize_one(index, raw, &mut rng))
            .collect();

        info!(count = entries.len(), jitter = ?self.jitter, "Catalog normalized");
        entries
    }

    fn normalize_one(&self, index: usize, raw: RawEntry, rng: &mut JitterRng) -> CatalogEntry {
        let name = raw.name.trim().to_string();
        let domain = self.domains.domain_for(&raw.category).to_string();
        if !self.domains.categories.contains_key(&raw.category) {
            debug!(category = %raw.category, domain = %domain, "Category unmapped, using default domain");
        }

        let base = popularity_tier(&raw.description);
        let popularity = base.saturating_add(rng.next(&name)).min(MAX_POPULARITY);

        let (description, mut tags) = extract_tags(&raw.description);
        tags.extend(raw.tags.iter().map(Tag::new));

        let symbol = import_symbol(&name);

        CatalogEntry {
            id: format!("lib_{index}"),
            install_command: format!("pip install {}", install_identifier(&name)),
            code_snippet: format!("import {symbol}\n# Initializing {name}..."),
            name,
            category: raw.category,
            description,
            link: raw.link,
            domain,
            popularity,
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains() -> DomainMap {
        DomainMap::new("Utilities")
            .with("Web Frameworks", "Web")
            .with("Natural Language Processing", "Data Science")
    }

    fn normalize(raw: Vec<RawEntry>) -> Vec<CatalogEntry> {
        let map = domains();
        Normalizer::new(&map, JitterSource::Disabled).normalize(raw)
    }

    #[test]
    fn test_multi_word_name_derivations() {
        let entries = normalize(vec![RawEntry::new(
            "Hugging Face Transformers",
            "Natural Language Processing",
            "State-of-the-art NLP.",
            "https://huggingface.co/",
        )]);
        let entry = &entries[0];
        assert_eq!(install_identifier(&entry.name), "hugging-face-transformers");
        assert_eq!(entry.install_command, "pip install hugging-face-transformers");
        assert_eq!(import_symbol(&entry.name), "hugging");
        assert!(entry.code_snippet.starts_with("import hugging\n"));
        assert_eq!(entry.domain, "Data Science");
    }

    #[test]
    fn test_parentheses_and_dots() {
        assert_eq!(install_identifier("Blender (bpy)"), "blender-bpy");
        assert_eq!(import_symbol("Blender (bpy)"), "blender");
        assert_eq!(install_identifier("socket.io  client"), "socket.io-client");
        assert_eq!(import_symbol("socket.io client"), "socket");
        assert_eq!(import_symbol("(bpy) Blender"), "bpy");
    }

    #[test]
    fn test_package_id_replaces_dots() {
        let entries = normalize(vec![RawEntry::new(
            "Socket.IO (Python)",
            "Web Frameworks",
            "",
            "",
        )]);
        assert_eq!(entries[0].package_id(), "socket-io-python");
    }

    #[test]
    fn test_unmapped_category_uses_default_domain() {
        let entries = normalize(vec![RawEntry::new("Thing", "Unknown Shelf", "", "")]);
        assert_eq!(entries[0].domain, "Utilities");
    }

    #[test]
    fn test_ids_follow_position() {
        let entries = normalize(vec![
            RawEntry::new("A", "Web Frameworks", "", ""),
            RawEntry::new("A", "Web Frameworks", "", ""),
            RawEntry::new("B", "Web Frameworks", "", ""),
        ]);
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["lib_0", "lib_1", "lib_2"]);
    }

    #[test]
    fn test_popularity_tiers_in_priority_order() {
        assert_eq!(popularity_tier("Very widely used toolkit"), 95);
        assert_eq!(popularity_tier("Extremely popular."), 95);
        assert_eq!(popularity_tier("Widely used, but niche"), 85);
        assert_eq!(popularity_tier("A niche helper"), 45);
        assert_eq!(popularity_tier("A helper"), 60);
    }

    #[test]
    fn test_popularity_jitter_bounds() {
        let map = domains();
        let raw: Vec<_> = (0..50)
            .map(|i| RawEntry::new(format!("lib{i}"), "Web Frameworks", "Very widely used", ""))
            .collect();
        let entries = Normalizer::new(&map, JitterSource::Entropy).normalize(raw);
        assert!(entries
            .iter()
            .all(|e| (95..=MAX_POPULARITY).contains(&e.popularity)));
    }

    #[test]
    fn test_seeded_jitter_depends_on_identity_not_position() {
        let map = domains();
        let forward = vec![
            RawEntry::new("Flask", "Web Frameworks", "", ""),
            RawEntry::new("Django", "Web Frameworks", "", ""),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = Normalizer::new(&map, JitterSource::Seeded(7)).normalize(forward);
        let b = Normalizer::new(&map, JitterSource::Seeded(7)).normalize(reversed);

        assert_eq!(a[0].popularity, b[1].popularity);
        assert_eq!(a[1].popularity, b[0].popularity);
        assert!((60..70).contains(&a[0].popularity));
    }

    #[test]
    fn test_markers_become_tags() {
        let mut raw = RawEntry::new(
            "Pandas",
            "Data Analysis",
            "[JOURNALISM] Extremely popular. Data structures.",
            "",
        );
        raw.tags.push("Beginner".to_string());
        let entries = normalize(vec![raw]);
        let entry = &entries[0];

        assert_eq!(entry.description, "Extremely popular. Data structures.");
        assert!(entry.has_tag(&Tag::journalism()));
        assert!(entry.has_tag(&Tag::new("beginner")));
        assert_eq!(entry.popularity, 95);
    }

    #[test]
    fn test_unknown_brackets_stay_in_description() {
        let entries = normalize(vec![RawEntry::new(
            "Thing",
            "Web Frameworks",
            "Supports [API] and [JOURNALISM] use",
            "",
        )]);
        let entry = &entries[0];

        assert_eq!(entry.description, "Supports [API] and use");
        assert_eq!(
            entry.tags.iter().map(Tag::as_str).collect::<Vec<_>>(),
            vec!["journalism"]
        );
    }

    #[test]
    fn test_tag_marker_form() {
        assert_eq!(Tag::journalism().marker(), "[JOURNALISM]");
        assert_eq!(Tag::new(" Journalism "), Tag::journalism());
    }
}

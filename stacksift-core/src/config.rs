//! stacksift configuration
//!
//! Read from `config.yaml` in the platform config directory, or from an
//! explicit path. A missing file means defaults: bundled data, default
//! search tuning and per-load popularity jitter.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::{Catalog, CollectionSet, JitterSource};
use crate::error::{Result, StacksiftError};
use crate::guided::GuidedTemplates;
use crate::search::{SearchEngine, SearchOptions};

/// Default config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Overrides for the bundled data files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub libraries: Option<PathBuf>,
    pub domains: Option<PathBuf>,
    pub collections: Option<PathBuf>,
    pub guided: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopularityConfig {
    /// Makes the jitter reproducible; absent means a fresh draw per load
    pub jitter_seed: Option<u64>,
}

impl PopularityConfig {
    pub fn jitter_source(&self) -> JitterSource {
        match self.jitter_seed {
            Some(seed) => JitterSource::Seeded(seed),
            None => JitterSource::Entropy,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StacksiftConfig {
    pub data: DataPaths,
    pub search: SearchOptions,
    pub popularity: PopularityConfig,
}

impl StacksiftConfig {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_config_path()?)
    }

    /// Load from a specific path; a missing file yields defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| StacksiftError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(content)
            .map_err(|e| StacksiftError::yaml("configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if !(0.0..=1.0).contains(&search.threshold) {
            return Err(StacksiftError::InvalidConfig(format!(
                "search.threshold must be between 0 and 1, got {}",
                search.threshold
            )));
        }

        let weights = [
            ("name", search.weights.name),
            ("description", search.weights.description),
            ("domain", search.weights.domain),
            ("category", search.weights.category),
        ];
        if let Some((field, weight)) = weights.iter().find(|(_, w)| !(*w >= 0.0)) {
            return Err(StacksiftError::InvalidConfig(format!(
                "search.weights.{field} must be non-negative, got {weight}"
            )));
        }
        if search.weights.total() <= 0.0 {
            return Err(StacksiftError::InvalidConfig(
                "search.weights must not all be zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    fn config_dir() -> Result<PathBuf> {
        directories::ProjectDirs::from("io", "stacksift", "stacksift")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("stacksift")))
            .ok_or_else(|| {
                StacksiftError::InvalidConfig("Could not determine config directory".to_string())
            })
    }

    /// Build the catalog this configuration describes
    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::load(
            self.data.libraries.as_deref(),
            self.data.domains.as_deref(),
            self.popularity.jitter_source(),
        )
    }

    pub fn collections(&self) -> Result<CollectionSet> {
        CollectionSet::load(self.data.collections.as_deref())
    }

    pub fn guided_templates(&self) -> Result<GuidedTemplates> {
        GuidedTemplates::load(self.data.guided.as_deref())
    }

    pub fn engine(&self) -> SearchEngine {
        SearchEngine::new(self.search.clone())
    }
}

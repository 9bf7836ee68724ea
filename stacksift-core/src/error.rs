use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StacksiftError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {what}: {source}")]
    Yaml {
        what: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("No catalog entry matches '{0}'")]
    UnknownEntry(String),

    #[error("Unknown {step} option '{value}'")]
    UnknownGuidedOption { step: &'static str, value: String },
}

impl StacksiftError {
    pub(crate) fn yaml(what: impl Into<String>, source: serde_yaml_ng::Error) -> Self {
        Self::Yaml {
            what: what.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StacksiftError>;

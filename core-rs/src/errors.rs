//! Error types for Switchboard Core

use thiserror::Error;

use crate::model::EntityKind;

#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("Duplicate id: {kind} \"{id}\" already exists")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("Not found: {kind} \"{id}\"")]
    NotFound { kind: EntityKind, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid snapshot format: {0}")]
    InvalidFormat(String),

    #[error("Import stopped at {failed}: {reason} (already committed: {committed:?})")]
    PartialImport {
        failed: EntityKind,
        committed: Vec<EntityKind>,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Remote call failed: {0}")]
    Remote(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SwitchError {
    fn from(err: reqwest::Error) -> Self {
        SwitchError::Remote(err.to_string())
    }
}

impl SwitchError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        SwitchError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn duplicate(kind: EntityKind, id: &str) -> Self {
        SwitchError::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SwitchError>;

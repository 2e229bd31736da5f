//! Error types for session building.
//!
//! Authoring defects stop the run: they would otherwise reach participants
//! as broken pages.

use std::path::PathBuf;

use page_model::ModelError;
use thiserror::Error;

/// Main error type for building session content.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("scenario '{label}': answer '{answer}' is not one of its choices {choices:?}")]
    AnswerNotInChoices {
        label: String,
        answer: String,
        choices: Vec<String>,
    },

    #[error("media asset '{name}' not found under {}", root.display())]
    MissingMedia { name: String, root: PathBuf },

    #[error("unknown missing-letter policy '{0}', expected 1, 2 or all")]
    UnknownMissingLetters(String),

    #[error("malformed reminder locator '{0}'")]
    InvalidLocator(String),

    #[error("malformed reminder key '{0}'")]
    InvalidReminderKey(String),

    #[error("{source_name} row {row}: {reason}")]
    MalformedRow {
        source_name: String,
        row: usize,
        reason: String,
    },

    #[error("no resource content available for domain '{0}'")]
    EmptyResourcePools(String),

    #[error("output entry '{0}' must be a .json document or a page sequence directory")]
    InvalidOutputEntry(String),

    #[error("failed to read {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}

impl BuildError {
    /// Wrap an I/O error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;

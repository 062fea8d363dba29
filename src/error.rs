use std::{io, path::PathBuf};
use thiserror::Error;

/// Failures surfaced by the entry collection and the list file readers.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("entry already exists: {name}")]
    DuplicateName { name: String },
    #[error("entry not found: {name}")]
    NotFound { name: String },
    #[error("entry name is empty")]
    InvalidName,
    #[error("malformed list: {message}")]
    Parse { message: String },
    #[error("serialize list: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ListError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type ListResult<T> = std::result::Result<T, ListError>;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No .txt or .md files found in: {}", .0.display())]
    NoDocumentsFound(PathBuf),

    #[error("Embedding backend error: {0}")]
    EmbeddingBackend(String),

    #[error("Dimension mismatch at position {position}: expected {expected}, found {found}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        position: usize,
    },

    #[error("Index corruption: position {position} is outside metadata of length {metadata_len}")]
    IndexCorruption { position: usize, metadata_len: usize },

    #[error("Load error: {0}")]
    Load(String),

    #[error("Generation backend error: {0}")]
    GenerationBackend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Startup errors abort pipeline construction; everything else only
    /// aborts the query that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InvalidConfiguration(_)
                | Error::NoDocumentsFound(_)
                | Error::DimensionMismatch { .. }
                | Error::Load(_)
                | Error::Io(_)
                | Error::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

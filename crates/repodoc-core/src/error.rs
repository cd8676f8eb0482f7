use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lexical index failure: {0}")]
    Lexical(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Embedding failed: {0:#}")]
    Embedding(#[source] anyhow::Error),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index was built with embedder '{index}' but queried with '{query}'")]
    EmbedderMismatch { index: String, query: String },

    #[error("Unknown filter field: {0}")]
    UnknownFilterField(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self { Self::Io { path: path.into(), source } }

    pub fn lexical(err: impl std::error::Error + Send + Sync + 'static) -> Self { Self::Lexical(Box::new(err)) }
}

pub type Result<T> = std::result::Result<T, Error>;

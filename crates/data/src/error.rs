use thiserror::Error;

/// Failures talking to a subgraph.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("indexer returned HTTP {0}")]
    Status(u16),
    #[error("indexer reported errors: {0}")]
    Query(String),
    #[error("unexpected response shape: {0}")]
    Shape(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

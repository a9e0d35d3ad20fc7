use thiserror::Error;

/// Failures surfaced by the document pipeline. None of them are retried
/// internally; the caller decides whether to resubmit.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("Ingestion failed: {0}")]
    Ingestion(String),
    #[error("Embedding failed: {0}")]
    Embedding(String),
    #[error("Generation failed: {0}")]
    Generation(String),
    #[error("Query is empty")]
    EmptyQuery,
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

pub type RagResult<T> = Result<T, RagError>;

impl RagError {
    pub fn ingestion(err: impl std::fmt::Display) -> Self {
        Self::Ingestion(err.to_string())
    }

    pub fn embedding(err: impl std::fmt::Display) -> Self {
        Self::Embedding(err.to_string())
    }

    pub fn generation(err: impl std::fmt::Display) -> Self {
        Self::Generation(err.to_string())
    }
}

//! Capabilities the pipeline consumes from the outside world. Swapping a
//! local model for a remote one means providing another implementation.

use crate::errors::RagResult;
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Fixed-dimension vector for `text`.
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>>;
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Raw completion for `prompt`.
    async fn complete(&self, prompt: &str) -> RagResult<String>;
}

pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> RagResult<String>;
}

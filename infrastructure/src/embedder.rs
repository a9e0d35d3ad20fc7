use domain::errors::{RagError, RagResult};
use domain::ports::EmbeddingModel;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

const BATCH_SIZE: usize = 32;
const MAX_IN_FLIGHT: usize = 8;

/// Turns text into vectors through the configured embedding model.
#[derive(Clone)]
pub struct Embedder {
    model: Arc<dyn EmbeddingModel>,
}

impl Embedder {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }

    pub async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        non_empty(self.model.embed(text).await?)
    }

    /// One vector per input, in input order. Stops at the first failure.
    pub async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(BATCH_SIZE) {
            tracing::debug!("Generating embeddings for {} chunks", batch.len());
            let batch_vectors = self.embed_in_flight(batch).await?;
            vectors.extend(batch_vectors);
        }
        Ok(vectors)
    }

    async fn embed_in_flight(&self, batch: &[String]) -> RagResult<Vec<Vec<f32>>> {
        let model = &self.model;
        stream::iter(
            batch
                .iter()
                .map(|text| async move { non_empty(model.embed(text).await?) }),
        )
        .buffered(MAX_IN_FLIGHT)
        .try_collect()
        .await
    }
}

fn non_empty(vector: Vec<f32>) -> RagResult<Vec<f32>> {
    if vector.is_empty() {
        return Err(RagError::Embedding(
            "model returned an empty embedding".to_string(),
        ));
    }
    Ok(vector)
}

use domain::errors::RagResult;
use domain::models::ScoredChunk;
use infrastructure::embedder::Embedder;
use infrastructure::vector_index::VectorIndex;

#[derive(Clone)]
pub struct Retriever {
    embedder: Embedder,
}

impl Retriever {
    pub fn new(embedder: Embedder) -> Self {
        Self { embedder }
    }

    /// Top `k` chunks for `query`. An empty index short-circuits without
    /// calling the embedding model.
    pub async fn retrieve(
        &self,
        index: &VectorIndex,
        query: &str,
        k: usize,
    ) -> RagResult<Vec<ScoredChunk>> {
        if index.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let query_vector = self.embedder.embed(query).await?;
        let hits = index.search(&query_vector, k)?;
        tracing::debug!("Retrieved {} of {} chunks", hits.len(), index.len());
        Ok(hits)
    }
}

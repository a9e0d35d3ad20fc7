use crate::embedder::Embedder;
use crate::search::SearchEngine;
use domain::errors::{RagError, RagResult};
use domain::models::{Chunk, IndexEntry, ScoredChunk};

/// In-memory nearest-neighbour store for one document session.
#[derive(Debug, Default, Clone)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimension: Option<usize>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed and append `chunks`. Nothing is stored unless every chunk
    /// embeds with the index's dimension.
    pub async fn add(
        &mut self,
        embedder: &Embedder,
        document_id: &str,
        chunks: Vec<Chunk>,
    ) -> RagResult<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(RagError::Embedding(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimension = self.dimension.unwrap_or(vectors[0].len());
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(RagError::Embedding(format!(
                "inconsistent embedding dimension: expected {}, got {}",
                dimension,
                bad.len()
            )));
        }

        let added = chunks.len();
        self.entries
            .extend(chunks.into_iter().zip(vectors).map(|(chunk, vector)| IndexEntry {
                id: format!("{}:{}", document_id, chunk.start),
                chunk,
                vector,
            }));
        self.dimension = Some(dimension);
        tracing::debug!("Indexed {} chunks ({} total)", added, self.entries.len());
        Ok(added)
    }

    pub fn search(&self, query_vector: &[f32], k: usize) -> RagResult<Vec<ScoredChunk>> {
        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };
        if query_vector.len() != dimension {
            return Err(RagError::Embedding(format!(
                "query embedding has dimension {}, index expects {}",
                query_vector.len(),
                dimension
            )));
        }
        Ok(SearchEngine::find_relevant_chunks(query_vector, &self.entries, k))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dimension = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }
}

use domain::models::{IndexEntry, ScoredChunk};
use rayon::prelude::*;

pub struct SearchEngine;

impl SearchEngine {
    /// Cosine similarity; a zero-norm side scores 0.0 instead of NaN.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot_product / (norm_a * norm_b)
    }

    /// Top `top_k` entries by descending similarity. Equal scores keep
    /// insertion order.
    pub fn find_relevant_chunks(
        query_embedding: &[f32],
        entries: &[IndexEntry],
        top_k: usize,
    ) -> Vec<ScoredChunk> {
        if top_k == 0 {
            return Vec::new();
        }
        // Indexed parallel collect keeps entry order.
        let mut similarities: Vec<(f32, usize)> = entries
            .par_iter()
            .enumerate()
            .map(|(i, entry)| (Self::cosine_similarity(query_embedding, &entry.vector), i))
            .collect();

        similarities.sort_by(|a, b| b.0.total_cmp(&a.0));
        similarities
            .into_iter()
            .take(top_k)
            .map(|(score, i)| ScoredChunk {
                chunk: entries[i].chunk.clone(),
                score,
            })
            .collect()
    }
}

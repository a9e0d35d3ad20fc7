use domain::errors::{RagError, RagResult};
use domain::models::Chunk;

/// Fixed-size character window splitter with overlap.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> RagResult<Self> {
        if chunk_size == 0 {
            return Err(RagError::InvalidSettings(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(RagError::InvalidSettings(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Windows of at most `chunk_size` characters; each one after the first
    /// starts `overlap` characters before the previous window's end.
    pub fn chunk(&self, text: &str, source: &str) -> Vec<Chunk> {
        // Byte offset of every char, plus the end of the text.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;
        if char_count == 0 {
            return Vec::new();
        }

        let stride = self.chunk_size - self.overlap;
        let mut chunks = Vec::with_capacity(char_count / stride + 1);
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(char_count);
            chunks.push(Chunk {
                text: text[boundaries[start]..boundaries[end]].to_string(),
                start,
                index: chunks.len(),
                source: source.to_string(),
            });
            if end == char_count {
                break;
            }
            start += stride;
        }
        chunks
    }
}

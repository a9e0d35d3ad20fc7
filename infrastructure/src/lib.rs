pub mod chunker;
pub mod config;
pub mod document_store;
pub mod embedder;
pub mod ollama_client;
pub mod pdf_extractor;
pub mod search;
pub mod vector_index;

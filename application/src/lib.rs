pub mod answer_generator;
pub mod prompt_builder;
pub mod rag_service;
pub mod retriever;
pub mod session;

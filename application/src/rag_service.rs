use crate::answer_generator::AnswerGenerator;
use crate::prompt_builder::PromptBuilder;
use crate::retriever::Retriever;
use crate::session::{Session, SessionState};
use domain::errors::{RagError, RagResult};
use domain::models::{Answer, Document};
use domain::ports::{EmbeddingModel, LanguageModel, TextExtractor};
use domain::session::DocumentInfo;
use infrastructure::chunker::Chunker;
use infrastructure::config::Config;
use infrastructure::document_store::DocumentStore;
use infrastructure::embedder::Embedder;
use infrastructure::ollama_client::OllamaClient;
use infrastructure::pdf_extractor::PdfExtractor;
use shared::telemetry::Telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub filename: String,
    pub document_id: String,
    pub stored_at: PathBuf,
    pub characters: usize,
    pub chunk_count: usize,
    pub elapsed: Duration,
}

/// Ingest and question-answer pipeline. Holds capabilities and settings;
/// all per-user state lives in the `Session` passed to each call.
pub struct RagService {
    extractor: Box<dyn TextExtractor>,
    store: DocumentStore,
    chunker: Chunker,
    embedder: Embedder,
    retriever: Retriever,
    prompt_builder: PromptBuilder,
    generator: AnswerGenerator,
    top_k: usize,
}

impl RagService {
    pub fn new(
        config: &Config,
        extractor: Box<dyn TextExtractor>,
        embedding_model: Arc<dyn EmbeddingModel>,
        language_model: Arc<dyn LanguageModel>,
    ) -> RagResult<Self> {
        let embedder = Embedder::new(embedding_model);
        Ok(Self {
            extractor,
            store: DocumentStore::new(&config.document_store_path)?,
            chunker: Chunker::new(config.chunk_size, config.chunk_overlap)?,
            retriever: Retriever::new(embedder.clone()),
            embedder,
            prompt_builder: PromptBuilder::new(),
            generator: AnswerGenerator::new(language_model),
            top_k: config.top_k,
        })
    }

    /// PDF extraction with Ollama serving both models.
    pub fn from_config(config: &Config) -> RagResult<Self> {
        let client = Arc::new(OllamaClient::from_config(config)?);
        Self::new(config, Box::new(PdfExtractor::new()), client.clone(), client)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Replace whatever the session held with `document`. On any failure the
    /// session is left empty.
    pub async fn ingest(
        &self,
        session: &mut Session,
        document: Document,
    ) -> RagResult<IngestReport> {
        let telemetry = Telemetry::new();
        self.reset(session);
        tracing::info!("Processing document {}", document.filename);

        if document.bytes.is_empty() {
            return Err(RagError::Ingestion(format!(
                "{} is empty",
                document.filename
            )));
        }
        let document_id = document.content_id();
        let stored_at = self.store.save(&document)?;
        let filename = document.filename;
        drop(document.bytes);

        let text = {
            let bytes = self.store.open(&stored_at)?;
            self.extractor.extract_text(&bytes)?
        };
        if text.trim().is_empty() {
            return Err(RagError::Ingestion(format!(
                "no extractable text in {}",
                filename
            )));
        }

        let characters = text.chars().count();
        let chunks = self.chunker.chunk(&text, &filename);
        let chunk_count = session
            .index
            .add(&self.embedder, &document_id, chunks)
            .await?;

        session.document = Some(DocumentInfo {
            filename: filename.clone(),
            document_id: document_id.clone(),
            chunk_count,
        });
        let elapsed = telemetry.elapsed();
        tracing::info!(
            "Indexed {} ({} chars, {} chunks) in {} ms",
            filename,
            characters,
            chunk_count,
            elapsed.as_millis()
        );
        Ok(IngestReport {
            filename,
            document_id,
            stored_at,
            characters,
            chunk_count,
            elapsed,
        })
    }

    /// Answer `query` from the session's document and record the turn.
    /// History is untouched when any step fails.
    pub async fn ask(&self, session: &mut Session, query: &str) -> RagResult<Answer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RagError::EmptyQuery);
        }
        let telemetry = Telemetry::new();

        let sources = self
            .retriever
            .retrieve(&session.index, query, self.top_k)
            .await?;
        if sources.is_empty() {
            tracing::warn!("No document context for query; asking without context");
        }
        let prompt = self.prompt_builder.build(query, &sources);
        let text = self.generator.generate(&prompt).await?;

        session.history.add_exchange(query, &text);
        tracing::info!(
            "Answered with {} context chunks in {} ms",
            sources.len(),
            telemetry.elapsed_ms()
        );
        Ok(Answer {
            query: query.to_string(),
            text,
            sources,
        })
    }

    /// Forget the conversation but keep the indexed document.
    pub fn clear_history(&self, session: &mut Session) {
        session.history.clear();
        tracing::info!("Chat history cleared");
    }

    /// Back to an empty session: no document, no vectors, no history.
    pub fn reset(&self, session: &mut Session) {
        if session.state() == SessionState::Indexed || !session.messages().is_empty() {
            tracing::info!("Resetting session {}", session.id);
        }
        session.clear();
    }
}

//! Deterministic stand-ins for the model and extraction capabilities, plus
//! helpers to build a pipeline over a temporary storage directory.

use application::rag_service::RagService;
use async_trait::async_trait;
use domain::errors::{RagError, RagResult};
use domain::ports::{EmbeddingModel, LanguageModel, TextExtractor};
use infrastructure::config::Config;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Letter-frequency vectors (26 dims, lowercase ASCII), so texts sharing
/// words score as similar.
#[derive(Default)]
pub struct FakeEmbeddingModel {
    calls: AtomicUsize,
    fail_on: Option<String>,
}

impl FakeEmbeddingModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any text containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: Some(needle.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn letter_vector(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; 26];
    for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
        vector[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
    }
    vector
}

#[async_trait]
impl EmbeddingModel for FakeEmbeddingModel {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(needle) = &self.fail_on {
            if text.contains(needle.as_str()) {
                return Err(RagError::Embedding("embedding model unavailable".to_string()));
            }
        }
        Ok(letter_vector(text))
    }
}

/// Records every prompt and replies with a canned answer.
pub struct FakeLanguageModel {
    reply: Mutex<RagResult<String>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLanguageModel {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Mutex::new(Ok(reply.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Mutex::new(Err(RagError::Generation(message.to_string()))),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reply: RagResult<String>) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LanguageModel for FakeLanguageModel {
    async fn complete(&self, prompt: &str) -> RagResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &*self.reply.lock().unwrap() {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(RagError::Generation(e.to_string())),
        }
    }
}

/// Treats uploads as UTF-8 text instead of PDF.
pub struct Utf8Extractor;

impl TextExtractor for Utf8Extractor {
    fn extract_text(&self, bytes: &[u8]) -> RagResult<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| RagError::Ingestion(format!("not valid UTF-8: {}", e)))
    }
}

pub struct Harness {
    pub service: RagService,
    pub embedding_model: Arc<FakeEmbeddingModel>,
    pub language_model: Arc<FakeLanguageModel>,
    pub store_dir: TempDir,
}

pub fn test_config(store_dir: &TempDir) -> Config {
    Config {
        document_store_path: store_dir.path().join("documents").display().to_string(),
        ..Config::default()
    }
}

pub fn harness_with(
    config: impl FnOnce(Config) -> Config,
    embedding_model: FakeEmbeddingModel,
    language_model: FakeLanguageModel,
) -> Harness {
    let store_dir = tempfile::tempdir().expect("temp dir");
    let config = config(test_config(&store_dir));
    let embedding_model = Arc::new(embedding_model);
    let language_model = Arc::new(language_model);
    let service = RagService::new(
        &config,
        Box::new(Utf8Extractor),
        embedding_model.clone(),
        language_model.clone(),
    )
    .expect("service");
    Harness {
        service,
        embedding_model,
        language_model,
        store_dir,
    }
}

pub fn harness(reply: &str) -> Harness {
    harness_with(
        |c| c,
        FakeEmbeddingModel::new(),
        FakeLanguageModel::answering(reply),
    )
}

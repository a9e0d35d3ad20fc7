use crate::config::Config;
use async_trait::async_trait;
use domain::errors::{RagError, RagResult};
use domain::ports::{EmbeddingModel, LanguageModel};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
    #[serde(default)]
    done: bool,
}

/// Ollama HTTP client serving both embeddings and chat completions.
#[derive(Clone)]
pub struct OllamaClient {
    client: Arc<Client>,
    base_url: String,
    embed_model: String,
    chat_model: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        embed_model: impl Into<String>,
        chat_model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> RagResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::InvalidSettings(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            embed_model: embed_model.into(),
            chat_model: chat_model.into(),
            temperature,
        })
    }

    pub fn from_config(config: &Config) -> RagResult<Self> {
        Self::new(
            config.ollama_base_url.clone(),
            config.embed_model.clone(),
            config.chat_model.clone(),
            config.temperature,
            config.request_timeout,
        )
    }

    pub async fn generate_embedding(&self, text: &str) -> RagResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.embed_model,
            prompt: text,
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("Ollama unreachable: {}", e)))?;
        let status = response.status();
        let body = response.text().await.map_err(RagError::embedding)?;
        if !status.is_success() {
            return Err(RagError::Embedding(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }
        parse_embedding_body(&body)
    }

    pub async fn generate_response(&self, prompt: &str) -> RagResult<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RagError::Generation("Ollama request timed out".to_string())
                } else {
                    RagError::Generation(format!("Ollama unreachable: {}", e))
                }
            })?;
        let status = response.status();
        let text = response.text().await.map_err(RagError::generation)?;
        if !status.is_success() {
            return Err(RagError::Generation(format!(
                "Ollama API error ({}): {}",
                status, text
            )));
        }
        parse_chat_body(&text)
            .ok_or_else(|| RagError::Generation("malformed chat response".to_string()))
    }
}

fn parse_embedding_body(body: &str) -> RagResult<Vec<f32>> {
    let parsed: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| RagError::Embedding(format!("malformed embedding response: {}", e)))?;
    if parsed.embedding.is_empty() {
        return Err(RagError::Embedding(
            "model returned an empty embedding".to_string(),
        ));
    }
    Ok(parsed.embedding)
}

/// Accepts a single JSON object or NDJSON lines; content pieces are joined
/// until a line reports `done`. `None` when no line parses.
fn parse_chat_body(text: &str) -> Option<String> {
    let mut full_content = String::new();
    let mut parsed_any = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(chat_resp) = serde_json::from_str::<ChatResponse>(line) {
            parsed_any = true;
            full_content.push_str(&chat_resp.message.content);
            if chat_resp.done {
                break;
            }
        }
    }
    if !parsed_any {
        // Pretty-printed single object spans several lines.
        let chat_resp = serde_json::from_str::<ChatResponse>(text).ok()?;
        return Some(chat_resp.message.content);
    }
    Some(full_content)
}

#[async_trait]
impl EmbeddingModel for OllamaClient {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        self.generate_embedding(text).await
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> RagResult<String> {
        self.generate_response(prompt).await
    }
}

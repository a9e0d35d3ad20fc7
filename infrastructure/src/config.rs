use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_base_url: String,
    pub embed_model: String,
    pub chat_model: String,
    pub request_timeout: Duration,
    pub temperature: f32,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub document_store_path: String,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            chat_model: "llama3.2:3b".to_string(),
            request_timeout: Duration::from_secs(120),
            temperature: 0.6,
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
            document_store_path: "document_store".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        let defaults = Self::default();
        Self {
            ollama_base_url: env::var("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            embed_model: env::var("OLLAMA_EMBED_MODEL").unwrap_or(defaults.embed_model),
            chat_model: env::var("OLLAMA_CHAT_MODEL").unwrap_or(defaults.chat_model),
            request_timeout: Duration::from_secs(parse_var(
                "OLLAMA_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            temperature: parse_var("RAG_TEMPERATURE", defaults.temperature),
            chunk_size: parse_var("RAG_CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: parse_var("RAG_CHUNK_OVERLAP", defaults.chunk_overlap),
            top_k: parse_var("RAG_TOP_K", defaults.top_k),
            document_store_path: env::var("DOCUMENT_STORE_PATH")
                .unwrap_or(defaults.document_store_path),
            log_filter: env::var("RAG_LOG").unwrap_or(defaults.log_filter),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    parse_or(env::var(key).ok().as_deref(), default)
}

fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

use domain::errors::{RagError, RagResult};
use domain::models::ScoredChunk;

pub const QUERY_PLACEHOLDER: &str = "{query}";
pub const CONTEXT_PLACEHOLDER: &str = "{context}";
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Instruction template sent with every question.
pub const DEFAULT_TEMPLATE: &str = "You are an expert research assistant who can explain any concept from basic to advanced using first principles. \
If you are not sure of the answer, say that I don't know. \
Use only the provided context to answer the query. Be concise and factual; the answer should not be more than 4-5 lines.
Query-{query}
Context-{context}
Answer:
";

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template must contain each placeholder exactly once.
    pub fn with_template(template: impl Into<String>) -> RagResult<Self> {
        let template = template.into();
        for placeholder in [QUERY_PLACEHOLDER, CONTEXT_PLACEHOLDER] {
            let count = template.matches(placeholder).count();
            if count != 1 {
                return Err(RagError::InvalidSettings(format!(
                    "template must contain {} exactly once (found {})",
                    placeholder, count
                )));
            }
        }
        Ok(Self { template })
    }

    pub fn build(&self, query: &str, context: &[ScoredChunk]) -> String {
        let context_text = context
            .iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        // Substitute in template order so text from the query or the
        // document is never scanned for placeholders.
        let query_at = self.template.find(QUERY_PLACEHOLDER);
        let context_at = self.template.find(CONTEXT_PLACEHOLDER);
        let (Some(query_at), Some(context_at)) = (query_at, context_at) else {
            return self.template.clone();
        };
        let mut parts = [
            (query_at, QUERY_PLACEHOLDER.len(), query),
            (context_at, CONTEXT_PLACEHOLDER.len(), context_text.as_str()),
        ];
        parts.sort_by_key(|(at, _, _)| *at);

        let capacity = self.template.len() + query.len() + context_text.len();
        let mut prompt = String::with_capacity(capacity);
        let mut cursor = 0;
        for (at, len, value) in parts {
            prompt.push_str(&self.template[cursor..at]);
            prompt.push_str(value);
            cursor = at + len;
        }
        prompt.push_str(&self.template[cursor..]);
        prompt
    }
}

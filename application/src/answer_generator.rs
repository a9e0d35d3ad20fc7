use domain::errors::{RagError, RagResult};
use domain::ports::LanguageModel;
use shared::telemetry::Telemetry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AnswerGenerator {
    model: Arc<dyn LanguageModel>,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Single model call, no retry. A blank completion is a failure.
    pub async fn generate(&self, prompt: &str) -> RagResult<String> {
        let telemetry = Telemetry::new();
        let completion = self.model.complete(prompt).await?;
        let answer = completion.trim();
        if answer.is_empty() {
            return Err(RagError::Generation(
                "model returned an empty answer".to_string(),
            ));
        }
        tracing::debug!("Generated {} chars in {} ms", answer.len(), telemetry.elapsed_ms());
        Ok(answer.to_string())
    }
}

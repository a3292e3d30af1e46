use async_trait::async_trait;

use serde_json::Value;

use crate::client::LlmError;

mod advisor;
mod prompts;
mod snapshot;

pub use advisor::{Advice, Advisor};
pub use snapshot::FinancialSnapshot;

/// One turn sent to a language model
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub input: String,
    /// JSON schema the answer must follow; free text when absent
    pub response_schema: Option<Value>,
}

impl GenerationRequest {
    pub fn new(system_prompt: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            input: input.into(),
            response_schema: None,
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// A text generation backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

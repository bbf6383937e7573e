use async_trait::async_trait;
use gist_common::Result;
use serde::{Deserialize, Serialize};

/// A generated answer plus whatever metadata the provider reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

/// A chat-style text-generation endpoint: role-tagged instruction/content
/// messages in, generated text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

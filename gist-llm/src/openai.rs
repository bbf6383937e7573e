use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use gist_common::{GistError, Result};
use gist_http::{HttpClient, HttpError};
use serde::{Deserialize, Serialize};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";

/// Client for OpenAI-compatible chat-completions endpoints.
pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
}

/// One element in the `choices` array.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    pub total_tokens: Option<u32>,
}

impl OpenAiClient {
    /// Create a client against the public OpenAI endpoint.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(api_key, model, OPENAI_API_BASE)
    }

    /// Create a client against a compatible endpoint at `base_url`. Used by
    /// the stub-server tests and usable for gateways.
    pub fn with_base_url(api_key: String, model: String, base_url: &str) -> Result<Self> {
        // Joining relative paths needs the trailing slash.
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let client = HttpClient::new(&base)
            .map_err(|e| GistError::Llm(format!("HttpClient init failed: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let req = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens,
            temperature,
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "llm.generate");

        let resp: ChatCompletionResponse = self
            .client
            .post_json("chat/completions", Some(&self.api_key), &req)
            .await
            .map_err(http_to_gist)?;

        // The endpoint contract guarantees at least one choice on success;
        // anything else is a malformed envelope and therefore fatal.
        let text = resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GistError::Llm("response contained no choices".to_string()))?;

        Ok(LlmResponse {
            text,
            model: resp.model,
            tokens_used: resp.usage.and_then(|u| u.total_tokens),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn http_to_gist(e: HttpError) -> GistError {
    GistError::Llm(format!("{e}"))
}

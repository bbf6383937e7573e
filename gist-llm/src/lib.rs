//! Chat-endpoint integration for pagegist.
//!
//! Exposes the [`traits::LlmClient`] interface, the OpenAI-compatible
//! [`openai::OpenAiClient`] implementation, and the [`digest`] module that
//! turns extracted page text into the title/abstract/keywords/categories
//! digest with a single consolidated call.

pub mod digest;
pub mod openai;
pub mod traits;

/// Default model for digest requests.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

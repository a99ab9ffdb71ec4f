//! LLM integration for Graphloom
//!
//! Provides the OpenRouter client and the [`TextGenerator`] capability
//! boundary. Both the extraction step and the completeness oracle are
//! opaque prompt-in/text-out capabilities, so they share one trait with
//! a single method and can be swapped for deterministic stubs in tests.

mod client;
mod types;

pub use client::{LlmClient, LlmClientBuilder};
pub use types::{ChatRequest, ChatResponse, Choice, FinishReason, LlmResponse, Message, MessageRole, Usage};

use async_trait::async_trait;

use crate::error::Result;

/// An opaque text-generation capability: prompt in, text out
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .complete_with_fallback(vec![Message::user(prompt)])
            .await?;
        Ok(response.content)
    }
}

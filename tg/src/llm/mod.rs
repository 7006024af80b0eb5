//! LLM client module for TravelGPT
//!
//! Provider clients behind one trait, selected by configuration.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod openai;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client for the configured provider
///
/// The provider is the serde tag on [`LlmConfig`], so an unknown provider
/// never reaches this function; config deserialization rejects it first.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    match config {
        LlmConfig::Anthropic(settings) => {
            debug!(model = %settings.model, "create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(settings)?))
        }
        LlmConfig::OpenAi(settings) => {
            debug!(model = %settings.model, "create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(settings)?))
        }
    }
}

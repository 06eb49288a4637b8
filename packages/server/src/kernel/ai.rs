// AI implementation using OpenAI
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use super::{BaseAI, CompletionRequest};

/// OpenAI implementation of AI capabilities
#[derive(Clone)]
pub struct OpenAIAdapter {
    client: OpenAIClient,
}

impl OpenAIAdapter {
    pub fn new(client: OpenAIClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseAI for OpenAIAdapter {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            prompt_length = request.user.len(),
            "Calling OpenAI API"
        );

        let chat = ChatRequest::new(request.model.as_str())
            .message(Message::system(request.system))
            .message(Message::user(request.user))
            .temperature(request.temperature)
            .output_limit(request.max_tokens);

        let response = self
            .client
            .chat_completion(chat)
            .await
            .context("Failed to call OpenAI API")?;

        tracing::info!(
            response_length = response.content.len(),
            model = %request.model,
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "OpenAI API response received"
        );

        Ok(response.content)
    }
}

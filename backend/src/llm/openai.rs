//! OpenAI-compatible chat completion client.

use async_trait::async_trait;
use kairos_common::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use reqwest::Client;

use super::{CompletionError, CompletionService, Result};
use crate::config::OpenAiCredentials;

/// Fixed system prompt sent ahead of every question.
pub const SYSTEM_PROMPT: &str = "You are Kairos, a patient tutor. Explain the answer to the \
student's question clearly and step by step, using simple language and short examples.";

pub const TEMPERATURE: f64 = 0.7;

/// Client for `POST /v1/chat/completions`. One request per call, no retries.
pub struct OpenAiClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(credentials: &OpenAiCredentials) -> Self {
        Self {
            http_client: Client::new(),
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
            model: credentials.model.clone(),
        }
    }

    fn build_request(&self, question: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(question)],
            temperature: Some(TEMPERATURE),
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, question: &str) -> Result<Option<String>> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = self.build_request(question);

        tracing::debug!(model = %self.model, "Sending completion request to {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.message().map(str::to_string));
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        Ok(completion.first_content().map(str::to_string))
    }
}

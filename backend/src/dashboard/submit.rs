//! The submit handler: validate, record, ask, update, render.

use kairos_common::{NewLearnRequest, SolutionStatus};

use super::messages;
use super::{Services, SignedInUser};
use crate::llm::CompletionError;

/// Rendered outcome of one submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub text: String,
    pub status: SolutionStatus,
}

impl Solution {
    fn new(text: impl Into<String>, status: SolutionStatus) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }
}

/// Run one question through storage and the completion API.
///
/// Never fails: every error ends up as user-visible text. Storage failures
/// are logged and do not change the result.
pub async fn solve(services: &Services, user: Option<&SignedInUser>, question: &str) -> Solution {
    if question.trim().is_empty() {
        return Solution::new(messages::EMPTY_QUESTION, SolutionStatus::Prompt);
    }

    let Some(storage) = &services.storage else {
        tracing::warn!("Submit rejected: Supabase is not configured");
        return Solution::new(messages::STORAGE_NOT_CONFIGURED, SolutionStatus::ConfigError);
    };

    let row_id = match user {
        Some(signed_in) => {
            let row = NewLearnRequest::new(signed_in.user.id, question);
            match storage.store.insert(&signed_in.token, &row).await {
                Ok(id) => {
                    tracing::debug!(user_id = %signed_in.user.id, row_id = %id, "Recorded learn request");
                    Some(id)
                }
                Err(e) => {
                    tracing::warn!(user_id = %signed_in.user.id, "Failed to record learn request: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let Some(completion) = &services.completion else {
        tracing::warn!("Submit rejected: OpenAI API key is not configured");
        return Solution::new(messages::COMPLETION_NOT_CONFIGURED, SolutionStatus::ConfigError);
    };

    let answer = match completion.complete(question).await {
        Ok(Some(answer)) => answer,
        Ok(None) => {
            tracing::info!("Completion API returned no content");
            return Solution::new(messages::NO_RESPONSE, SolutionStatus::NoResponse);
        }
        Err(CompletionError::Api { status, message }) => {
            tracing::warn!(status, "Completion API error: {:?}", message);
            let text = message.unwrap_or_else(|| messages::REMOTE_ERROR.to_string());
            return Solution::new(text, SolutionStatus::RemoteError);
        }
        Err(e) => {
            tracing::error!("Completion request failed: {}", e);
            return Solution::new(messages::UNEXPECTED_ERROR, SolutionStatus::Unexpected);
        }
    };

    match (user, row_id) {
        (Some(signed_in), Some(id)) => {
            if let Err(e) = storage.store.record_response(&signed_in.token, &id, &answer).await {
                tracing::warn!(row_id = %id, "Failed to store completion response: {}", e);
            }
        }
        (Some(_), None) => {
            tracing::debug!("No learn request row to update");
        }
        _ => {}
    }

    Solution::new(answer, SolutionStatus::Answered)
}

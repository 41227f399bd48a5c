//! Dashboard wire protocol between the page and the backend.

use serde::{Deserialize, Serialize};

use crate::learn::User;

/// Body of `POST /api/solve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    #[serde(default)]
    pub question: String,
}

/// How the rendered solution text came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    /// Input was empty; the text asks for a question.
    Prompt,
    /// The completion API produced an answer.
    Answered,
    /// The completion API succeeded without any content.
    NoResponse,
    /// A required setting is missing.
    ConfigError,
    /// The completion API returned a non-success status.
    RemoteError,
    /// Transport failure or an unreadable response.
    Unexpected,
}

impl SolutionStatus {
    pub fn is_error(self) -> bool {
        matches!(
            self,
            SolutionStatus::ConfigError | SolutionStatus::RemoteError | SolutionStatus::Unexpected
        )
    }
}

/// Snapshot of the dashboard state as rendered by the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub user: Option<User>,
    pub question: String,
    pub solution: String,
    #[serde(default)]
    pub status: Option<SolutionStatus>,
    pub loading: bool,
    pub button_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_request_defaults_to_empty_question() {
        let request: SolveRequest = serde_json::from_str("{}").unwrap();
        assert!(request.question.is_empty());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&SolutionStatus::NoResponse).unwrap();
        assert_eq!(json, r#""no_response""#);
        let json = serde_json::to_string(&SolutionStatus::ConfigError).unwrap();
        assert_eq!(json, r#""config_error""#);
    }

    #[test]
    fn test_error_statuses() {
        assert!(SolutionStatus::ConfigError.is_error());
        assert!(SolutionStatus::RemoteError.is_error());
        assert!(SolutionStatus::Unexpected.is_error());
        assert!(!SolutionStatus::Answered.is_error());
        assert!(!SolutionStatus::NoResponse.is_error());
        assert!(!SolutionStatus::Prompt.is_error());
    }
}

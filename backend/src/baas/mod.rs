//! Backend-as-a-service boundary: identity lookup and learn-request storage.
//!
//! The dashboard only talks to these traits; `SupabaseClient` is the
//! production implementation and `test_util` carries recording doubles.

mod supabase;

pub use supabase::SupabaseClient;

use std::fmt;

use async_trait::async_trait;
use kairos_common::{LearnRequestId, NewLearnRequest, User};

/// Bearer token of the signed-in browser session.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BaasError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, BaasError>;

/// Resolves the user behind an access token.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self, token: &AccessToken) -> Result<User>;
}

/// Append/update storage for question/answer rows.
#[async_trait]
pub trait LearnRequestStore: Send + Sync {
    /// Insert a new row and return its id.
    async fn insert(&self, token: &AccessToken, row: &NewLearnRequest) -> Result<LearnRequestId>;

    /// Set `openai_response` on the row with the given id.
    async fn record_response(
        &self,
        token: &AccessToken,
        id: &LearnRequestId,
        response: &str,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("eyJhbGciOiJIUzI1NiJ9.secret");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret"));
        assert_eq!(token.as_str(), "eyJhbGciOiJIUzI1NiJ9.secret");
    }

    #[test]
    fn test_api_error_display() {
        let err = BaasError::Api {
            status: 401,
            message: "JWT expired".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 401: JWT expired");
    }
}

//! Supabase implementation of the identity and storage ports.
//!
//! Identity goes through GoTrue (`/auth/v1/user`), rows through PostgREST
//! (`/rest/v1/<table>`). Every request carries the project anon key as
//! `apikey` and the user's access token as bearer, so row-level security
//! applies exactly as it would in the browser.

use async_trait::async_trait;
use kairos_common::{LearnRequestId, LearnResponseUpdate, NewLearnRequest, User};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use super::{AccessToken, BaasError, IdentityProvider, LearnRequestStore, Result};
use crate::config::SupabaseCredentials;

/// Client for a single Supabase project.
#[derive(Clone)]
pub struct SupabaseClient {
    http_client: Client,
    base_url: String,
    anon_key: String,
    table: String,
}

/// Error body shapes used by GoTrue and PostgREST.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: LearnRequestId,
}

impl SupabaseClient {
    pub fn new(credentials: &SupabaseCredentials) -> Self {
        Self {
            http_client: Client::new(),
            base_url: credentials.url.trim_end_matches('/').to_string(),
            anon_key: credentials.anon_key.clone(),
            table: credentials.table.clone(),
        }
    }

    fn authorized(&self, builder: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(token.as_str())
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Turn a non-2xx response into `BaasError::Api`.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .unwrap_or(body);

        Err(BaasError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn current_user(&self, token: &AccessToken) -> Result<User> {
        let url = format!("{}/auth/v1/user", self.base_url);
        tracing::debug!("Fetching current user from {}", url);

        let response = self
            .authorized(self.http_client.get(&url), token)
            .send()
            .await
            .map_err(|e| BaasError::RequestFailed(e.to_string()))?;

        Self::check(response)
            .await?
            .json::<User>()
            .await
            .map_err(|e| BaasError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LearnRequestStore for SupabaseClient {
    async fn insert(&self, token: &AccessToken, row: &NewLearnRequest) -> Result<LearnRequestId> {
        let response = self
            .authorized(self.http_client.post(self.table_url()), token)
            .query(&[("select", "id")])
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| BaasError::RequestFailed(e.to_string()))?;

        let rows: Vec<InsertedRow> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| BaasError::InvalidResponse(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| BaasError::InvalidResponse("insert returned no rows".to_string()))
    }

    async fn record_response(
        &self,
        token: &AccessToken,
        id: &LearnRequestId,
        response: &str,
    ) -> Result<()> {
        let update = LearnResponseUpdate {
            openai_response: response.to_string(),
        };

        let response = self
            .authorized(self.http_client.patch(self.table_url()), token)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&update)
            .send()
            .await
            .map_err(|e| BaasError::RequestFailed(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }
}

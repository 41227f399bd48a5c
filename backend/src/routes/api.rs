//! JSON endpoints backing the dashboard page.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use kairos_common::{DashboardView, SolveRequest};

use crate::baas::AccessToken;
use crate::dashboard::Dashboard;
use crate::AppState;

/// Bearer token from the `Authorization` header, if any.
fn access_token(headers: &HeaderMap) -> Option<AccessToken> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(AccessToken::new(token))
    }
}

/// GET /api/user - Mount the dashboard and report who is signed in.
async fn current_user(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<DashboardView> {
    let mut dashboard = Dashboard::new(state.services.clone(), access_token(&headers));
    dashboard.mount().await;
    Json(dashboard.view())
}

/// POST /api/solve - Submit a question. Always 200; errors are in `solution`.
async fn solve(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SolveRequest>,
) -> Json<DashboardView> {
    let mut dashboard = Dashboard::new(state.services.clone(), access_token(&headers));
    dashboard.set_question(request.question);
    dashboard.submit().await;

    let view = dashboard.view();
    tracing::info!(
        signed_in = view.user.is_some(),
        status = ?view.status,
        "Question answered"
    );
    Json(view)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/user", get(current_user))
        .route("/api/solve", post(solve))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_access_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(access_token(&headers), Some(AccessToken::new("abc.def")));
    }

    #[test]
    fn test_access_token_missing_or_malformed() {
        assert!(access_token(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(access_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert!(access_token(&headers).is_none());
    }
}

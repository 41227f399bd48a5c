//! The dashboard page itself.

use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};
use serde::Serialize;

use crate::dashboard::messages;
use crate::AppState;

const TEMPLATE: &str = include_str!("../../static/dashboard.html");

/// Settings the browser needs to talk to Supabase auth directly.
///
/// Both are set or neither, matching what the server itself uses.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicConfig {
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
}

fn render(state: &AppState) -> String {
    let public = match state.config.supabase_credentials() {
        Ok(credentials) => PublicConfig {
            supabase_url: Some(credentials.url),
            supabase_anon_key: Some(credentials.anon_key),
        },
        Err(_) => PublicConfig::default(),
    };
    let json = serde_json::to_string(&public)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    TEMPLATE
        .replace("{{PUBLIC_CONFIG}}", &json)
        .replace("{{BUTTON_IDLE}}", messages::BUTTON_IDLE)
        .replace("{{BUTTON_BUSY}}", messages::BUTTON_BUSY)
        .replace("{{EMPTY_QUESTION}}", messages::EMPTY_QUESTION)
        .replace("{{UNEXPECTED_ERROR}}", messages::UNEXPECTED_ERROR)
}

/// GET / - Dashboard page.
async fn dashboard_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render(&state))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .with_state(state)
}

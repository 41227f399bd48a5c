pub mod baas;
pub mod config;
pub mod dashboard;
pub mod llm;
pub mod logging;
pub mod routes;
pub mod test_util;

pub use baas::{AccessToken, IdentityProvider, LearnRequestStore, SupabaseClient};
pub use config::Config;
pub use dashboard::{solve, Dashboard, Services, SignedInUser, Solution, Storage};
pub use llm::{CompletionService, OpenAiClient};

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Clients built once at startup from `config`.
    pub services: Services,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let services = Services::from_config(&config);
        Self { config, services }
    }
}

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::router(state.clone()))
        .merge(routes::page::router(state.clone()))
        .merge(routes::api::router(state))
        .layer(middleware::from_fn(logging::request_logger))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

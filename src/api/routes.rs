//! Shared application state and route assembly.
//!
//! `AppState` carries the configuration, the pooled HTTP client, and the
//! server-key Gemini client when the secret is configured. Per-request
//! clients for user-supplied keys are built by the orchestrator from the same
//! pooled `reqwest::Client`.
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::config::Config;
use crate::gemini::client::GeminiClient;

pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
    pub gemini: Option<GeminiClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let gemini = config
            .gemini_api_key
            .clone()
            .map(|key| GeminiClient::new(http.clone(), config.gemini_base_url.clone(), key));
        AppState {
            config,
            http,
            gemini,
        }
    }
}

/// Build the application router. The permissive CORS layer also answers
/// preflight OPTIONS requests.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/generate", post(handlers::generate))
        .route("/api/regenerate-image", post(handlers::regenerate_image))
        .route("/api/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

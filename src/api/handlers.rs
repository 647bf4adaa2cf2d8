//! Axum request handlers for the HTTP API.
//!
//! Handlers stay thin: validation and orchestration live in
//! `kit::orchestrator`, and every error converts to a structured
//! `{"error": …}` body through `AppError`.
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::routes::AppState;
use crate::error::AppError;
use crate::kit::orchestrator;
use crate::kit::types::{GenerationRequest, GenerationResult, RegenerateRequest};

pub async fn root() -> &'static str {
    "Content Kit Server"
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerationRequest>,
) -> Result<Json<GenerationResult>, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate", %request_id);
    orchestrator::generate(&state, payload)
        .instrument(span)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(%request_id, error = %e, "generation failed");
            e
        })
}

pub async fn regenerate_image(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegenerateRequest>,
) -> Result<Json<Value>, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("regenerate_image", %request_id);
    let image_url = orchestrator::regenerate(&state, payload)
        .instrument(span)
        .await
        .map_err(|e| {
            tracing::error!(%request_id, error = %e, "image regeneration failed");
            e
        })?;
    Ok(Json(json!({ "success": true, "imageUrl": image_url })))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "status": "ok", "geminiConfigured": state.gemini.is_some() }))
}

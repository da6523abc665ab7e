/*
 * Responsibility
 * - GET /health (liveness)
 * - reports which user store backend is wired in
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "user_store": state.signin.store_backend(),
        })),
    )
}

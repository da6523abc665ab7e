use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::state::AppState;

/// GET /metrics in Prometheus text format. 404 when the recorder is disabled.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.prometheus.as_ref() {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

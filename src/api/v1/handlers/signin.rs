/*
 * Responsibility
 * - POST /signin: Extract → Validate → Issue → Respond
 * - exactly one response and one outcome counter per request
 *   (total is counted first, unconditionally)
 */
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::extract_credentials;
use crate::services::metrics::SigninOutcome;
use crate::state::AppState;

pub async fn signin(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.counters.record_request();

    let result = match extract_credentials(&headers) {
        Ok(request) => state.signin.sign_in(&request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(token) => {
            state.counters.record_outcome(SigninOutcome::Success);
            (StatusCode::OK, token.into_string()).into_response()
        }
        Err(e) => {
            state.counters.record_outcome(e.outcome());
            e.into_response()
        }
    }
}

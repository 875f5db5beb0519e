use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::middleware::ask_request::AskPreprocess;
use crate::router::NexusState;

/// Exhaustion is reported as 429 whatever the last upstream error was.
pub async fn ask_handler(
    State(state): State<NexusState>,
    AskPreprocess(question): AskPreprocess,
) -> Response {
    match state.policy.answer(state.model.as_ref(), &question).await {
        Ok(answer) => (StatusCode::OK, Json(answer)).into_response(),
        Err(failure) => (StatusCode::TOO_MANY_REQUESTS, Json(failure)).into_response(),
    }
}

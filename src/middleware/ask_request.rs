use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::types::ask::{MISSING_QUESTION, extract_question};

/// Validated, trimmed question from an `/ask` body.
///
/// The body is read leniently: invalid JSON, a non-object body or a missing
/// content type all count as an empty object, so they end in the same 400.
pub struct AskPreprocess(pub String);

impl<S> FromRequest<S> for AskPreprocess
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Bytes::from_request(req, state).await {
            Ok(b) => b,
            Err(rejection) => return Err(rejection.into_response()),
        };
        let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

        let Some(question) = extract_question(&payload) else {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": MISSING_QUESTION })),
            )
                .into_response());
        };
        Ok(AskPreprocess(question))
    }
}

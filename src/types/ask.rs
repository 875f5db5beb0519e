use serde::Serialize;
use serde_json::Value;

pub const MISSING_QUESTION: &str = "Missing 'question' or 'query'";
pub const EXHAUSTED_ERROR: &str = "All models failed (likely rate limits on free tier).";
pub const EXHAUSTED_TIPS: &str =
    "Try again in ~30s, or enable billing, or keep using 2.5-flash during dev.";

/// Pull the question out of an `/ask` body.
///
/// `question` wins over `query`; a field only counts when it is a non-empty
/// string. Returns `None` when nothing is left after trimming.
pub fn extract_question(body: &Value) -> Option<String> {
    let pick = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    let q = pick("question").or_else(|| pick("query"))?.trim();
    (!q.is_empty()).then(|| q.to_string())
}

/// Successful answer from one of the models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    pub answer: String,
    pub model_used: String,
    /// Uncapped delay the upstream asked for, present only after a retry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retried_after_seconds: Option<f64>,
}

/// Every model in the fallback order failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureResult {
    pub error: String,
    pub details: String,
    pub tips: String,
}

impl FailureResult {
    pub fn exhausted(last_error: impl Into<String>) -> Self {
        Self {
            error: EXHAUSTED_ERROR.to_string(),
            details: last_error.into(),
            tips: EXHAUSTED_TIPS.to_string(),
        }
    }
}

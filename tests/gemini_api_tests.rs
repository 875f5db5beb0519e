use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use campus_nexus::{
    FallbackPolicy, ModelClient, NexusError, api::gemini_api::GeminiApi, config::GeminiConfig,
};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

/// Fake Gemini endpoint: `pro` is rate limited, `flash` echoes the prompt.
async fn fake_generate(
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}})),
        )
            .into_response();
    }
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    match model_action.as_str() {
        "gemini-2.5-pro:generateContent" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {
                "code": 429,
                "message": "You exceeded your current quota. Please retry in 0.01s.",
                "status": "RESOURCE_EXHAUSTED"
            }})),
        )
            .into_response(),
        "gemini-2.5-flash:generateContent" => Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "echo: "}, {"text": prompt}]},
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.5-flash"
        }))
        .into_response(),
        "gemini-blocked:generateContent" => {
            Json(json!({"promptFeedback": {"blockReason": "SAFETY"}})).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "no such model").into_response(),
    }
}

async fn spawn_fake() -> Url {
    let app = Router::new().route("/v1beta/models/{model_action}", post(fake_generate));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{addr}/v1beta/")).expect("url")
}

async fn api(key: &str) -> GeminiApi {
    let cfg = GeminiConfig {
        api_key: key.to_string(),
        base_url: spawn_fake().await,
        connect_retries: 0,
        ..GeminiConfig::default()
    };
    let client = GeminiApi::build_client(&cfg).expect("client");
    GeminiApi::new(client, &cfg)
}

#[tokio::test]
async fn successful_call_joins_candidate_text() {
    let api = api("test-key").await;
    let text = api
        .generate("gemini-2.5-flash", "hello")
        .await
        .expect("flash should answer");
    assert_eq!(text, "echo: hello");
}

#[tokio::test]
async fn rate_limit_surfaces_google_message() {
    let api = api("test-key").await;
    let err = api.generate("gemini-2.5-pro", "hello").await.unwrap_err();
    match err {
        NexusError::Upstream { status, message } => {
            assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
            assert!(message.contains("Please retry in 0.01s"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn wrong_key_is_an_upstream_error() {
    let api = api("wrong").await;
    let err = api.generate("gemini-2.5-flash", "hello").await.unwrap_err();
    assert_eq!(err.to_string(), "403 API key not valid.");
}

#[tokio::test]
async fn blocked_prompt_is_an_empty_response() {
    let api = api("test-key").await;
    let err = api.generate("gemini-blocked", "hello").await.unwrap_err();
    assert!(matches!(err, NexusError::EmptyResponse(reason) if reason == "prompt blocked: SAFETY"));
}

#[tokio::test]
async fn policy_over_http_retries_pro_then_falls_back() {
    let api = api("test-key").await;
    let policy = FallbackPolicy::new(
        vec!["gemini-2.5-pro".to_string(), "gemini-2.5-flash".to_string()],
        Duration::from_secs(35),
    );

    let answer = policy
        .answer(&api, "which scholarship?")
        .await
        .expect("flash should answer");

    assert_eq!(answer.model_used, "gemini-2.5-flash");
    assert_eq!(answer.answer, "echo: which scholarship?");
    assert_eq!(answer.retried_after_seconds, None);
}

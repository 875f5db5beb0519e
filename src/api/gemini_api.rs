use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::config::GeminiConfig;
use crate::error::{GeminiError, NexusError};
use crate::service::model_client::ModelClient;
use crate::types::gemini::{GenerateContentRequest, GeminiResponse};

/// Thin `generateContent` client for the Gemini REST API.
#[derive(Clone)]
pub struct GeminiApi {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    retry_policy: ExponentialBuilder,
}

impl GeminiApi {
    pub fn new(client: reqwest::Client, cfg: &GeminiConfig) -> Self {
        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(2))
            .with_max_times(cfg.connect_retries)
            .with_jitter();
        Self {
            client,
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
            retry_policy,
        }
    }

    /// Build the shared HTTP client, routed through `proxy` when set.
    pub fn build_client(cfg: &GeminiConfig) -> Result<reqwest::Client, NexusError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }
        Ok(builder.build()?)
    }

    pub fn generate_url(&self, model: &str) -> Result<Url, NexusError> {
        Ok(self
            .base_url
            .join(&format!("models/{model}:generateContent"))?)
    }

    /// Send the request, retrying only when the connection itself failed.
    async fn try_post(
        &self,
        url: Url,
        body: &GenerateContentRequest,
    ) -> Result<reqwest::Response, reqwest::Error> {
        (|| async {
            self.client
                .post(url.clone())
                .header("x-goog-api-key", &self.api_key)
                .json(body)
                .send()
                .await
        })
        .retry(self.retry_policy)
        .when(|e: &reqwest::Error| e.is_connect())
        .notify(|e: &reqwest::Error, dur: Duration| {
            error!("Gemini connect error (retrying in {:?}): {}", dur, e);
        })
        .await
    }
}

/// Map a non-success upstream reply to an error whose text is the upstream message.
pub fn upstream_error(status: StatusCode, body: &str) -> NexusError {
    let message = match GeminiError::from_body(body) {
        Some(parsed) => parsed.error.message,
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("upstream error")
            .to_string(),
        None => body.trim().to_string(),
    };
    NexusError::Upstream { status, message }
}

#[async_trait]
impl ModelClient for GeminiApi {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, NexusError> {
        let url = self.generate_url(model)?;
        let body = GenerateContentRequest::from_prompt(prompt);

        debug!(model, prompt_len = prompt.len(), "sending generateContent");
        let resp = self.try_post(url, &body).await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_else(|e| {
                debug!(model, %status, error = %e, "failed to read upstream error body");
                String::new()
            });
            return Err(upstream_error(status, &text));
        }

        let parsed: GeminiResponse = resp.json().await?;
        parsed
            .text()
            .ok_or_else(|| NexusError::EmptyResponse(parsed.empty_reason()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> GeminiApi {
        let cfg = GeminiConfig {
            api_key: "k".to_string(),
            ..GeminiConfig::default()
        };
        GeminiApi::new(reqwest::Client::new(), &cfg)
    }

    #[test]
    fn builds_model_url_under_base() {
        let url = api().generate_url("gemini-2.5-flash").unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn upstream_error_uses_google_message() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded. Please retry in 41.2s.","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = upstream_error(StatusCode::TOO_MANY_REQUESTS, body);
        assert!(matches!(
            &err,
            NexusError::Upstream { status, message }
                if *status == StatusCode::TOO_MANY_REQUESTS
                    && message == "Quota exceeded. Please retry in 41.2s."
        ));
    }

    #[test]
    fn upstream_error_falls_back_to_raw_body_or_reason() {
        let err = upstream_error(StatusCode::BAD_GATEWAY, " upstream connect error ");
        assert_eq!(err.to_string(), "502 upstream connect error");

        let err = upstream_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "503 Service Unavailable");
    }
}

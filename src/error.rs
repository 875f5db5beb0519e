use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum NexusError {
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("GEMINI_API_KEY is not set; refusing to start")]
    MissingApiKey,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read dataset {path}: {source}")]
    DatasetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in dataset {name}: {source}")]
    Csv {
        name: String,
        #[source]
        source: csv::Error,
    },

    #[error("dataset {0} has no header row")]
    EmptyDataset(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream answered with a non-success status. The message is the raw
    /// upstream text, which may carry a retry hint.
    #[error("{} {message}", status.as_u16())]
    Upstream { status: StatusCode, message: String },

    #[error("model returned no text: {0}")]
    EmptyResponse(String),
}

impl From<figment::Error> for NexusError {
    fn from(e: figment::Error) -> Self {
        NexusError::Config(Box::new(e))
    }
}

/// Gemini API error response structure
#[derive(Deserialize, Debug)]
pub struct GeminiError {
    pub error: GeminiErrorBody,
}

#[derive(Deserialize, Debug)]
pub struct GeminiErrorBody {
    #[serde(default)]
    pub code: u32,
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl GeminiError {
    /// Best-effort parse of an upstream error body.
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

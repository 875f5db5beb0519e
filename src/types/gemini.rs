use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single text part of a chat turn.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Chat content payload for requests and candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// `generateContent` request body.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Chat>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Chat {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.into()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct Candidate {
    pub content: Option<Chat>,
    #[serde(default)]
    pub finishReason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub promptFeedback: Option<Value>,
    #[serde(default)]
    pub modelVersion: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }

    /// Human-readable reason for a response without text.
    pub fn empty_reason(&self) -> String {
        if let Some(block) = self
            .promptFeedback
            .as_ref()
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
        {
            return format!("prompt blocked: {block}");
        }
        match self.candidates.first() {
            None => "no candidates returned".to_string(),
            Some(c) => format!(
                "finish reason {}",
                c.finishReason.as_deref().unwrap_or("unknown")
            ),
        }
    }
}

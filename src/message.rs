// src/message.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ReplyMeta>,
}

/// Diagnostic attached to a reply that came from the offline fallback.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReplyMeta {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub ollama: bool,
}

impl HealthResponse {
    pub fn ok(ollama: bool) -> Self {
        Self { status: "ok".to_string(), ollama }
    }
}

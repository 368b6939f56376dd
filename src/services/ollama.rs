// src/services/ollama.rs
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Why a generation call did not produce text.
#[derive(Debug, Error)]
pub enum BackendFailure {
    #[error("{0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("ollama returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("{0}")]
    InvalidBody(#[source] reqwest::Error),

    #[error("expected a JSON object from ollama, got {0}")]
    UnexpectedBody(Value),
}

impl BackendFailure {
    /// Text carried back to the caller in `meta.error`.
    pub fn diagnostic(&self) -> String {
        match self {
            BackendFailure::Status { status, body } if body.trim().is_empty() => status.to_string(),
            BackendFailure::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendReply {
    pub text: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One non-streaming completion against `/api/generate`.
    pub async fn generate(&self, prompt: &str) -> Result<BackendReply, BackendFailure> {
        let payload = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let resp = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(BackendFailure::Unreachable)?;

        let status = resp.status();
        if !status.is_success() {
            // an unreadable error body still counts as a status failure
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendFailure::Status { status, body });
        }

        let body: Value = resp.json().await.map_err(BackendFailure::InvalidBody)?;
        if !body.is_object() {
            return Err(BackendFailure::UnexpectedBody(body));
        }
        Ok(BackendReply {
            text: extract_generated_text(&body),
        })
    }

    /// True only when `/api/ping` answers with a success status.
    pub async fn ping(&self) -> bool {
        match self.http.get(format!("{}/api/ping", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "ollama ping failed");
                false
            }
        }
    }
}

/// `response`, then `responses`, then the whole body as JSON.
pub fn extract_generated_text(body: &Value) -> String {
    ["response", "responses"]
        .iter()
        .filter_map(|field| body.get(*field))
        .find(|value| !value.is_null())
        .map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| body.to_string())
}

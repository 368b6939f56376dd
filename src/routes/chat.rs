use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    error::AppError,
    message::{ChatReply, ChatRequest, HealthResponse},
    services::{fallback, ollama::BackendFailure},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let message = match payload {
        Ok(Json(request)) => request.message.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable chat request");
            String::new()
        }
    };

    if message.trim().is_empty() {
        return Err(AppError::BadRequest("No message provided".to_string()));
    }

    let outcome = state.ollama.generate(&message).await;
    match &outcome {
        Err(BackendFailure::Status { status, body }) => {
            tracing::error!(%status, body = %body, "ollama error");
        }
        Err(err) => tracing::error!(error = %err, "ollama request failed"),
        Ok(_) => {}
    }

    Ok(Json(fallback::resolve(&message, outcome)))
}

pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let reachable = state.ollama.ping().await;
    tracing::debug!(ollama = reachable, "health check");
    Json(HealthResponse::ok(reachable))
}

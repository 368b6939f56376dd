// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::ollama::OllamaClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub ollama: OllamaClient,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            ollama: OllamaClient::new(&config.ollama_url, &config.model),
        }
    }
}

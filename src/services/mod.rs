pub mod fallback;
pub mod ollama;

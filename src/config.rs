// src/config.rs
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen port: {value:?}")]
    InvalidPort { value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ollama_url: String,
    pub model: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub index_page: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
            index_page: PathBuf::from("views/index.html"),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // first non-blank variable wins
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|&key| lookup(key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let defaults = Self::default();

        let port = match first(&["PORT", "LISTEN_PORT"]) {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => defaults.port,
        };

        let ollama_url = first(&["OLLAMA_URL", "BASE_URL"])
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.ollama_url);

        Ok(Self {
            ollama_url,
            model: first(&["OLLAMA_MODEL", "MODEL_NAME"]).unwrap_or(defaults.model),
            port,
            static_dir: first(&["STATIC_DIR"])
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            index_page: first(&["INDEX_PAGE"])
                .map(PathBuf::from)
                .unwrap_or(defaults.index_page),
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

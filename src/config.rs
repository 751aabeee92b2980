use std::env;

use tracing::warn;

use crate::api_connection::endpoints::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

const API_KEY_PLACEHOLDER: &str = "your_openai_api_key_here";

/// Environment-derived configuration, read once at startup and passed explicitly
/// to whatever needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub use_backend: bool,
    pub backend_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let api_key = env::var("OPENAI_API_KEY").ok();
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let use_backend = env::var("USE_BACKEND")
            .map(|v| v == "true")
            .unwrap_or(false);
        let backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Invalid PORT value '{}': {}, using default", raw, e);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            use_backend,
            backend_url,
            port,
        }
    }

    /// Whether the configured key looks usable. A missing key, the placeholder
    /// from the example env file, or one without the `sk-` prefix all mean the
    /// service runs on mock data.
    pub fn has_valid_api_key(&self) -> bool {
        match &self.api_key {
            Some(key) => key != API_KEY_PLACEHOLDER && key.starts_with("sk-"),
            None => false,
        }
    }
}

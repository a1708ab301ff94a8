use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_url: String,
    pub jwt_secret: String,
    pub max_image_bytes: usize,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("AMICOOKED_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            // Development fallback only; set JWT_SECRET in any real deployment.
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-at-least-32-chars-long".to_string()),
            max_image_bytes: env::var("MAX_IMAGE_BYTES")
                .unwrap_or_else(|_| "16777216".to_string()) // 16MB, matches the backend cap
                .parse()
                .unwrap_or(16_777_216),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        }
    }
}

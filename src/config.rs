//! Environment-driven configuration shared by the server and the client.

use crate::{Error, Result};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Checked at call time, not at startup.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub server_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let gemini_api_key = get("GEMINI_API_KEY");
        if gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set; model requests will fail until it is provided");
        }

        let gemini_model = get("GEMINI_MODEL")
            .map(|m| m.strip_prefix("models/").unwrap_or(&m).to_string())
            .unwrap_or(defaults.gemini_model);

        let gemini_timeout = match get("GEMINI_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("GEMINI_TIMEOUT_SECS", &raw)?),
            None => defaults.gemini_timeout,
        };

        let port = match get("PORT") {
            Some(raw) => parse_number("PORT", &raw)?,
            None => defaults.port,
        };

        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(raw) => parse_number("MAX_BODY_BYTES", &raw)?,
            None => defaults.max_body_bytes,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|raw| split_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        Ok(Self {
            gemini_api_key,
            gemini_model,
            gemini_timeout,
            host: get("HOST").unwrap_or(defaults.host),
            port,
            allowed_origins,
            max_body_bytes,
            server_url: get("UMKM_SERVER_URL").unwrap_or(defaults.server_url),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got '{}'", key, raw)))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

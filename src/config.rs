// src/config.rs
use std::{net::SocketAddr, time::Duration};

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_UPSTREAM_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_UPSTREAM_MODEL: &str = "google/gemini-3-flash-preview";
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000/chat";
pub const DEFAULT_RATE_LIMIT: u32 = 10;
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Relay server settings.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// Held server-side only. `None` is allowed at startup; requests then fail.
    pub upstream_api_key: Option<String>,
    pub upstream_url: String,
    pub upstream_model: String,
    pub bearer_token: Option<String>,
    pub rate_limit: u32,
    pub rate_window: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            upstream_api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_model: DEFAULT_UPSTREAM_MODEL.to_string(),
            bearer_token: None,
            rate_limit: DEFAULT_RATE_LIMIT,
            rate_window: DEFAULT_RATE_WINDOW,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("RELAY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::Invalid { key: "RELAY_BIND_ADDR", value: bind_raw.clone() })?;

        let rate_limit = match get("RATE_LIMIT_MAX_REQUESTS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "RATE_LIMIT_MAX_REQUESTS", value: raw })?,
            None => DEFAULT_RATE_LIMIT,
        };

        let rate_window = match get("RATE_LIMIT_WINDOW_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid { key: "RATE_LIMIT_WINDOW_SECS", value: raw })?,
            None => DEFAULT_RATE_WINDOW,
        };

        Ok(Self {
            bind_addr,
            upstream_api_key: get("UPSTREAM_API_KEY").or_else(|| get("LOVABLE_API_KEY")),
            upstream_url: get("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            upstream_model: get("UPSTREAM_MODEL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_MODEL.to_string()),
            bearer_token: get("RELAY_BEARER_TOKEN"),
            rate_limit,
            rate_window,
        })
    }
}

/// Terminal client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub relay_url: String,
    pub bearer_token: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            relay_url: get("RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            bearer_token: get("RELAY_BEARER_TOKEN"),
        }
    }
}

// src/state.rs
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::gateway::Gateway;
use crate::services::rate_limiter::RateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub limiter: RateLimiter,
    pub gateway: Gateway,
    pub bearer_token: Option<String>,
}

impl AppState {
    pub fn new(limiter: RateLimiter, gateway: Gateway) -> Self {
        Self { limiter, gateway, bearer_token: None }
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            limiter: RateLimiter::new(config.rate_limit, config.rate_window),
            gateway: Gateway::from_config(config)?,
            bearer_token: config.bearer_token.clone(),
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

// src/services/gateway.rs
use std::time::Duration;

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::RelayConfig;
use crate::message::ChatMessage;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("AI service not configured")]
    NotConfigured,

    #[error("upstream rate limit")]
    RateLimited,

    #[error("upstream quota exhausted")]
    QuotaExhausted,

    #[error("upstream returned status {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct UpstreamMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct UpstreamRequest<'a> {
    model: &'a str,
    messages: Vec<UpstreamMessage<'a>>,
    stream: bool,
}

/// Client for the streaming completions gateway.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    system_prompt: String,
}

impl Gateway {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        system_prompt: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        // No total timeout: it would cut long token streams short.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            system_prompt: system_prompt.into(),
        })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.upstream_url.clone(),
            config.upstream_model.clone(),
            config.upstream_api_key.clone(),
            crate::services::prompt::SYSTEM_PROMPT,
        )
    }

    /// Forward the history with the system prompt prepended and streaming on.
    ///
    /// A successful response is returned with its body untouched so the
    /// caller can relay it.
    pub async fn stream_completion(
        &self,
        messages: &[ChatMessage],
    ) -> Result<reqwest::Response, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::NotConfigured)?;

        let body = UpstreamRequest {
            model: &self.model,
            messages: self.upstream_messages(messages),
            stream: true,
        };

        debug!(endpoint = %self.endpoint, turns = messages.len(), "forwarding to gateway");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::TOO_MANY_REQUESTS => Err(GatewayError::RateLimited),
            StatusCode::PAYMENT_REQUIRED => Err(GatewayError::QuotaExhausted),
            status => {
                error!(%status, "AI gateway error");
                Err(GatewayError::Status(status))
            }
        }
    }

    fn upstream_messages<'a>(&'a self, messages: &'a [ChatMessage]) -> Vec<UpstreamMessage<'a>> {
        let system = UpstreamMessage { role: "system", content: &self.system_prompt };
        std::iter::once(system)
            .chain(messages.iter().map(|m| UpstreamMessage {
                role: m.role.as_str(),
                content: &m.content,
            }))
            .collect()
    }
}

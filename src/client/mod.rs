//! Streaming consumer for the chat relay.

pub mod conversation;
pub mod frame;
pub mod transcript;

use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::message::{ChatMessage, ChatRequest, ErrorBody};

pub use conversation::Conversation;
pub use frame::{Frame, FrameDecoder};
pub use transcript::{AssistantAccumulator, Transcript};

pub const DEFAULT_ERROR_MESSAGE: &str = "Sorry, something went wrong. Please try again.";
pub const CONNECT_ERROR_MESSAGE: &str = "Sorry, I couldn't connect. Please try again later.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay answered with an error status.
    #[error("relay rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    url: String,
    bearer_token: Option<String>,
}

impl RelayClient {
    pub fn new(url: impl Into<String>, bearer_token: Option<String>) -> Self {
        Self { http: reqwest::Client::new(), url: url.into(), bearer_token }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.relay_url.clone(), config.bearer_token.clone())
    }

    /// POST the full history and return the reply as a frame stream.
    pub async fn open(&self, messages: &[ChatMessage]) -> Result<FrameStream, ClientError> {
        let mut request = self.http.post(&self.url).json(&ChatRequest { messages });
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .map(|body| body.error)
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
            return Err(ClientError::Rejected { status, message });
        }

        Ok(FrameStream::new(response.bytes_stream()))
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Pulls body chunks and runs them through a [`FrameDecoder`].
pub struct FrameStream {
    bytes: ByteStream,
    decoder: FrameDecoder,
    finished: bool,
}

impl FrameStream {
    pub fn new(bytes: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static) -> Self {
        Self { bytes: Box::pin(bytes), decoder: FrameDecoder::new(), finished: false }
    }

    /// Frames completed by the next read, or `None` once the body has ended.
    pub async fn next_frames(&mut self) -> Result<Option<Vec<Frame>>, ClientError> {
        if self.finished {
            return Ok(None);
        }
        match self.bytes.next().await {
            Some(chunk) => Ok(Some(self.decoder.feed(&chunk?))),
            None => {
                self.finished = true;
                Ok(Some(self.decoder.finish()))
            }
        }
    }
}

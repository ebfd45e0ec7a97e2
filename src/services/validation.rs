use serde_json::Value;
use thiserror::Error;

use crate::message::{ChatMessage, MAX_CONTENT_CHARS, MAX_MESSAGES, Role};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid messages format")]
    InvalidMessages,
    #[error("Invalid message format")]
    InvalidMessage,
}

/// Check the `{ messages }` body shape and return the typed history.
pub fn validate_messages(body: &Value) -> Result<Vec<ChatMessage>, ValidationError> {
    let messages = body
        .get("messages")
        .and_then(Value::as_array)
        .ok_or(ValidationError::InvalidMessages)?;

    if messages.is_empty() || messages.len() > MAX_MESSAGES {
        return Err(ValidationError::InvalidMessages);
    }

    messages.iter().map(validate_message).collect()
}

fn validate_message(raw: &Value) -> Result<ChatMessage, ValidationError> {
    let role = raw
        .get("role")
        .and_then(Value::as_str)
        .and_then(Role::parse)
        .ok_or(ValidationError::InvalidMessage)?;

    let content = raw
        .get("content")
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidMessage)?;

    // Unicode scalar values, not UTF-16 units: an emoji counts once.
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ValidationError::InvalidMessage);
    }

    Ok(ChatMessage { role, content: content.to_string() })
}

//! Anthropic messages adapter.
//!
//! System text travels as a top-level `system` field rather than a message,
//! the credential goes in `x-api-key`, and every request pins the API version
//! header.

use crate::error::ChatError;
use crate::streaming::DecodedRecord;
use crate::types::{Conversation, Message, MessageRole, ProviderConfig};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;

pub(crate) const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Event type whose records carry answer text. Everything else
/// (message_start, content_block_start, ping, message_stop, ...) is skipped.
const CONTENT_DELTA_TYPE: &str = "content_block_delta";

pub(crate) fn build_request(
    http: &reqwest::Client,
    config: &ProviderConfig,
    conversation: &Conversation,
) -> Result<reqwest::RequestBuilder, ChatError> {
    let api_key = super::required_api_key(config, "anthropic")?;

    let (system, messages) = split_system(conversation);
    let mut body = serde_json::json!({
        "model": config.model,
        "messages": messages,
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "stream": true,
    });
    if let Some(system) = system {
        body["system"] = serde_json::Value::String(system);
    }

    let url = format!("{}/messages", config.endpoint_base());
    Ok(http.post(url).headers(build_headers(api_key)?).json(&body))
}

/// Pull system-role messages out of the conversation; only user/assistant
/// turns belong in the `messages` array.
fn split_system(conversation: &Conversation) -> (Option<String>, Vec<&Message>) {
    let mut system_parts: Vec<&str> = Vec::new();
    let mut messages = Vec::new();
    for message in conversation.messages() {
        match message.role {
            MessageRole::System => system_parts.push(&message.content),
            _ => messages.push(message),
        }
    }
    let system = if system_parts.is_empty() {
        None
    } else {
        Some(system_parts.join("\n\n"))
    };
    (system, messages)
}

fn build_headers(api_key: &str) -> Result<HeaderMap, ChatError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        "x-api-key",
        api_key.parse().map_err(|e| {
            ChatError::Configuration(format!("API key is not a valid header value: {e}"))
        })?,
    );
    headers.insert(
        "anthropic-version",
        HeaderValue::from_static(ANTHROPIC_VERSION),
    );
    Ok(headers)
}

/// One typed event from the Anthropic SSE stream.
#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    delta: Option<EventDelta>,
}

#[derive(Debug, Default, Deserialize)]
struct EventDelta {
    #[serde(default)]
    text: Option<String>,
}

pub(crate) fn decode_record(data: &str) -> Result<DecodedRecord, serde_json::Error> {
    let event: StreamEvent = serde_json::from_str(data)?;
    if event.event_type != CONTENT_DELTA_TYPE {
        return Ok(DecodedRecord::Ignore);
    }
    Ok(event
        .delta
        .and_then(|delta| delta.text)
        .map(DecodedRecord::Text)
        .unwrap_or(DecodedRecord::Ignore))
}

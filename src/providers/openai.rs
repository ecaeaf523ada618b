//! OpenAI-compatible adapter.
//!
//! Serves both hosted OpenAI and local no-auth backends (Ollama, LM Studio
//! and other `/chat/completions` implementations); the only difference is
//! whether a bearer credential is required.

use crate::error::ChatError;
use crate::streaming::DecodedRecord;
use crate::types::{Conversation, ProviderConfig};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;

/// Explicit end-of-stream sentinel sent as a bare `data:` payload.
pub(crate) const DONE_MARKER: &str = "[DONE]";

pub(crate) fn build_request(
    http: &reqwest::Client,
    config: &ProviderConfig,
    conversation: &Conversation,
    require_api_key: bool,
) -> Result<reqwest::RequestBuilder, ChatError> {
    let api_key = if require_api_key {
        Some(super::required_api_key(config, "openai")?)
    } else {
        config.api_key()
    };

    let url = format!("{}/chat/completions", config.endpoint_base());
    let body = serde_json::json!({
        "model": config.model,
        "messages": conversation.messages(),
        "stream": true,
        "temperature": config.temperature,
        "max_tokens": config.max_tokens,
    });

    Ok(http.post(url).headers(build_headers(api_key)?).json(&body))
}

fn build_headers(api_key: Option<&str>) -> Result<HeaderMap, ChatError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key {
        headers.insert(
            "Authorization",
            format!("Bearer {key}").parse().map_err(|e| {
                ChatError::Configuration(format!("API key is not a valid header value: {e}"))
            })?,
        );
    }
    Ok(headers)
}

/// One `data:` chunk of a streaming chat completion.
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Decode one complete record. Role-only and finish-reason chunks carry no
/// `delta.content` and are ignored rather than treated as errors.
pub(crate) fn decode_record(data: &str) -> Result<DecodedRecord, serde_json::Error> {
    if data == DONE_MARKER {
        return Ok(DecodedRecord::Done);
    }
    let chunk: ChatCompletionChunk = serde_json::from_str(data)?;
    let text = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content);
    Ok(match text {
        Some(text) => DecodedRecord::Text(text),
        None => DecodedRecord::Ignore,
    })
}

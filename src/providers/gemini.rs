//! Gemini generate-content adapter.
//!
//! The model name is embedded in the request path, the credential rides as a
//! `key` query parameter (no auth header), and generation parameters nest
//! under `generationConfig`.

use crate::error::ChatError;
use crate::streaming::DecodedRecord;
use crate::types::{Conversation, MessageRole, ProviderConfig};
use serde::Deserialize;

pub(crate) fn build_request(
    http: &reqwest::Client,
    config: &ProviderConfig,
    conversation: &Conversation,
) -> Result<reqwest::RequestBuilder, ChatError> {
    let api_key = super::required_api_key(config, "gemini")?;

    let url = format!(
        "{}/models/{}:streamGenerateContent?alt=sse&key={}",
        config.endpoint_base(),
        config.model,
        urlencoding::encode(api_key)
    );
    let body = serde_json::json!({
        "contents": convert_contents(conversation),
        "generationConfig": {
            "temperature": config.temperature,
            "maxOutputTokens": config.max_tokens,
        },
    });

    Ok(http.post(url).json(&body))
}

/// Gemini knows only `user` and `model` turns: assistant messages become
/// `model`, everything else (including system text) is sent as `user`, and
/// all content rides in `parts`.
fn convert_contents(conversation: &Conversation) -> Vec<serde_json::Value> {
    conversation
        .messages()
        .iter()
        .map(|message| {
            let role = match message.role {
                MessageRole::Assistant => "model",
                _ => "user",
            };
            serde_json::json!({ "role": role, "parts": [{ "text": message.content }] })
        })
        .collect()
}

/// One `data:` chunk of a streaming generate-content response.
#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Decode one complete record. Chunks without the
/// `candidates[0].content.parts[0].text` path (safety feedback, usage
/// metadata) are ignored.
pub(crate) fn decode_record(data: &str) -> Result<DecodedRecord, serde_json::Error> {
    let chunk: StreamChunk = serde_json::from_str(data)?;
    let text = chunk
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text);
    Ok(match text {
        Some(text) => DecodedRecord::Text(text),
        None => DecodedRecord::Ignore,
    })
}

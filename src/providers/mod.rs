//! Provider adapters.
//!
//! One module per backend family. Each adapter translates a
//! `(ProviderKind, ProviderConfig, Conversation)` triple into exactly one
//! outbound HTTP request, and knows how to decode one complete record of that
//! family's streaming response. Adapters share no state and never inspect the
//! response body themselves.

pub(crate) mod anthropic;
pub(crate) mod gemini;
pub(crate) mod openai;

use crate::error::ChatError;
use crate::types::{Conversation, ProviderConfig, ProviderKind};

/// Build the provider-specific request for one chat invocation.
///
/// Fails with [`ChatError::Configuration`] before any network I/O when a
/// required credential is missing.
pub(crate) fn build_request(
    kind: ProviderKind,
    http: &reqwest::Client,
    config: &ProviderConfig,
    conversation: &Conversation,
) -> Result<reqwest::RequestBuilder, ChatError> {
    match kind {
        ProviderKind::OpenAi => openai::build_request(http, config, conversation, true),
        ProviderKind::Local => openai::build_request(http, config, conversation, false),
        ProviderKind::Anthropic => anthropic::build_request(http, config, conversation),
        ProviderKind::Gemini => gemini::build_request(http, config, conversation),
    }
}

/// The configured credential, or a configuration error naming the provider.
pub(crate) fn required_api_key<'a>(
    config: &'a ProviderConfig,
    provider: &str,
) -> Result<&'a str, ChatError> {
    config.api_key().ok_or_else(|| {
        ChatError::Configuration(format!(
            "provider '{provider}' requires an API key and none is configured"
        ))
    })
}

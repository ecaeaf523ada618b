//! Client facade composing the provider adapters with the stream normalizer.

use crate::error::ChatError;
use crate::providers;
use crate::streaming::{self, AnswerStream};
use crate::types::{Conversation, ProviderConfig, ProviderKind};
use serde::Deserialize;
use tracing::debug;

/// Everything one chat invocation needs, as produced by an external request
/// handler: the logical provider identifier, a read-only configuration
/// snapshot, and the already-assembled conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub provider: String,
    pub config: ProviderConfig,
    pub conversation: Conversation,
}

/// Streaming chat client.
///
/// Holds the shared HTTP connection pool; everything else is per-request.
/// Concurrent requests are fully independent: each gets its own response
/// handle and its own normalizer instance.
#[derive(Debug, Clone, Default)]
pub struct AskClient {
    http: reqwest::Client,
}

impl AskClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Use a caller-supplied HTTP client (custom pool, proxy or timeout
    /// policy; timeouts are deliberately not configured here).
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Issue the provider-specific request and return the raw, un-decoded
    /// response.
    ///
    /// Fails with [`ChatError::Configuration`] before any network I/O for an
    /// unknown or disabled provider or a missing required credential, and
    /// with [`ChatError::Network`] when the transport cannot reach the
    /// provider. The response body is not inspected here.
    pub async fn invoke(
        &self,
        provider_id: &str,
        config: &ProviderConfig,
        conversation: &Conversation,
    ) -> Result<reqwest::Response, ChatError> {
        let kind = ProviderKind::parse(provider_id).ok_or_else(|| {
            ChatError::Configuration(format!("unknown provider '{provider_id}'"))
        })?;
        if !config.enabled {
            return Err(ChatError::Configuration(format!(
                "provider '{provider_id}' is disabled"
            )));
        }

        let request = providers::build_request(kind, &self.http, config, conversation)?;
        debug!(provider = provider_id, model = %config.model, "dispatching streaming chat request");
        let response = request
            .send()
            .await
            .map_err(|e| ChatError::Network(format!("request to '{provider_id}' failed: {e}")))?;
        Ok(response)
    }

    /// Ask a question and stream the answer.
    ///
    /// A failed initial response status is surfaced as a request-level
    /// rejection, before any event is emitted; afterwards all failures arrive
    /// as the stream's terminal item. Dropping the returned stream cancels
    /// the request and closes the underlying connection.
    pub async fn ask(&self, request: &AskRequest) -> Result<AnswerStream, ChatError> {
        let kind = ProviderKind::parse(&request.provider).ok_or_else(|| {
            ChatError::Configuration(format!("unknown provider '{}'", request.provider))
        })?;

        let response = self
            .invoke(&request.provider, &request.config, &request.conversation)
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(ChatError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(streaming::normalize_response(kind, response))
    }
}

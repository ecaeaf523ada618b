//! Error handling for pagetalk.
//!
//! One crate-level error enum shared by the provider adapters, the stream
//! normalizer and the client facade. Adapter-level failures (`Configuration`,
//! `Network`, `Http`) abort a request before any event is emitted; `Stream`
//! failures terminate an already-running event sequence.

/// Errors produced while dispatching a chat request or decoding its response
/// stream.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChatError {
    /// The request cannot be built from the supplied configuration: unknown
    /// provider identifier, disabled provider, or a missing required
    /// credential. Raised before any network I/O and never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure reaching the provider (DNS, connect, TLS,
    /// request write).
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered the initial request with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code of the initial response.
        status: u16,
        /// Response body, read for diagnostics.
        message: String,
    },

    /// The response stream failed after it was opened: the transport aborted
    /// before the provider's terminator, or decoding failed persistently.
    #[error("Stream error: {0}")]
    Stream(String),

    /// JSON (de)serialization failure outside the per-record tolerance path.
    #[error("JSON error: {0}")]
    Json(String),
}

impl ChatError {
    /// Whether the error was raised before the provider was contacted.
    ///
    /// Pre-network errors are surfaced to callers as request rejections;
    /// everything else may arrive as the terminal item of an event stream.
    pub fn is_pre_network(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

//! pagetalk — streaming question answering over web page content.
//!
//! A client application supplies a question, page context and conversation
//! history plus a provider selection; pagetalk issues the provider-specific
//! HTTP request and normalizes that provider's proprietary incremental
//! response encoding into one uniform token stream, so callers never see the
//! wire-level differences between backends.
//!
//! Supported backend families: OpenAI-compatible (hosted or local no-auth),
//! Anthropic, and Gemini.
//!
//! # Example
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use pagetalk::{AnswerEvent, AskClient, AskRequest};
//!
//! # async fn example() -> Result<(), pagetalk::ChatError> {
//! let request: AskRequest = serde_json::from_str(
//!     r#"{
//!         "provider": "anthropic",
//!         "config": {
//!             "base_url": "https://api.anthropic.com/v1",
//!             "api_key": "sk-ant-...",
//!             "model": "claude-sonnet-4-5"
//!         },
//!         "conversation": [{"role": "user", "content": "Summarize this page."}]
//!     }"#,
//! )
//! .expect("valid request");
//!
//! let client = AskClient::new();
//! let mut answer = client.ask(&request).await?;
//! while let Some(event) = answer.next().await {
//!     match event? {
//!         AnswerEvent::Delta { text } => print!("{text}"),
//!         AnswerEvent::Done => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod providers;
pub mod streaming;
pub mod types;

pub use client::{AskClient, AskRequest};
pub use error::ChatError;
pub use streaming::{
    AnswerEvent, AnswerStream, MAX_CONSECUTIVE_DECODE_FAILURES, SSE_DONE_RECORD, SseByteStream,
    encode_sse_record, encode_sse_stream, normalize_bytes, normalize_response,
};
pub use types::{Conversation, Message, MessageRole, ProviderConfig, ProviderKind};

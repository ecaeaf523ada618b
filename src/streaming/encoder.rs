//! Relay encoding: answer events back out as SSE records.
//!
//! The core hands its event sequence to an external response-streaming layer
//! (an HTTP handler, typically) as pre-framed SSE bytes: one
//! `data: {"token": ...}` record per fragment, a `data: {"error": ...}`
//! record for a terminal failure, and the literal `data: [DONE]` terminator.

use crate::error::ChatError;
use crate::streaming::{AnswerEvent, AnswerStream};
use bytes::Bytes;
use futures::Stream;
use futures_util::StreamExt;
use std::pin::Pin;

/// SSE end-of-stream terminator record.
pub const SSE_DONE_RECORD: &str = "data: [DONE]\n\n";

/// Byte stream of SSE records, ready to be written to an HTTP response body.
pub type SseByteStream = Pin<Box<dyn Stream<Item = Bytes> + Send>>;

/// Encode one answer stream item as an SSE record.
pub fn encode_sse_record(item: &Result<AnswerEvent, ChatError>) -> Bytes {
    match item {
        Ok(AnswerEvent::Delta { text }) => data_record(&serde_json::json!({ "token": text })),
        Ok(AnswerEvent::Done) => Bytes::from_static(SSE_DONE_RECORD.as_bytes()),
        Err(error) => data_record(&serde_json::json!({ "error": error.to_string() })),
    }
}

/// Encode a whole answer stream as SSE record bytes.
///
/// The normalizer guarantees `Done`/`Err` are terminal, so this is a plain
/// one-to-one mapping with no buffering.
pub fn encode_sse_stream(stream: AnswerStream) -> SseByteStream {
    Box::pin(stream.map(|item| encode_sse_record(&item)))
}

fn data_record(value: &serde_json::Value) -> Bytes {
    Bytes::from(format!("data: {value}\n\n"))
}

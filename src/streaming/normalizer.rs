//! The per-request stream normalizer.
//!
//! One normalizer instance per request, single pass, no backtracking. Record
//! framing (chunk buffering, blank-line splitting, `data:` prefixes) is
//! handled by `eventsource-stream`; this module owns record decoding, the
//! decode-tolerance policy and terminal-event semantics.

use crate::error::ChatError;
use crate::providers::{anthropic, gemini, openai};
use crate::streaming::{AnswerEvent, AnswerStream, DecodedRecord};
use crate::types::ProviderKind;
use eventsource_stream::Eventsource;
use futures::Stream;
use futures_util::StreamExt;

/// How many undecodable records in a row the normalizer tolerates before the
/// stream is considered systemically broken and terminated with an error.
///
/// A single malformed record is swallowed (heartbeat noise, provider quirks);
/// a run of them means the wrong decoding strategy or a corrupted stream, and
/// silently producing an empty answer would mask that.
pub const MAX_CONSECUTIVE_DECODE_FAILURES: usize = 8;

/// Record-decoding strategy, one variant per wire-protocol family.
///
/// Selected once when the stream is opened and held for the life of the
/// request; records are never re-dispatched per provider name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordDecoder {
    /// OpenAI-compatible chat completion chunks, `[DONE]`-terminated.
    OpenAi,
    /// Anthropic typed events; only `content_block_delta` carries text.
    Anthropic,
    /// Gemini candidate chunks.
    Gemini,
}

impl RecordDecoder {
    pub(crate) fn for_provider(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::OpenAi | ProviderKind::Local => Self::OpenAi,
            ProviderKind::Anthropic => Self::Anthropic,
            ProviderKind::Gemini => Self::Gemini,
        }
    }

    fn decode(self, data: &str) -> Result<DecodedRecord, serde_json::Error> {
        match self {
            Self::OpenAi => openai::decode_record(data),
            Self::Anthropic => anthropic::decode_record(data),
            Self::Gemini => gemini::decode_record(data),
        }
    }
}

/// Normalize a successful streaming HTTP response into an [`AnswerStream`].
///
/// The response must already have a success status; status handling belongs
/// to the caller (see `AskClient::ask`), which rejects failed requests before
/// any event is emitted.
pub fn normalize_response(kind: ProviderKind, response: reqwest::Response) -> AnswerStream {
    normalize_bytes(kind, response.bytes_stream())
}

/// Normalize a raw byte stream of SSE records into an [`AnswerStream`].
///
/// This is the seam the fixture tests drive: bytes may arrive split at
/// arbitrary boundaries, including mid-record, and the emitted event sequence
/// is identical regardless of how they were chunked.
///
/// Termination rules:
/// - the provider's explicit terminator record, or clean exhaustion of the
///   byte source, yields `Done`;
/// - a transport error item (abrupt close) yields the terminal `Err`,
///   after every fragment decoded so far has been emitted;
/// - [`MAX_CONSECUTIVE_DECODE_FAILURES`] undecodable records in a row yield
///   the terminal `Err` (see the constant for why).
pub fn normalize_bytes<S, B, E>(kind: ProviderKind, bytes: S) -> AnswerStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let decoder = RecordDecoder::for_provider(kind);

    Box::pin(async_stream::stream! {
        let mut records = Box::pin(bytes.eventsource());
        let mut consecutive_failures = 0usize;

        while let Some(item) = records.next().await {
            let event = match item {
                Ok(event) => event,
                Err(e) => {
                    yield Err(ChatError::Stream(format!(
                        "{kind} stream aborted before completion: {e}"
                    )));
                    return;
                }
            };

            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }

            match decoder.decode(data) {
                Ok(DecodedRecord::Done) => {
                    yield Ok(AnswerEvent::Done);
                    return;
                }
                Ok(DecodedRecord::Text(text)) => {
                    consecutive_failures = 0;
                    if !text.is_empty() {
                        tracing::trace!(provider = %kind, len = text.len(), "answer fragment");
                        yield Ok(AnswerEvent::Delta { text });
                    }
                }
                Ok(DecodedRecord::Ignore) => {
                    consecutive_failures = 0;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    tracing::warn!(
                        provider = %kind,
                        consecutive = consecutive_failures,
                        error = %e,
                        "discarding undecodable stream record"
                    );
                    if consecutive_failures >= MAX_CONSECUTIVE_DECODE_FAILURES {
                        yield Err(ChatError::Stream(format!(
                            "{kind} stream produced {consecutive_failures} undecodable records in a row; giving up"
                        )));
                        return;
                    }
                }
            }
        }

        // Natural exhaustion of the byte source.
        yield Ok(AnswerEvent::Done);
    })
}

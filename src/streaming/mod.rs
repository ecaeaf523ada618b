//! Stream normalization: provider wire streams in, uniform answer events out.
//!
//! The normalizer consumes an open SSE response body, decodes each complete
//! `data:` record with a per-provider strategy, and re-emits a single ordered
//! event sequence. The encoder does the reverse direction for the relay
//! boundary, serializing that sequence back into the SSE records the
//! front-end consumes.

mod encoder;
mod normalizer;

pub use encoder::*;
pub use normalizer::*;

use crate::error::ChatError;
use futures::Stream;
use std::pin::Pin;

/// One normalized event in an answer stream.
///
/// `Delta` carries the text extracted from exactly one decoded wire record;
/// `Done` closes the sequence. A terminal failure is the stream's `Err` item.
/// After either terminal item the stream yields nothing further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerEvent {
    /// Incremental answer text.
    Delta {
        /// The extracted text fragment, never empty.
        text: String,
    },
    /// The provider finished cleanly.
    Done,
}

/// Lazy, forward-only, non-restartable answer sequence.
///
/// Exactly one reader; dropping the stream releases the underlying HTTP
/// response and closes its connection.
pub type AnswerStream = Pin<Box<dyn Stream<Item = Result<AnswerEvent, ChatError>> + Send>>;

/// Result of decoding one complete wire record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DecodedRecord {
    /// The record carried answer text (possibly empty; empty text is
    /// filtered before emission).
    Text(String),
    /// The record is the provider's explicit end-of-stream terminator.
    Done,
    /// Heartbeat, metadata or other non-content record. Not an error.
    Ignore,
}

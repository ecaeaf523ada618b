//! Chat message types and conversation assembly.

use serde::{Deserialize, Serialize};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
}

/// A single role-tagged text message.
///
/// Serializes to the `{"role": ..., "content": ...}` shape used verbatim by
/// OpenAI-compatible backends; the other adapters remap it on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// An ordered, immutable list of messages sent to a provider for one request.
///
/// A conversation is built once, owned by the request that built it, and never
/// mutated afterwards. Adapters only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Wrap an already-ordered message list.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Assemble the per-request conversation: active system instruction
    /// first, then the newest `max_history` history entries (oldest dropped),
    /// then the combined page-context-plus-question text as the final user
    /// message.
    pub fn assemble(
        system_prompt: &str,
        history: &[Message],
        page_context: &str,
        question: &str,
        max_history: usize,
    ) -> Self {
        let mut messages = Vec::with_capacity(history.len().min(max_history) + 2);
        if !system_prompt.trim().is_empty() {
            messages.push(Message::system(system_prompt));
        }
        let start = history.len().saturating_sub(max_history);
        messages.extend_from_slice(&history[start..]);
        messages.push(Message::user(combine_context_and_question(
            page_context,
            question,
        )));
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

fn combine_context_and_question(page_context: &str, question: &str) -> String {
    if page_context.trim().is_empty() {
        return question.to_string();
    }
    format!("Page content:\n{page_context}\n\nQuestion: {question}")
}

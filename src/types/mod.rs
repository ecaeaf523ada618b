//! Core data types: messages, conversations and provider configuration.

mod chat;
mod config;

pub use chat::*;
pub use config::*;

//! Provider identifiers and per-provider configuration snapshots.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// The backends the client can be pointed at, keyed by logical identifier.
///
/// `OpenAi` and `Local` share one wire protocol (OpenAI-compatible chat
/// completions); `Local` targets a no-auth backend such as an Ollama or
/// LM Studio endpoint and is the only variant that does not require a
/// credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Local,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// Resolve a logical provider identifier. Unknown identifiers are a
    /// configuration error at the call site.
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "openai" => Some(Self::OpenAi),
            "local" => Some(Self::Local),
            "anthropic" => Some(Self::Anthropic),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Local => "local",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }

    /// Whether a request to this backend must carry a credential.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Local)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-provider configuration snapshot.
///
/// Owned by the external configuration store; the core reads one snapshot per
/// request and never mutates it. The credential is secrecy-wrapped so it
/// cannot leak through `Debug` output or accidental serialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base endpoint URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// API key, absent for no-auth backends.
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Model name sent with each request.
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum number of output tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// System instruction text, may be empty.
    #[serde(default)]
    pub system_prompt: String,
    /// Whether this provider may be selected at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_enabled() -> bool {
    true
}

impl ProviderConfig {
    /// The configured credential, treating an empty string as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|key| !key.is_empty())
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn endpoint_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

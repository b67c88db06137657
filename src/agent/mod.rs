//! Research agents and their orchestration.
//!
//! Each agent gathers one slice of the result bundle and owns its own
//! fallback policy. The master agent sequences them.

pub mod llm;
pub mod master;
pub mod search;
pub mod synthesis;
pub mod workers;

pub use llm::{LanguageModel, OllamaChat, OpenAiChat, UnavailableModel};
pub use master::{GatherMode, LogReporter, MasterAgent, ProgressReporter, Stage};
pub use search::{DuckDuckGoSearch, OfflineSearch, SearchEngine};

/// Failure of an external collaborator (language model or web search).
///
/// Callers never propagate these past the agent that caught them; every
/// variant collapses to the same fallback value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("collaborator is disabled")]
    Disabled,

    #[error("no API key configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("empty response")]
    EmptyResponse,
}

impl AgentError {
    /// Classify a transport error from `reqwest`.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_seconds: u64) -> Self {
        if err.is_timeout() {
            AgentError::Timeout(timeout_seconds)
        } else {
            AgentError::Http(err.to_string())
        }
    }
}

//! Language-model clients.
//!
//! The synthesis step talks to a [`LanguageModel`]: a two-message prompt
//! goes in, a completion string comes out. Implementations:
//! - [`OpenAiChat`]: OpenAI-compatible `/chat/completions`
//! - [`OllamaChat`]: local Ollama `/api/chat`
//! - [`UnavailableModel`]: always fails, used when no credential is present

use super::AgentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// A system instruction plus one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: "system".to_string(),
                content: self.system.clone(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: self.user.clone(),
            },
        ]
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Human-readable model identifier for logs and report metadata.
    fn name(&self) -> &str;

    /// Run the prompt and return the completion text.
    async fn complete(&self, prompt: &Prompt) -> Result<String, AgentError>;
}

/// Message in a chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

fn build_http_client(timeout_seconds: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AgentError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(AgentError::Status { status, body })
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

/// Configuration for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model_name: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model_name: "gpt-4o-mini".to_string(),
            api_key: String::new(),
            temperature: 0.7,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat client for OpenAI-compatible APIs.
pub struct OpenAiChat {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiChat {
    pub fn new(config: OpenAiConfig) -> Self {
        info!(
            "Initializing OpenAI client with model {} at {}",
            config.model_name, config.base_url
        );
        let http_client = build_http_client(config.timeout_seconds);
        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    fn name(&self) -> &str {
        &self.config.model_name
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, AgentError> {
        let request = OpenAiRequest {
            model: self.config.model_name.clone(),
            messages: prompt.messages(),
            temperature: self.config.temperature,
        };

        debug!("Sending chat completion request to {}", self.endpoint());

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::from_reqwest(e, self.config.timeout_seconds))?;

        let body: OpenAiResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AgentError::EmptyResponse)
    }
}

// ---------------------------------------------------------------------------
// Ollama
// ---------------------------------------------------------------------------

/// Configuration for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub ollama_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: "llama3.2:latest".to_string(),
            temperature: 0.7,
            timeout_seconds: 300,
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

/// Chat client for a local Ollama server.
pub struct OllamaChat {
    config: OllamaConfig,
    http_client: reqwest::Client,
}

impl OllamaChat {
    pub fn new(config: OllamaConfig) -> Self {
        info!(
            "Initializing Ollama client with model {} at {}",
            config.model_name, config.ollama_url
        );
        let http_client = build_http_client(config.timeout_seconds);
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaChat {
    fn name(&self) -> &str {
        &self.config.model_name
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, AgentError> {
        let url = format!("{}/api/chat", self.config.ollama_url.trim_end_matches('/'));

        let request = OllamaChatRequest {
            model: self.config.model_name.clone(),
            messages: prompt.messages(),
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AgentError::Http(format!(
                        "Cannot connect to Ollama at {}",
                        self.config.ollama_url
                    ))
                } else {
                    AgentError::from_reqwest(e, self.config.timeout_seconds)
                }
            })?;

        let chat_response: OllamaChatResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;

        Ok(chat_response.message.content)
    }
}

// ---------------------------------------------------------------------------
// Unavailable
// ---------------------------------------------------------------------------

/// A model that is never reachable. Forces the templated summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableModel;

#[async_trait]
impl LanguageModel for UnavailableModel {
    fn name(&self) -> &str {
        "none"
    }

    async fn complete(&self, _prompt: &Prompt) -> Result<String, AgentError> {
        Err(AgentError::MissingCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_messages() {
        let prompt = Prompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };
        let messages = prompt.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "sys");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "usr");
    }

    #[test]
    fn test_unavailable_model_fails() {
        let prompt = Prompt {
            system: String::new(),
            user: String::new(),
        };
        let result = tokio_test::block_on(UnavailableModel.complete(&prompt));
        assert_eq!(result, Err(AgentError::MissingCredential));
    }

    #[test]
    fn test_openai_endpoint() {
        let client = OpenAiChat::new(OpenAiConfig {
            base_url: "https://example.test/v1/".to_string(),
            ..OpenAiConfig::default()
        });
        assert_eq!(client.endpoint(), "https://example.test/v1/chat/completions");
        assert_eq!(client.name(), "gpt-4o-mini");
    }

    #[test]
    fn test_openai_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Looks promising."}}]}"#;
        let parsed: OpenAiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Looks promising.")
        );
    }

    #[tokio::test]
    async fn test_ollama_unreachable_is_error() {
        let client = OllamaChat::new(OllamaConfig {
            ollama_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 2,
            ..OllamaConfig::default()
        });
        let prompt = Prompt {
            system: "s".to_string(),
            user: "u".to_string(),
        };
        assert!(client.complete(&prompt).await.is_err());
    }
}

//! Web search collaborators.
//!
//! A [`SearchEngine`] takes one free-text query and returns free text.
//! Empty answers are reported as failures so that callers can substitute
//! their own placeholder.

use super::AgentError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// A free-text web search backend.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, AgentError>;
}

/// Settings for the DuckDuckGo Instant Answer API.
#[derive(Debug, Clone)]
pub struct DuckDuckGoConfig {
    pub endpoint: String,
    pub max_results: usize,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.duckduckgo.com/".to_string(),
            max_results: 5,
            timeout_seconds: 15,
            user_agent: format!("PharmaGen/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Search backed by DuckDuckGo instant answers (no API key required).
pub struct DuckDuckGoSearch {
    config: DuckDuckGoConfig,
    http_client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(config: DuckDuckGoConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl SearchEngine for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<String, AgentError> {
        debug!("Searching DuckDuckGo for: {}", query);

        let response = self
            .http_client
            .get(&self.config.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| AgentError::from_reqwest(e, self.config.timeout_seconds))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status { status, body });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;

        extract_answer(&body, self.config.max_results).ok_or(AgentError::EmptyResponse)
    }
}

/// Flatten an instant-answer payload into readable text.
///
/// Returns `None` when the payload carries no abstract and no topics.
fn extract_answer(body: &Value, max_results: usize) -> Option<String> {
    let mut results = Vec::new();

    if let Some(abstract_text) = body.get("AbstractText").and_then(|v| v.as_str()) {
        if !abstract_text.trim().is_empty() {
            let source = body
                .get("AbstractSource")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown");
            results.push(format!("[{}] {}", source, abstract_text.trim()));
        }
    }

    for key in ["RelatedTopics", "Results"] {
        let Some(entries) = body.get(key).and_then(|v| v.as_array()) else {
            continue;
        };
        for entry in entries {
            if results.len() >= max_results {
                break;
            }
            if let Some(text) = entry.get("Text").and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    results.push(text.trim().to_string());
                }
            }
        }
    }

    if results.is_empty() {
        None
    } else {
        Some(results.join("\n"))
    }
}

/// A search engine that is switched off. Every query fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSearch;

#[async_trait]
impl SearchEngine for OfflineSearch {
    async fn search(&self, _query: &str) -> Result<String, AgentError> {
        Err(AgentError::Disabled)
    }
}

//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.pharmagen.toml` files. API keys are never read from or written to
//! the config file.

use crate::cli::{Args, OutputFormat, Provider};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".pharmagen.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Language-model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Web search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory the report is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Run the web lookups concurrently.
    #[serde(default)]
    pub concurrent: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            concurrent: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Language-model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Backend to use.
    #[serde(default)]
    pub provider: Provider,

    /// Model name. Defaults depend on the provider when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// API base URL. Defaults depend on the provider when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            name: None,
            base_url: None,
            temperature: default_temperature(),
            timeout_seconds: default_model_timeout(),
        }
    }
}

impl ModelConfig {
    /// Model name, falling back to the provider default.
    pub fn effective_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| match self.provider {
            Provider::OpenAi => "gpt-4o-mini".to_string(),
            Provider::Ollama => "llama3.2:latest".to_string(),
        })
    }

    /// Base URL, falling back to the provider default.
    pub fn effective_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| match self.provider {
            Provider::OpenAi => "https://api.openai.com/v1".to_string(),
            Provider::Ollama => "http://localhost:11434".to_string(),
        })
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_model_timeout() -> u64 {
    60
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Disable to always use the simulated results.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Instant-answer API endpoint.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Maximum snippets kept per lookup.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_search_timeout")]
    pub timeout_seconds: u64,

    /// User agent sent with search requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_search_endpoint(),
            max_results: default_max_results(),
            timeout_seconds: default_search_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_search_endpoint() -> String {
    "https://api.duckduckgo.com/".to_string()
}

fn default_max_results() -> usize {
    5
}

fn default_search_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("PharmaGen/{}", env!("CARGO_PKG_VERSION"))
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Characters kept from science and clinical text.
    #[serde(default = "default_truncate_chars")]
    pub truncate_chars: usize,

    /// Directory containing the PDF font files.
    #[serde(default = "default_font_dir")]
    pub font_dir: PathBuf,

    /// Font family name (`{family}-Regular.ttf` etc.).
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            truncate_chars: default_truncate_chars(),
            font_dir: default_font_dir(),
            font_family: default_font_family(),
        }
    }
}

fn default_truncate_chars() -> usize {
    crate::report::DEFAULT_TRUNCATE_CHARS
}

fn default_font_dir() -> PathBuf {
    PathBuf::from("/usr/share/fonts/truetype/liberation")
}

fn default_font_family() -> String {
    "LiberationSans".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(provider) = args.provider {
            self.model.provider = provider;
        }
        if let Some(ref model) = args.model {
            self.model.name = Some(model.clone());
        }
        if let Some(ref base_url) = args.base_url {
            self.model.base_url = Some(base_url.clone());
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
            self.search.timeout_seconds = timeout;
        }

        if args.offline {
            self.search.enabled = false;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(truncate) = args.truncate {
            self.report.truncate_chars = truncate;
        }

        if let Some(ref output_dir) = args.output_dir {
            self.general.output_dir = output_dir.clone();
        }
        if args.concurrent {
            self.general.concurrent = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

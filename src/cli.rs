//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// PharmaGen - end-to-end drug repurposing research
///
/// Gathers market, trade, scientific, clinical and patent intelligence
/// for a candidate molecule and target indication, synthesizes a
/// strategy summary with an LLM, and renders a PDF report.
///
/// Examples:
///   pharmagen
///   pharmagen --drug Sildenafil --disease "Pulmonary Hypertension"
///   pharmagen --provider ollama --model llama3.2:latest
///   pharmagen --offline --format markdown
///   pharmagen --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Candidate molecule
    #[arg(short, long, default_value = "Metformin")]
    pub drug: String,

    /// Target indication
    #[arg(short = 'i', long, default_value = "Neurological Disorders")]
    pub disease: String,

    /// API key for the OpenAI provider
    ///
    /// Without a key the summary is produced from the built-in template.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Language-model backend
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<Provider>,

    /// Model name (default: gpt-4o-mini for openai, llama3.2:latest for ollama)
    #[arg(short, long, env = "PHARMAGEN_MODEL")]
    pub model: Option<String>,

    /// Base URL of the language-model API
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory the report is written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format (pdf, markdown, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Skip live web search and use simulated results
    #[arg(long)]
    pub offline: bool,

    /// Run the scientific and clinical lookups concurrently
    #[arg(long)]
    pub concurrent: bool,

    /// Characters kept from scientific and clinical text in the report
    #[arg(long, value_name = "CHARS")]
    pub truncate: Option<usize>,

    /// Request timeout in seconds for model and search calls
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .pharmagen.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .pharmagen.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PDF document (default)
    #[default]
    Pdf,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

/// Language-model backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI-compatible chat completions (requires an API key)
    #[default]
    #[value(name = "openai")]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The API key, if one was given and is not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.drug.trim().is_empty() {
            return Err("Drug name must not be empty".to_string());
        }

        if self.disease.trim().is_empty() {
            return Err("Disease name must not be empty".to_string());
        }

        // Validate base URL format
        if let Some(ref url) = self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(truncate) = self.truncate {
            if truncate == 0 {
                return Err("Truncate length must be at least 1 character".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

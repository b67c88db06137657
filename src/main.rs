//! PharmaGen - AI-assisted drug repurposing research
//!
//! A CLI that orchestrates market, trade, scientific, clinical and
//! patent agents for a candidate molecule, synthesizes a strategy
//! summary with an LLM (or a template when none is reachable), and
//! writes a PDF, Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, rendering, output)

mod agent;
mod cli;
mod config;
mod models;
mod progress;
mod providers;
mod report;

use agent::llm::{OllamaConfig, OpenAiConfig};
use agent::search::DuckDuckGoConfig;
use agent::{
    DuckDuckGoSearch, GatherMode, LanguageModel, LogReporter, MasterAgent, OfflineSearch,
    OllamaChat, OpenAiChat, ProgressReporter, SearchEngine, UnavailableModel,
};
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat, Provider};
use config::{Config, CONFIG_FILE_NAME};
use models::{Report, ReportMetadata, ResearchQuery, ResultBundle, SummarySource};
use progress::SpinnerReporter;
use report::layout::truncate_with_ellipsis;
use report::RenderOptions;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Characters of scientific evidence echoed to the terminal.
const PREVIEW_CHARS: usize = 500;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("PharmaGen v{}", env!("CARGO_PKG_VERSION"));
    debug!("Drug: {}, Disease: {}", args.drug, args.disease);

    if let Err(e) = run_research(args).await {
        error!("Research run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .pharmagen.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the model, search and report settings.");
    println!("   The API key is read from --api-key or OPENAI_API_KEY only.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete research workflow and write the report.
async fn run_research(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let query = ResearchQuery::new(args.drug.clone(), args.disease.clone());

    // Step 1: Choose collaborators
    let model = build_language_model(&config, args.api_key());
    let search = build_search_engine(&config);

    println!("🚀 Launching agent swarm for {}", query);
    println!("   Model: {} ({:?})", model.name(), config.model.provider);
    println!(
        "   Web search: {}",
        if config.search.enabled {
            config.search.endpoint.as_str()
        } else {
            "offline (simulated results)"
        }
    );
    println!();

    // Step 2: Orchestrate
    let reporter: Box<dyn ProgressReporter> = if args.quiet {
        Box::new(LogReporter)
    } else {
        Box::new(SpinnerReporter::new())
    };
    let mode = if config.general.concurrent {
        GatherMode::Concurrent
    } else {
        GatherMode::Sequential
    };

    let mut master = MasterAgent::new(search)
        .with_reporter(reporter)
        .with_mode(mode);
    let bundle = master.run(model.as_ref(), &query).await;
    drop(master);

    if !args.quiet {
        print_results(&bundle);
    }

    // Step 3: Render
    let report = Report {
        metadata: ReportMetadata {
            query: query.clone(),
            generated_at: Utc::now(),
            model_used: model.name().to_string(),
            summary_source: bundle.summary_source,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        findings: bundle,
    };

    let (bytes, filename) = render_report(&report, &config)?;

    // Step 4: Deliver
    let output_dir = &config.general.output_dir;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let output_path = output_dir.join(&filename);
    std::fs::write(&output_path, &bytes)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    println!(
        "\n📄 Strategic report saved to: {} ({} bytes)",
        output_path.display(),
        bytes.len()
    );
    println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Produce the report bytes and file name for the configured format.
fn render_report(report: &Report, config: &Config) -> Result<(Vec<u8>, String)> {
    let query = &report.metadata.query;

    match config.report.format {
        OutputFormat::Pdf => {
            let options = RenderOptions {
                truncate_chars: config.report.truncate_chars,
                font_dir: config.report.font_dir.clone(),
                font_family: config.report.font_family.clone(),
            };
            let rendered = report::render(&query.drug, &query.disease, &report.findings, &options)
                .context("Failed to render PDF report")?;
            Ok((rendered.bytes, rendered.filename))
        }
        OutputFormat::Markdown => {
            let markdown =
                report::generate_markdown_report(report, config.report.truncate_chars);
            let filename = report::text_report_filename(report, OutputFormat::Markdown.extension());
            Ok((markdown.into_bytes(), filename))
        }
        OutputFormat::Json => {
            let json = report::generate_json_report(report)?;
            let filename = report::text_report_filename(report, OutputFormat::Json.extension());
            Ok((json.into_bytes(), filename))
        }
    }
}

/// Print the bundle the way the dashboard tabs group it.
fn print_results(bundle: &ResultBundle) {
    println!("\n✅ Analysis Generated");

    if bundle.summary_source == SummarySource::Fallback {
        println!("   (summary produced in simulation mode)");
    }

    println!("\n━━━ Strategy ━━━\n");
    println!("### Executive Summary\n");
    println!("{}", bundle.summary);

    println!("\n━━━ Market Data ━━━\n");
    println!("#### IQVIA Market Insights");
    println!("   Source: {}", bundle.market.source);
    println!("   Global market size: {}", bundle.market.market_size_global);
    println!("   5-year CAGR: {}", bundle.market.cagr_5yr);
    println!("   Top competitor: {}", bundle.market.top_competitor);
    println!("   Saturation: {}", bundle.market.market_saturation);
    println!("\n#### EXIM Supply Chain");
    println!("   Source: {}", bundle.trade.source);
    println!("   Major exporter: {}", bundle.trade.major_exporter);
    println!("   Major importer: {}", bundle.trade.major_importer);
    println!("   API price trend: {}", bundle.trade.api_price_trend);
    println!("   Supply chain risk: {}", bundle.trade.supply_chain_risk);

    println!("\n━━━ Clinical & IP ━━━\n");
    println!("#### Patent Landscape");
    println!("   Status: {}", bundle.patent.status);
    println!("   Primary patent expiry: {}", bundle.patent.primary_patent_expiry);
    println!("   Freedom to operate: {}", bundle.patent.freedom_to_operate);
    println!("   Recent filings: {}", bundle.patent.recent_filings);
    println!("\n#### Scientific Evidence");
    println!("{}", truncate_with_ellipsis(&bundle.science, PREVIEW_CHARS));
    println!("\n#### Clinical Trials");
    println!("{}", truncate_with_ellipsis(&bundle.clinical, PREVIEW_CHARS));
}

/// Pick the language-model client.
///
/// The OpenAI provider without a key gets [`UnavailableModel`], which
/// routes synthesis to the template.
fn build_language_model(config: &Config, api_key: Option<&str>) -> Box<dyn LanguageModel> {
    let model = &config.model;

    match model.provider {
        Provider::OpenAi => match api_key {
            Some(key) => Box::new(OpenAiChat::new(OpenAiConfig {
                base_url: model.effective_base_url(),
                model_name: model.effective_name(),
                api_key: key.to_string(),
                temperature: model.temperature,
                timeout_seconds: model.timeout_seconds,
            })),
            None => {
                warn!("No OpenAI API key supplied; the summary will use simulation mode");
                Box::new(UnavailableModel)
            }
        },
        Provider::Ollama => Box::new(OllamaChat::new(OllamaConfig {
            ollama_url: model.effective_base_url(),
            model_name: model.effective_name(),
            temperature: model.temperature,
            timeout_seconds: model.timeout_seconds,
        })),
    }
}

/// Pick the web search backend.
fn build_search_engine(config: &Config) -> Box<dyn SearchEngine> {
    if !config.search.enabled {
        info!("Web search disabled; using simulated results");
        return Box::new(OfflineSearch);
    }

    Box::new(DuckDuckGoSearch::new(DuckDuckGoConfig {
        endpoint: config.search.endpoint.clone(),
        max_results: config.search.max_results,
        timeout_seconds: config.search.timeout_seconds,
        user_agent: config.search.user_agent.clone(),
    }))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_from_dir(Path::new(".")) {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    fn offline_config() -> Config {
        let mut config = Config::default();
        config.search.enabled = false;
        config
    }

    #[test]
    fn test_missing_key_selects_unavailable_model() {
        let model = build_language_model(&Config::default(), None);
        assert_eq!(model.name(), "none");

        let model = build_language_model(&Config::default(), Some("sk-test"));
        assert_eq!(model.name(), "gpt-4o-mini");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let mut config = Config::default();
        config.model.provider = Provider::Ollama;
        let model = build_language_model(&config, None);
        assert_eq!(model.name(), "llama3.2:latest");
    }

    #[tokio::test]
    async fn test_offline_pipeline_to_markdown() {
        let mut config = offline_config();
        config.report.format = OutputFormat::Markdown;

        let model = build_language_model(&config, None);
        let mut master = MasterAgent::new(build_search_engine(&config));
        let query = ResearchQuery::new("Metformin", "Neurological Disorders");
        let bundle = master.run(model.as_ref(), &query).await;

        let report = Report {
            metadata: ReportMetadata {
                query,
                generated_at: Utc::now(),
                model_used: model.name().to_string(),
                summary_source: bundle.summary_source,
                duration_seconds: 0.1,
            },
            findings: bundle,
        };

        let (bytes, filename) = render_report(&report, &config).unwrap();
        let markdown = String::from_utf8(bytes).unwrap();

        assert_eq!(filename, "Metformin_Neurological Disorders_Report.md");
        assert!(markdown.contains("STRATEGIC VERDICT: HIGH POTENTIAL."));
        assert!(markdown.contains("Simulated: 3 Active Phase II trials"));
    }

    #[test]
    fn test_load_config_with_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[search]\nenabled = false\n").unwrap();

        let mut args = make_args();
        args.config = Some(path);
        let config = load_config(&args).unwrap();
        assert!(!config.search.enabled);
    }
}

//! Master agent: orchestrates the research workflow.
//!
//! Order is fixed: market, trade, science, clinical, patent, synthesis.
//! Every step yields a value (real or substituted), so [`MasterAgent::run`]
//! always returns a complete [`ResultBundle`].

use super::llm::LanguageModel;
use super::search::SearchEngine;
use super::synthesis::synthesize;
use super::workers::{check_patent, fetch_clinical, fetch_science};
use crate::models::{ResearchQuery, ResultBundle};
use crate::providers::{query_market, query_trade};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use tracing::{debug, info};

/// A step of the workflow, announced before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Market,
    Trade,
    Science,
    Clinical,
    Patent,
    Synthesis,
    Complete,
}

impl Stage {
    pub fn emoji(&self) -> &'static str {
        match self {
            Stage::Market => "📊",
            Stage::Trade => "🚢",
            Stage::Science => "🧬",
            Stage::Clinical => "🏥",
            Stage::Patent => "⚖️",
            Stage::Synthesis | Stage::Complete => "✅",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Stage::Market => "Connecting to IQVIA Global Database...",
            Stage::Trade => "Connecting to EXIM Trade Server...",
            Stage::Science => "Web Agent: Scanning Medical Journals...",
            Stage::Clinical => "Clinical Agent: Querying ClinicalTrials.gov...",
            Stage::Patent => "Patent Agent: Checking USPTO status...",
            Stage::Synthesis => "Data Collection Complete! Synthesizing...",
            Stage::Complete => "Analysis Complete!",
        };
        write!(f, "{}", message)
    }
}

/// Receives progress narration from the master agent.
pub trait ProgressReporter: Send + Sync {
    /// A workflow step is about to start.
    fn stage(&self, stage: Stage);

    /// A non-fatal advisory for the user.
    fn warn(&self, message: &str);
}

/// Narrates through `tracing` only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn stage(&self, stage: Stage) {
        info!("{}", stage);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// How the two web lookups are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatherMode {
    /// One step after another, in narration order.
    #[default]
    Sequential,
    /// Science and clinical lookups run as joined futures.
    Concurrent,
}

/// The orchestrator.
pub struct MasterAgent<R: Rng = StdRng> {
    search: Box<dyn SearchEngine>,
    reporter: Box<dyn ProgressReporter>,
    rng: R,
    mode: GatherMode,
}

impl MasterAgent<StdRng> {
    /// Create an agent with an entropy-seeded RNG and log-only narration.
    pub fn new(search: Box<dyn SearchEngine>) -> Self {
        Self::with_rng(search, StdRng::from_entropy())
    }
}

impl<R: Rng + Send> MasterAgent<R> {
    /// Create an agent drawing mock market data from `rng`.
    pub fn with_rng(search: Box<dyn SearchEngine>, rng: R) -> Self {
        Self {
            search,
            reporter: Box::new(LogReporter),
            rng,
            mode: GatherMode::default(),
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_mode(mut self, mode: GatherMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run the full workflow for one query.
    pub async fn run(&mut self, model: &dyn LanguageModel, query: &ResearchQuery) -> ResultBundle {
        info!("Master agent orchestrating workflow for {}", query);
        let drug = query.drug.as_str();
        let disease = query.disease.as_str();

        self.reporter.stage(Stage::Market);
        let market = query_market(&mut self.rng, drug, disease);

        self.reporter.stage(Stage::Trade);
        let trade = query_trade(drug);

        let (science, clinical) = match self.mode {
            GatherMode::Sequential => {
                self.reporter.stage(Stage::Science);
                let science = fetch_science(self.search.as_ref(), drug, disease).await;

                self.reporter.stage(Stage::Clinical);
                let clinical = fetch_clinical(self.search.as_ref(), drug, disease).await;

                (science, clinical)
            }
            GatherMode::Concurrent => {
                self.reporter.stage(Stage::Science);
                self.reporter.stage(Stage::Clinical);
                futures::join!(
                    fetch_science(self.search.as_ref(), drug, disease),
                    fetch_clinical(self.search.as_ref(), drug, disease)
                )
            }
        };

        self.reporter.stage(Stage::Patent);
        let patent = check_patent(drug);

        self.reporter.stage(Stage::Synthesis);
        let synthesis = synthesize(model, drug, disease, &market, &science, &patent).await;
        if synthesis.failure.is_some() {
            self.reporter
                .warn("Language model unavailable. Switching to Simulation Mode.");
        }

        self.reporter.stage(Stage::Complete);
        debug!("Summary source: {:?}", synthesis.source);

        ResultBundle {
            summary: synthesis.text,
            market,
            trade,
            science,
            clinical,
            patent,
            summary_source: synthesis.source,
        }
    }
}

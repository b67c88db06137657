//! Data models for the research pipeline.
//!
//! This module contains the records produced by each agent and the
//! aggregated result bundle handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inputs to a single orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchQuery {
    /// Candidate molecule (e.g. "Metformin").
    pub drug: String,
    /// Target indication (e.g. "Neurological Disorders").
    pub disease: String,
}

impl ResearchQuery {
    pub fn new(drug: impl Into<String>, disease: impl Into<String>) -> Self {
        Self {
            drug: drug.into(),
            disease: disease.into(),
        }
    }
}

impl fmt::Display for ResearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}", self.drug, self.disease)
    }
}

/// Market intelligence snapshot from the market-data vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub source: String,
    /// Formatted as `$<n> Billion`.
    pub market_size_global: String,
    /// Formatted as `<x>%`.
    pub cagr_5yr: String,
    pub top_competitor: String,
    pub market_saturation: String,
}

/// API export/import snapshot from the trade-data vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub source: String,
    pub major_exporter: String,
    pub major_importer: String,
    pub api_price_trend: String,
    pub supply_chain_risk: String,
}

/// Patent landscape for a molecule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentRecord {
    pub status: String,
    pub primary_patent_expiry: String,
    pub freedom_to_operate: String,
    pub recent_filings: String,
}

/// Which synthesis path produced the executive summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    /// Completion returned by the language model.
    Model,
    /// Deterministic template used after a model failure.
    #[default]
    Fallback,
}

impl fmt::Display for SummarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummarySource::Model => write!(f, "Language model"),
            SummarySource::Fallback => write!(f, "Simulation mode (template)"),
        }
    }
}

/// The complete output of one orchestration run.
///
/// Every field is always populated: failed lookups are replaced by
/// their fallback values before the bundle is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    /// Executive summary (model completion or templated fallback).
    pub summary: String,
    pub market: MarketRecord,
    pub trade: TradeRecord,
    /// Mechanism-of-action intelligence.
    pub science: String,
    /// Active clinical trial intelligence.
    pub clinical: String,
    pub patent: PatentRecord,
    #[serde(default)]
    pub summary_source: SummarySource,
}

impl ResultBundle {
    /// Returns true if every text field carries content.
    #[cfg(test)]
    pub fn is_complete(&self) -> bool {
        let market = [
            &self.market.source,
            &self.market.market_size_global,
            &self.market.cagr_5yr,
            &self.market.top_competitor,
            &self.market.market_saturation,
        ];
        let trade = [
            &self.trade.source,
            &self.trade.major_exporter,
            &self.trade.major_importer,
            &self.trade.api_price_trend,
            &self.trade.supply_chain_risk,
        ];
        let patent = [
            &self.patent.status,
            &self.patent.primary_patent_expiry,
            &self.patent.freedom_to_operate,
            &self.patent.recent_filings,
        ];

        [&self.summary, &self.science, &self.clinical]
            .into_iter()
            .chain(market)
            .chain(trade)
            .chain(patent)
            .all(|s| !s.trim().is_empty())
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// The research question that was answered.
    pub query: ResearchQuery,
    /// Date and time of the analysis.
    pub generated_at: DateTime<Utc>,
    /// Name of the language model that was configured.
    pub model_used: String,
    /// Whether the summary came from the model or the template.
    pub summary_source: SummarySource,
    /// Duration of the orchestration in seconds.
    pub duration_seconds: f64,
}

/// A result bundle together with its report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub findings: ResultBundle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::workers::check_patent;
    use crate::providers::query_trade;

    fn create_test_bundle() -> ResultBundle {
        ResultBundle {
            summary: "Summary".to_string(),
            market: MarketRecord {
                source: "IQVIA Analytics (Mock)".to_string(),
                market_size_global: "$7 Billion".to_string(),
                cagr_5yr: "4.2%".to_string(),
                top_competitor: "BigPharma Inc.".to_string(),
                market_saturation: "Medium-High".to_string(),
            },
            trade: query_trade("Metformin"),
            science: "Science".to_string(),
            clinical: "Clinical".to_string(),
            patent: check_patent("Metformin"),
            summary_source: SummarySource::Model,
        }
    }

    #[test]
    fn test_bundle_completeness() {
        let bundle = create_test_bundle();
        assert!(bundle.is_complete());

        let mut missing_science = bundle.clone();
        missing_science.science = "   ".to_string();
        assert!(!missing_science.is_complete());

        let mut missing_market = bundle;
        missing_market.market.cagr_5yr.clear();
        assert!(!missing_market.is_complete());
    }

    #[test]
    fn test_summary_source_serialization() {
        let bundle = create_test_bundle();
        let json = serde_json::to_string(&bundle).unwrap();
        assert!(json.contains("\"summary_source\":\"model\""));

        let parsed: ResultBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bundle);
    }

    #[test]
    fn test_query_display() {
        let query = ResearchQuery::new("Metformin", "Neurological Disorders");
        assert_eq!(query.to_string(), "Metformin for Neurological Disorders");
    }
}

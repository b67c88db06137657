//! Executive-summary synthesis.
//!
//! Primary path: one call to the language model. Secondary path: a
//! template filled from the records already gathered.

use super::llm::{LanguageModel, Prompt};
use super::AgentError;
use crate::models::{MarketRecord, PatentRecord, SummarySource};
use tracing::{info, warn};

/// System instruction for the strategy summary.
const STRATEGY_SYSTEM_PROMPT: &str =
    "You are a Pharma Strategy Lead. Summarize this opportunity in 150 words.";

/// Outcome of the synthesis step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub text: String,
    pub source: SummarySource,
    /// Why the model path was abandoned, if it was.
    pub failure: Option<AgentError>,
}

/// Compose the two-message strategy prompt.
pub fn build_prompt(drug: &str, disease: &str, market: &MarketRecord, science: &str) -> Prompt {
    let market_json =
        serde_json::to_string(market).unwrap_or_else(|_| format!("{:?}", market));

    Prompt {
        system: STRATEGY_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Drug: {}, Disease: {}\nMarket: {}\nScience: {}",
            drug, disease, market_json, science
        ),
    }
}

/// Templated summary used when the model is unavailable.
pub fn fallback_summary(
    drug: &str,
    disease: &str,
    market: &MarketRecord,
    patent: &PatentRecord,
) -> String {
    format!(
        "STRATEGIC VERDICT: HIGH POTENTIAL.\n\n\
         Based on the analysis, repurposing {drug} for {disease} represents a significant \
         opportunity. The mock IQVIA data indicates a market size of {size} \
         with a CAGR of {cagr}.\n\n\
         Scientific literature suggests a plausible mechanism of action. \
         Given the patent expiry in {expiry}, a 505(b)(2) regulatory pathway \
         is recommended to accelerate market entry.",
        drug = drug,
        disease = disease,
        size = market.market_size_global,
        cagr = market.cagr_5yr,
        expiry = patent.primary_patent_expiry,
    )
}

/// Ask the model for a summary, returning its completion verbatim.
///
/// A blank completion counts as a malformed response.
pub async fn request_summary(
    model: &dyn LanguageModel,
    prompt: &Prompt,
) -> Result<String, AgentError> {
    let completion = model.complete(prompt).await?;
    if completion.trim().is_empty() {
        return Err(AgentError::EmptyResponse);
    }
    Ok(completion)
}

/// Produce the executive summary. Never fails.
///
/// The model is called at most once; on any failure the template is
/// used and the reason is kept in [`Synthesis::failure`].
pub async fn synthesize(
    model: &dyn LanguageModel,
    drug: &str,
    disease: &str,
    market: &MarketRecord,
    science: &str,
    patent: &PatentRecord,
) -> Synthesis {
    let prompt = build_prompt(drug, disease, market, science);

    match request_summary(model, &prompt).await {
        Ok(text) => {
            info!("Summary generated by {}", model.name());
            Synthesis {
                text,
                source: SummarySource::Model,
                failure: None,
            }
        }
        Err(e) => {
            warn!("Language model unavailable ({}), switching to simulation mode", e);
            Synthesis {
                text: fallback_summary(drug, disease, market, patent),
                source: SummarySource::Fallback,
                failure: Some(e),
            }
        }
    }
}

//! Worker agents: scientific, clinical and patent intelligence.
//!
//! The two web agents issue a single search each and substitute a fixed
//! sentence on any failure. The patent agent is a fixed lookup.

use super::search::SearchEngine;
use super::AgentError;
use crate::models::PatentRecord;
use tracing::{debug, warn};

/// Placeholder clinical intelligence used when the search fails.
pub const CLINICAL_FALLBACK: &str =
    "Simulated: 3 Active Phase II trials found targeting neuro-inflammation.";

/// Search query for mechanism-of-action evidence.
pub fn science_query(drug: &str, disease: &str) -> String {
    format!(
        "mechanism of action of {} for {} scientific summary",
        drug, disease
    )
}

/// Search query for active trials on the ClinicalTrials.gov registry.
pub fn clinical_query(drug: &str, disease: &str) -> String {
    format!(
        "active clinical trials for {} in {} site:clinicaltrials.gov",
        drug, disease
    )
}

/// Placeholder scientific intelligence used when the search fails.
pub fn science_fallback(drug: &str, disease: &str) -> String {
    format!(
        "Simulated Web Result: Studies suggest {} activates AMPK pathways relevant to {}.",
        drug, disease
    )
}

/// Run one search. A blank answer counts as an empty response.
async fn run_search(search: &dyn SearchEngine, query: &str) -> Result<String, AgentError> {
    let text = search.search(query).await?;
    if text.trim().is_empty() {
        return Err(AgentError::EmptyResponse);
    }
    Ok(text)
}

/// Scan the literature for a mechanism of action.
pub async fn fetch_science(search: &dyn SearchEngine, drug: &str, disease: &str) -> String {
    let query = science_query(drug, disease);

    match run_search(search, &query).await {
        Ok(text) => {
            debug!("Science search returned {} bytes", text.len());
            text
        }
        Err(e) => {
            warn!("Science search failed ({}), using simulated result", e);
            science_fallback(drug, disease)
        }
    }
}

/// Look up active clinical trials.
pub async fn fetch_clinical(search: &dyn SearchEngine, drug: &str, disease: &str) -> String {
    let query = clinical_query(drug, disease);

    match run_search(search, &query).await {
        Ok(text) => {
            debug!("Clinical search returned {} bytes", text.len());
            text
        }
        Err(e) => {
            warn!("Clinical search failed ({}), using simulated result", e);
            CLINICAL_FALLBACK.to_string()
        }
    }
}

/// Check patent status. The record is fixed.
pub fn check_patent(drug: &str) -> PatentRecord {
    debug!("Checking patent status for {}", drug);

    PatentRecord {
        status: "Genericized".to_string(),
        primary_patent_expiry: "2018-05-20".to_string(),
        freedom_to_operate: "High (New Formulation Required for IP)".to_string(),
        recent_filings: "2 Competitor applications filed in 2024 for extended release."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::search::OfflineSearch;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records queries and answers each with a canned response.
    struct RecordingSearch {
        answer: Result<String, AgentError>,
        queries: Mutex<Vec<String>>,
    }

    impl RecordingSearch {
        fn new(answer: Result<String, AgentError>) -> Self {
            Self {
                answer,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchEngine for RecordingSearch {
        async fn search(&self, query: &str) -> Result<String, AgentError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.answer.clone()
        }
    }

    #[tokio::test]
    async fn test_science_success_passes_text_through() {
        let search = RecordingSearch::new(Ok("AMPK evidence".to_string()));
        let text = fetch_science(&search, "Metformin", "Alzheimer's").await;

        assert_eq!(text, "AMPK evidence");
        assert_eq!(
            search.queries.lock().unwrap().as_slice(),
            ["mechanism of action of Metformin for Alzheimer's scientific summary"]
        );
    }

    #[tokio::test]
    async fn test_clinical_success_passes_text_through() {
        let search = RecordingSearch::new(Ok("NCT0000001".to_string()));
        let text = fetch_clinical(&search, "Metformin", "Alzheimer's").await;

        assert_eq!(text, "NCT0000001");
        assert_eq!(
            search.queries.lock().unwrap().as_slice(),
            ["active clinical trials for Metformin in Alzheimer's site:clinicaltrials.gov"]
        );
    }

    #[tokio::test]
    async fn test_science_failure_substitutes_template() {
        let search = RecordingSearch::new(Err(AgentError::Timeout(10)));
        let text = fetch_science(&search, "Aspirin", "Colon Cancer").await;
        assert_eq!(
            text,
            "Simulated Web Result: Studies suggest Aspirin activates AMPK pathways relevant to Colon Cancer."
        );
        assert_eq!(search.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clinical_failure_substitutes_fixed_sentence() {
        let text = fetch_clinical(&OfflineSearch, "Aspirin", "Colon Cancer").await;
        assert_eq!(text, CLINICAL_FALLBACK);
    }

    #[tokio::test]
    async fn test_blank_answers_use_fallbacks() {
        let search = RecordingSearch::new(Ok("  \n\t".to_string()));

        let science = fetch_science(&search, "Metformin", "ALS").await;
        let clinical = fetch_clinical(&search, "Metformin", "ALS").await;

        assert_eq!(science, science_fallback("Metformin", "ALS"));
        assert_eq!(clinical, CLINICAL_FALLBACK);
        assert_eq!(search.queries.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_patent_is_idempotent() {
        let first = serde_json::to_vec(&check_patent("Metformin")).unwrap();
        let second = serde_json::to_vec(&check_patent("Metformin")).unwrap();
        assert_eq!(first, second);
        assert_eq!(check_patent("Metformin").primary_patent_expiry, "2018-05-20");
    }
}

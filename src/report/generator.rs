//! Markdown and JSON report generation.
//!
//! These renditions carry the same sections as the PDF plus report
//! metadata. Markdown output keeps full Unicode.

use super::layout::{report_filename, ReportLayout};
use crate::models::{Report, ReportMetadata};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, truncate_chars: usize) -> String {
    let query = &report.metadata.query;
    let layout = ReportLayout::build(&query.drug, &query.disease, &report.findings, truncate_chars);

    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", layout.title));

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Table of contents
    output.push_str("## Table of Contents\n\n");
    for section in &layout.sections {
        output.push_str(&format!("- [{}](#{})\n", section.title, anchor(&section.title)));
    }
    output.push('\n');

    // Sections
    for (index, section) in layout.sections.iter().enumerate() {
        output.push_str(&format!("## {}\n\n", section.title));
        if is_record_section(index) {
            output.push_str("```json\n");
            output.push_str(&section.body);
            output.push_str("\n```\n\n");
        } else {
            output.push_str(&section.body);
            output.push_str("\n\n");
        }
    }

    // Footer
    output.push_str("---\n\n");
    output.push_str("*Report generated by PharmaGen*\n");

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Candidate Molecule:** {}\n", metadata.query.drug));
    section.push_str(&format!(
        "- **Target Indication:** {}\n",
        metadata.query.disease
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Model:** `{}`\n", metadata.model_used));
    section.push_str(&format!("- **Summary Source:** {}\n", metadata.summary_source));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Market, trade and patent sections hold serialized records.
fn is_record_section(index: usize) -> bool {
    matches!(index, 1 | 2 | 5)
}

fn anchor(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .replace(' ', "-")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Suggested file name for a Markdown or JSON report.
pub fn text_report_filename(report: &Report, extension: &str) -> String {
    let query = &report.metadata.query;
    report_filename(&query.drug, &query.disease, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::workers::check_patent;
    use crate::models::{MarketRecord, ResearchQuery, ResultBundle, SummarySource};
    use crate::providers::query_trade;
    use chrono::Utc;

    fn create_test_report() -> Report {
        Report {
            metadata: ReportMetadata {
                query: ResearchQuery::new("Metformin", "Neurological Disorders"),
                generated_at: Utc::now(),
                model_used: "gpt-4o-mini".to_string(),
                summary_source: SummarySource::Model,
                duration_seconds: 4.2,
            },
            findings: ResultBundle {
                summary: "Strong repurposing case — AMPK signalling.".to_string(),
                market: MarketRecord {
                    source: "IQVIA Analytics (Mock)".to_string(),
                    market_size_global: "$12 Billion".to_string(),
                    cagr_5yr: "5.5%".to_string(),
                    top_competitor: "BigPharma Inc.".to_string(),
                    market_saturation: "Medium-High".to_string(),
                },
                trade: query_trade("Metformin"),
                science: "s".repeat(900),
                clinical: "NCT01234567".to_string(),
                patent: check_patent("Metformin"),
                summary_source: SummarySource::Model,
            },
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, 500);

        assert!(markdown.starts_with(
            "# Repurposing Opportunity: Metformin for Neurological Disorders"
        ));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("`gpt-4o-mini`"));
        assert!(markdown.contains("Language model"));
        assert!(markdown.contains("AMPK signalling"));
        assert!(markdown.contains(&format!("{}...", "s".repeat(500))));
        assert!(!markdown.contains(&"s".repeat(501)));
        assert!(markdown.contains("\"market_size_global\": \"$12 Billion\""));

        let summary = markdown.find("## Executive Summary").unwrap();
        let patent = markdown.find("## Patent Strategy").unwrap();
        assert!(summary < patent);
    }

    #[test]
    fn test_table_of_contents_anchors() {
        let markdown = generate_markdown_report(&create_test_report(), 500);
        assert!(markdown.contains("- [Market Opportunity (IQVIA)](#market-opportunity-iqvia)"));
        assert!(markdown.contains("- [Patent Strategy](#patent-strategy)"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"findings\""));
        assert!(json.contains("\"summary_source\": \"model\""));
        assert!(json.contains("\"primary_patent_expiry\": \"2018-05-20\""));
    }

    #[test]
    fn test_text_report_filename() {
        let report = create_test_report();
        assert_eq!(
            text_report_filename(&report, "md"),
            "Metformin_Neurological Disorders_Report.md"
        );
    }
}

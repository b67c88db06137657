//! Report layout shared by every output format.
//!
//! The layout fixes the title, the section order and the truncation
//! policy. Renderers only decide how a section is drawn.

use crate::models::ResultBundle;
use serde::Serialize;

/// Default number of characters kept from free-text intelligence.
pub const DEFAULT_TRUNCATE_CHARS: usize = 500;

/// Marker appended to truncated intelligence text.
pub const ELLIPSIS: &str = "...";

/// Substitute for characters the PDF encoding cannot represent.
pub const REPLACEMENT_CHAR: char = '?';

/// Section titles, in rendering order.
pub const SECTION_TITLES: [&str; 6] = [
    "Executive Summary",
    "Market Opportunity (IQVIA)",
    "Supply Chain (EXIM)",
    "Scientific Rationale",
    "Clinical Landscape",
    "Patent Strategy",
];

/// One titled block of report content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Title plus sections, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    pub title: String,
    pub sections: Vec<Section>,
}

impl ReportLayout {
    /// Lay out a bundle. Science and clinical text are cut to
    /// `truncate_chars` characters.
    pub fn build(drug: &str, disease: &str, bundle: &ResultBundle, truncate_chars: usize) -> Self {
        let bodies = [
            bundle.summary.clone(),
            record_text(&bundle.market),
            record_text(&bundle.trade),
            truncate_with_ellipsis(&bundle.science, truncate_chars),
            truncate_with_ellipsis(&bundle.clinical, truncate_chars),
            record_text(&bundle.patent),
        ];

        let sections = SECTION_TITLES
            .iter()
            .zip(bodies)
            .map(|(title, body)| Section {
                title: title.to_string(),
                body,
            })
            .collect();

        Self {
            title: format!("Repurposing Opportunity: {} for {}", drug, disease),
            sections,
        }
    }

    /// A copy with every non-Latin-1 character replaced.
    pub fn to_latin1(&self) -> Self {
        Self {
            title: to_latin1_lossy(&self.title),
            sections: self
                .sections
                .iter()
                .map(|s| Section {
                    title: to_latin1_lossy(&s.title),
                    body: to_latin1_lossy(&s.body),
                })
                .collect(),
        }
    }

    /// Flatten to plain text, one heading line per section.
    #[cfg(test)]
    pub fn to_plain_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.title);
        output.push_str("\n\n");

        for section in &self.sections {
            output.push_str(&section.title);
            output.push('\n');
            output.push_str(&section.body);
            output.push_str("\n\n");
        }

        output
    }
}

/// Keep the first `limit` characters and append [`ELLIPSIS`].
///
/// This is a straight character cut; the marker is always appended.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Replace characters outside Latin-1 (U+0000..=U+00FF).
pub fn to_latin1_lossy(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { REPLACEMENT_CHAR })
        .collect()
}

/// Serialize a record as indented key/value text.
pub fn record_text<T: Serialize>(record: &T) -> String {
    serde_json::to_string_pretty(record).unwrap_or_default()
}

/// Suggested file name: `{drug}_{disease}_Report.{extension}`.
///
/// Inputs are used verbatim.
pub fn report_filename(drug: &str, disease: &str, extension: &str) -> String {
    format!("{}_{}_Report.{}", drug, disease, extension)
}
